//! Build, sign, submit and optionally confirm one transaction.

use serde::Serialize;
use shardblast_rpc::NodeRpc;
use shardblast_transactions::{build, SignedTransaction, TransactionDraft};
use shardblast_types::{ChainId, ReceiptRef, SendRequest, TxHash};
use shardblast_wallet::TxSigner;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::SenderError;

/// Pause between receipt polls.
pub const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Whether a broadcast transaction was seen in a receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    /// No confirmation wait was configured.
    NotRequested,
    Confirmed,
    /// The polling budget ran out first. Not an error.
    Unconfirmed,
}

/// A transaction the node accepted.
#[derive(Clone, Debug)]
pub struct SendOutcome {
    pub nonce: u64,
    pub receiver: String,
    /// Reference returned by the node.
    pub receipt: ReceiptRef,
    /// Locally computed hash of the signed encoding.
    pub tx_hash: TxHash,
    pub confirmation: Confirmation,
}

/// Poll for the receipt of `receipt` every [`CONFIRMATION_POLL_INTERVAL`]
/// until it appears or `max_wait` elapses. Failed polls count as "not yet".
pub async fn await_confirmation<N: NodeRpc>(
    rpc: &N,
    receipt: &ReceiptRef,
    max_wait: Duration,
) -> Confirmation {
    let deadline = Instant::now() + max_wait;
    loop {
        match rpc.transaction_receipt(receipt).await {
            Ok(Some(_)) => return Confirmation::Confirmed,
            Ok(None) => {}
            Err(e) => tracing::debug!(%receipt, "receipt poll failed: {e}"),
        }
        let now = Instant::now();
        if now >= deadline {
            return Confirmation::Unconfirmed;
        }
        tokio::time::sleep(CONFIRMATION_POLL_INTERVAL.min(deadline - now)).await;
    }
}

/// Sends single transactions for one account through one node.
pub struct Broadcaster<N, S> {
    rpc: Arc<N>,
    signer: Arc<S>,
    chain: ChainId,
    confirmation_wait: Option<Duration>,
}

impl<N: NodeRpc, S: TxSigner> Broadcaster<N, S> {
    pub fn new(rpc: Arc<N>, signer: Arc<S>, chain: ChainId) -> Self {
        Self {
            rpc,
            signer,
            chain,
            confirmation_wait: None,
        }
    }

    /// Poll for receipts for up to `wait` after each broadcast.
    pub fn with_confirmation_wait(mut self, wait: Option<Duration>) -> Self {
        self.confirmation_wait = wait;
        self
    }

    pub fn sign(&self, draft: TransactionDraft) -> Result<SignedTransaction, SenderError> {
        Ok(self.signer.sign(draft, self.chain)?)
    }

    /// Submit a signed transaction, returning the node's receipt reference.
    pub async fn broadcast(&self, signed: &SignedTransaction) -> Result<ReceiptRef, SenderError> {
        let raw = signed.to_raw_hex()?;
        Ok(self.rpc.send_raw_transaction(&raw).await?)
    }

    /// Build, sign and broadcast `request`. The outcome's confirmation is
    /// [`Confirmation::NotRequested`] until [`confirm`](Self::confirm) runs.
    pub async fn submit(&self, request: &SendRequest) -> Result<SendOutcome, SenderError> {
        let draft = build(request)?;
        let signed = self.sign(draft)?;
        let tx_hash = signed.hash()?;
        let receipt = self.broadcast(&signed).await?;
        tracing::debug!(nonce = request.nonce, %receipt, "transaction accepted");
        Ok(SendOutcome {
            nonce: request.nonce,
            receiver: request.receiver.clone(),
            receipt,
            tx_hash,
            confirmation: Confirmation::NotRequested,
        })
    }

    /// Wait for `receipt` within the configured budget, if any.
    pub async fn confirm(&self, receipt: &ReceiptRef) -> Confirmation {
        match self.confirmation_wait {
            Some(wait) => await_confirmation(self.rpc.as_ref(), receipt, wait).await,
            None => Confirmation::NotRequested,
        }
    }
}
