//! Nullable node: answers JSON-RPC calls from in-memory state.

use serde_json::{json, Value};
use shardblast_rpc::{method, NodeRpc, RpcError};
use shardblast_transactions::SignedTransaction;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// How long a stalled send sleeps. Long enough that any per-task timeout fires first.
const STALL: Duration = Duration::from_secs(24 * 3600);

#[derive(Default)]
struct State {
    calls: Vec<(String, Value)>,
    /// Scripted replies to the next-nonce query, consumed front to back.
    nonce_replies: VecDeque<Result<u64, String>>,
    /// Reply once the script is exhausted.
    default_nonce: u64,
    failing_sends: HashSet<u64>,
    stalled_sends: HashSet<u64>,
    send_delay: Duration,
    accepted: Vec<SignedTransaction>,
    /// Receipt polls answered with `null` before a receipt appears. `None` never confirms.
    confirm_after: Option<u32>,
    receipt_polls: u32,
    balance: u128,
    shards: Vec<(u32, String)>,
}

/// A test node that records calls and replies from scripted state.
#[derive(Default)]
pub struct NullRpc {
    state: Mutex<State>,
}

impl NullRpc {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node whose next-nonce query always answers `nonce`.
    pub fn with_nonce(nonce: u64) -> Self {
        let rpc = Self::new();
        rpc.lock().default_nonce = nonce;
        rpc
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a reply for the next next-nonce query.
    pub fn push_nonce(&self, nonce: u64) {
        self.lock().nonce_replies.push_back(Ok(nonce));
    }

    /// Queue a failure for the next next-nonce query.
    pub fn push_nonce_failure(&self, message: &str) {
        self.lock().nonce_replies.push_back(Err(message.to_string()));
    }

    /// Reject the broadcast of any transaction carrying `nonce`.
    pub fn fail_send_for(&self, nonce: u64) {
        self.lock().failing_sends.insert(nonce);
    }

    /// Never answer the broadcast of a transaction carrying `nonce`.
    pub fn stall_send_for(&self, nonce: u64) {
        self.lock().stalled_sends.insert(nonce);
    }

    /// Delay every broadcast reply.
    pub fn set_send_delay(&self, delay: Duration) {
        self.lock().send_delay = delay;
    }

    /// Make receipts appear after `polls` unanswered polls.
    pub fn confirm_after(&self, polls: u32) {
        self.lock().confirm_after = Some(polls);
    }

    pub fn set_balance(&self, balance: u128) {
        self.lock().balance = balance;
    }

    /// Sharding structure as `(shard id, http endpoint)` pairs.
    pub fn set_shards(&self, shards: &[(u32, &str)]) {
        self.lock().shards = shards.iter().map(|(id, url)| (*id, url.to_string())).collect();
    }

    /// Every call received, in arrival order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.lock().calls.clone()
    }

    /// Number of calls to `method`.
    pub fn calls_to(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|(m, _)| m == method).count()
    }

    /// Transactions the node accepted.
    pub fn accepted(&self) -> Vec<SignedTransaction> {
        self.lock().accepted.clone()
    }

    /// Nonces of accepted transactions, sorted.
    pub fn accepted_nonces(&self) -> Vec<u64> {
        let mut nonces: Vec<u64> = self.lock().accepted.iter().map(|tx| tx.draft.nonce).collect();
        nonces.sort_unstable();
        nonces
    }

    fn next_nonce_reply(&self) -> Result<Value, RpcError> {
        let mut state = self.lock();
        match state.nonce_replies.pop_front() {
            Some(Ok(nonce)) => Ok(json!(format!("0x{nonce:x}"))),
            Some(Err(message)) => Err(RpcError::Transport(message)),
            None => Ok(json!(state.default_nonce)),
        }
    }

    async fn send_reply(&self, params: &Value) -> Result<Value, RpcError> {
        let raw = params.get(0).and_then(Value::as_str).unwrap_or_default();
        let tx = SignedTransaction::from_raw_hex(raw).map_err(|e| RpcError::Node {
            code: -32602,
            message: format!("could not decode raw transaction: {e}"),
        })?;
        let nonce = tx.draft.nonce;

        let delay = {
            let state = self.lock();
            if state.stalled_sends.contains(&nonce) {
                STALL
            } else {
                state.send_delay
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let hash = tx.hash().map_err(|e| RpcError::Node {
            code: -32602,
            message: e.to_string(),
        })?;
        let mut state = self.lock();
        if state.failing_sends.contains(&nonce) {
            return Err(RpcError::Node {
                code: -32000,
                message: format!("transaction with nonce {nonce} rejected"),
            });
        }
        state.accepted.push(tx);
        Ok(json!(hash.to_string()))
    }

    fn receipt_reply(&self, params: &Value) -> Value {
        let mut state = self.lock();
        let Some(after) = state.confirm_after else {
            return Value::Null;
        };
        if state.receipt_polls < after {
            state.receipt_polls += 1;
            return Value::Null;
        }
        json!({ "transactionHash": params.get(0).cloned().unwrap_or(Value::Null), "status": 1 })
    }
}

impl NodeRpc for NullRpc {
    async fn call(&self, name: &str, params: Value) -> Result<Value, RpcError> {
        self.lock().calls.push((name.to_string(), params.clone()));

        match name {
            method::GET_NEXT_NONCE => self.next_nonce_reply(),
            method::SEND_RAW_TRANSACTION => self.send_reply(&params).await,
            method::GET_TRANSACTION_RECEIPT => Ok(self.receipt_reply(&params)),
            method::GET_BALANCE => Ok(json!(format!("0x{:x}", self.lock().balance))),
            method::GET_SHARDING_STRUCTURE => {
                let shards: Vec<Value> = self
                    .lock()
                    .shards
                    .iter()
                    .map(|(id, http)| json!({ "shardID": id, "http": http, "current": false }))
                    .collect();
                Ok(Value::Array(shards))
            }
            other => Err(RpcError::Node {
                code: -32601,
                message: format!("method {other} not found"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardblast_types::Address;

    fn sender() -> Address {
        Address::parse("one1sender").unwrap()
    }

    #[tokio::test]
    async fn scripted_nonces_then_default() {
        let rpc = NullRpc::with_nonce(7);
        rpc.push_nonce(3);
        rpc.push_nonce_failure("down");

        assert_eq!(rpc.next_nonce(&sender()).await.unwrap(), 3);
        assert!(rpc.next_nonce(&sender()).await.is_err());
        assert_eq!(rpc.next_nonce(&sender()).await.unwrap(), 7);
        assert_eq!(rpc.calls_to(method::GET_NEXT_NONCE), 3);
    }

    #[tokio::test]
    async fn garbage_raw_transaction_is_rejected() {
        let rpc = NullRpc::new();
        assert!(rpc.send_raw_transaction("0x1234").await.is_err());
        assert!(rpc.accepted().is_empty());
    }

    #[tokio::test]
    async fn receipt_after_polls() {
        let rpc = NullRpc::new();
        rpc.confirm_after(1);
        let receipt = shardblast_types::ReceiptRef::new("0xaa");
        assert!(rpc.transaction_receipt(&receipt).await.unwrap().is_none());
        assert!(rpc.transaction_receipt(&receipt).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sharding_structure_from_state() {
        let rpc = NullRpc::new();
        rpc.set_shards(&[(0, "https://s0"), (1, "https://s1")]);
        let shards = rpc.sharding_structure().await.unwrap();
        assert_eq!(shards.len(), 2);
        assert_eq!(shards[1].http, "https://s1");
    }
}
