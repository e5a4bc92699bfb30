//! A complete run: validate, load inputs, resolve the nonce, dispatch.

use shardblast_rpc::NodeRpc;
use shardblast_types::Address;
use shardblast_wallet::TxSigner;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use crate::config::SenderConfig;
use crate::nonce::resolve_nonce;
use crate::receivers::ReceiverSource;
use crate::scheduler::{DispatchOptions, DispatchPlan, Dispatcher, RequestTemplate, RunReport};
use crate::SenderError;

/// Read the payload attached to every transaction. A missing or empty file means none.
pub fn load_payload(path: &Path) -> Result<Option<Arc<[u8]>>, SenderError> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(None),
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), len = bytes.len(), "loaded payload");
            Ok(Some(bytes.into()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SenderError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Log the sender's balance. Failure to read it does not stop the run.
pub async fn log_balance<N: NodeRpc>(rpc: &N, address: &Address) {
    match rpc.balance(address).await {
        Ok(balance) => tracing::info!(%address, %balance, "sender balance (base units)"),
        Err(e) => tracing::warn!(%address, "could not read sender balance: {e}"),
    }
}

/// Execute the run described by `config` with the given node and signer.
///
/// Every error returned before the dispatch starts happens before any
/// transaction is sent.
pub async fn execute<N, S>(
    config: &SenderConfig,
    rpc: Arc<N>,
    signer: Arc<S>,
) -> Result<RunReport, SenderError>
where
    N: NodeRpc + 'static,
    S: TxSigner + 'static,
{
    config.validate()?;
    let sender = config.sender()?.clone();
    if signer.address() != &sender {
        tracing::warn!(
            configured = %sender,
            signer = %signer.address(),
            "signer address differs from configured sender"
        );
    }

    let receivers = ReceiverSource::from_file(&config.receivers, config.skip_blank_receivers)?;
    let payload = load_payload(&config.tx_data)?;
    let plan = DispatchPlan::new(config.tx_count, config.pool_size)?;

    log_balance(rpc.as_ref(), &sender).await;
    let baseline = resolve_nonce(&sender, config.nonce.as_deref(), rpc.as_ref()).await?;
    tracing::info!(nonce = baseline, "starting nonce");
    if config.disable_nonce_refresh {
        tracing::info!("nonce refresh disabled; nonces are counted locally for the whole run");
    }

    let template = RequestTemplate {
        sender,
        sender_shard: config.from_shard,
        receiver_shard: config.to_shard,
        amount: config.amount,
        gas_price: config.gas_price,
        payload,
    };
    let options = DispatchOptions {
        chain: config.chain,
        refresh_nonce: !config.disable_nonce_refresh,
        task_timeout: config.task_timeout(),
        confirmation_wait: config.confirmation_wait(),
    };
    Dispatcher::new(rpc, signer, receivers, template, plan, options)
        .run(baseline)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_missing_or_empty_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_payload(&dir.path().join("absent")).unwrap().is_none());

        let empty = dir.path().join("empty");
        std::fs::write(&empty, b"").unwrap();
        assert!(load_payload(&empty).unwrap().is_none());
    }

    #[test]
    fn payload_bytes_are_raw() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data");
        std::fs::write(&path, b"hello\n\x00").unwrap();
        assert_eq!(load_payload(&path).unwrap().as_deref(), Some(&b"hello\n\x00"[..]));
    }
}
