//! Starting nonce resolution and the scheduler-owned counter.

use shardblast_rpc::NodeRpc;
use shardblast_types::Address;
use std::ops::Range;

use crate::SenderError;

/// The nonce to start from.
///
/// An explicit value is parsed and returned without touching the network.
/// Otherwise the node is asked for the account's next nonce.
pub async fn resolve_nonce<N: NodeRpc>(
    address: &Address,
    explicit: Option<&str>,
    rpc: &N,
) -> Result<u64, SenderError> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| SenderError::InvalidInput(format!("nonce {raw:?}: {e}"))),
        None => {
            let nonce = rpc.next_nonce(address).await?;
            tracing::debug!(%address, nonce, "fetched nonce from network");
            Ok(nonce)
        }
    }
}

/// What a refresh did to the counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    Unchanged,
    Advanced { from: u64 },
    /// The network reported a lower nonce than already assigned locally.
    Regressed { from: u64 },
}

/// Next nonce to hand out. Only the dispatcher holds one, so no locking.
#[derive(Debug)]
pub struct NonceCounter {
    next: u64,
}

impl NonceCounter {
    pub fn new(baseline: u64) -> Self {
        Self { next: baseline }
    }

    /// The first nonce the next [`reserve`](Self::reserve) will return.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Hand out the next `count` nonces as one contiguous block.
    ///
    /// Nothing is handed out if the block would run past `u64::MAX - 1`, the
    /// highest nonce an account can use.
    pub fn reserve(&mut self, count: usize) -> Result<Range<u64>, SenderError> {
        let start = self.next;
        let end = u64::try_from(count)
            .ok()
            .and_then(|count| start.checked_add(count))
            .ok_or_else(|| {
                SenderError::InvalidInput(format!(
                    "cannot assign {count} nonces from {start}: nonce space exhausted"
                ))
            })?;
        self.next = end;
        Ok(start..end)
    }

    /// Replace the baseline with a value read from the network.
    pub fn refresh(&mut self, fresh: u64) -> Refresh {
        let from = self.next;
        self.next = fresh;
        match fresh.cmp(&from) {
            std::cmp::Ordering::Equal => Refresh::Unchanged,
            std::cmp::Ordering::Greater => Refresh::Advanced { from },
            std::cmp::Ordering::Less => Refresh::Regressed { from },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardblast_nullables::NullRpc;
    use shardblast_rpc::method;

    fn sender() -> Address {
        Address::parse("one1sender").unwrap()
    }

    #[tokio::test]
    async fn explicit_nonce_skips_network() {
        let rpc = NullRpc::with_nonce(7);
        assert_eq!(resolve_nonce(&sender(), Some("42"), &rpc).await.unwrap(), 42);
        assert!(rpc.calls().is_empty());
    }

    #[tokio::test]
    async fn unparsable_nonce_is_input_error() {
        let rpc = NullRpc::with_nonce(7);
        let err = resolve_nonce(&sender(), Some("abc"), &rpc).await.unwrap_err();
        assert!(matches!(err, SenderError::InvalidInput(_)));
        assert!(err.is_configuration());
        assert!(rpc.calls().is_empty());

        assert!(resolve_nonce(&sender(), Some("-1"), &rpc).await.is_err());
    }

    #[tokio::test]
    async fn absent_or_blank_nonce_queries_network() {
        let rpc = NullRpc::with_nonce(7);
        assert_eq!(resolve_nonce(&sender(), None, &rpc).await.unwrap(), 7);
        assert_eq!(resolve_nonce(&sender(), Some(""), &rpc).await.unwrap(), 7);
        assert_eq!(rpc.calls_to(method::GET_NEXT_NONCE), 2);
    }

    #[tokio::test]
    async fn network_failure_is_network_error() {
        let rpc = NullRpc::new();
        rpc.push_nonce_failure("connection refused");
        let err = resolve_nonce(&sender(), None, &rpc).await.unwrap_err();
        assert!(matches!(err, SenderError::Network(_)));
    }

    #[test]
    fn reserved_blocks_are_contiguous() {
        let mut counter = NonceCounter::new(10);
        assert_eq!(counter.reserve(2).unwrap(), 10..12);
        assert_eq!(counter.reserve(3).unwrap(), 12..15);
        assert_eq!(counter.peek(), 15);
    }

    #[test]
    fn refresh_reports_direction() {
        let mut counter = NonceCounter::new(5);
        assert_eq!(counter.refresh(5), Refresh::Unchanged);
        assert_eq!(counter.refresh(9), Refresh::Advanced { from: 5 });
        assert_eq!(counter.refresh(3), Refresh::Regressed { from: 9 });
        assert_eq!(counter.reserve(1).unwrap(), 3..4);
    }

    #[test]
    fn overflowing_block_hands_out_nothing() {
        let mut counter = NonceCounter::new(u64::MAX - 2);
        assert!(counter.reserve(3).is_err());
        assert_eq!(counter.peek(), u64::MAX - 2);
        assert_eq!(counter.reserve(2).unwrap(), u64::MAX - 2..u64::MAX);
        assert!(counter.reserve(1).is_err());
    }
}
