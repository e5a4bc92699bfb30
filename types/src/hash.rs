//! Hash and receipt types for submitted transactions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte digest of a locally signed transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// The opaque transaction reference a node returns after accepting a raw
/// transaction. Used only to poll for a receipt.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptRef(String);

impl ReceiptRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_hash_display_is_prefixed_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        let hash = TxHash::new(bytes);
        assert!(hash.to_string().starts_with("0xab00"));
        assert_eq!(hash.to_string().len(), 66);
        assert!(!hash.is_zero());
        assert!(TxHash::ZERO.is_zero());
    }

    #[test]
    fn receipt_ref_is_transparent() {
        let r = ReceiptRef::new("0xdeadbeef");
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"0xdeadbeef\"");
    }
}
