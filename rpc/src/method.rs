//! Method names consumed from the node. Treated as opaque strings.

pub const GET_BALANCE: &str = "hmy_getBalance";
pub const GET_NODE_METADATA: &str = "hmy_getNodeMetadata";
pub const GET_NEXT_NONCE: &str = "hmy_getTransactionCount";
pub const SEND_RAW_TRANSACTION: &str = "hmy_sendRawTransaction";
pub const GET_TRANSACTION_RECEIPT: &str = "hmy_getTransactionReceipt";
pub const GET_SHARDING_STRUCTURE: &str = "hmy_getShardingStructure";

/// Block tag used for state queries.
pub const LATEST: &str = "latest";
