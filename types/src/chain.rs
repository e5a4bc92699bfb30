//! Chain identifier used for replay protection when signing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Identifies which chain a signed transaction is valid on.
///
/// Serialized as its name (`"devnet"`), or as the decimal id for custom chains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChainId {
    /// The production network.
    Mainnet,
    /// The public test network.
    Testnet,
    /// Development network.
    Devnet,
    /// Any other chain, by numeric id.
    Custom(u64),
}

impl ChainId {
    /// Numeric chain id embedded into signatures.
    pub fn value(&self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Testnet => 2,
            Self::Devnet => 4,
            Self::Custom(id) => *id,
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
            Self::Custom(_) => "custom",
        }
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::Devnet
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(id) => write!(f, "custom({id})"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for ChainId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "devnet" | "dev" => Ok(Self::Devnet),
            other => other
                .parse::<u64>()
                .map(Self::Custom)
                .map_err(|_| TypesError::InvalidChain(s.to_string())),
        }
    }
}

impl TryFrom<String> for ChainId {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ChainId> for String {
    fn from(chain: ChainId) -> Self {
        match chain {
            ChainId::Custom(id) => id.to_string(),
            named => named.as_str().to_string(),
        }
    }
}
