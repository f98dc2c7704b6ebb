//! Asset domain: the tradable asset list.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use crate::shared::{truncate_address, Symbol};
use serde::{Deserialize, Serialize};

/// Page size the dashboard requests by default.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A tradable asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: u64,
    pub name: String,
    pub symbol: Symbol,
    pub kind: AssetKind,
    pub token_address: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Nft,
    Token,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Nft => write!(f, "NFT"),
            AssetKind::Token => write!(f, "Token"),
        }
    }
}

impl Asset {
    pub fn is_nft(&self) -> bool {
        self.kind == AssetKind::Nft
    }

    /// Token address shortened for table display.
    pub fn short_address(&self) -> String {
        truncate_address(&self.token_address)
    }
}

impl From<wire::AssetRecord> for Asset {
    fn from(a: wire::AssetRecord) -> Self {
        Self {
            id: a.id,
            name: a.name,
            symbol: a.symbol,
            kind: if a.is_nft { AssetKind::Nft } else { AssetKind::Token },
            token_address: a.token_address,
            decimals: a.decimals,
        }
    }
}
