//! Wire types for asset responses (REST).

use crate::shared::Symbol;
use serde::{Deserialize, Serialize};

/// One listed asset as the backend sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: u64,
    pub name: String,
    pub symbol: Symbol,
    pub is_nft: bool,
    pub token_address: String,
    pub decimals: u8,
}

/// REST response for `GET /assets/getAssets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsResponse {
    pub assets: Vec<AssetRecord>,
}
