//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Rich domain types (decoded, display-ready)
//! - `wire.rs`: Raw serde structs matching backend responses
//! - `convert.rs`: `TryFrom`/`From` conversions with validation
//! - `state.rs`: State containers with update methods (for stream-driven data)
//! - `client.rs`: Sub-client with HTTP methods and caching

pub mod asset;
pub mod kline;
pub mod transaction;
