//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod fixed_point;
pub mod fmt;
pub mod serde_util;

pub use fixed_point::{decode_fixed_point, FixedPointValue, MAX_DECIMALS};

use crate::error::SdkError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Symbol the dashboard selects when none is given.
pub const DEFAULT_SYMBOL: &str = "MEME/SOL";

// ─── Symbol ──────────────────────────────────────────────────────────────────

/// Newtype for trading pair symbols (e.g. `"MEME/SOL"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base token of the pair: the part before `/`, or the whole symbol.
    pub fn base(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self(DEFAULT_SYMBOL.to_string())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Symbol(s.to_string()))
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Symbol(s))
    }
}

// ─── Side ────────────────────────────────────────────────────────────────────

/// Transaction side as reported by the backend (`"BUY"` / `"SELL"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

// ─── Interval ────────────────────────────────────────────────────────────────

/// K-line candle interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1s")]
    Second1,
    #[default]
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
}

impl Interval {
    /// Every interval offered by the dashboard, shortest first.
    pub const ALL: [Interval; 5] = [
        Self::Second1,
        Self::Minute1,
        Self::Minute5,
        Self::Minute15,
        Self::Hour1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Second1 => "1s",
            Self::Minute1 => "1m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Hour1 => "1h",
        }
    }

    /// Short button label (`1min`, `5min`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Second1 => "1s",
            Self::Minute1 => "1min",
            Self::Minute5 => "5min",
            Self::Minute15 => "15min",
            Self::Hour1 => "1h",
        }
    }

    /// Duration of one candle in milliseconds.
    pub fn millis(&self) -> i64 {
        match self {
            Self::Second1 => 1_000,
            Self::Minute1 => 60_000,
            Self::Minute5 => 300_000,
            Self::Minute15 => 900_000,
            Self::Hour1 => 3_600_000,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| SdkError::Validation(format!("Unknown interval: {}", s)))
    }
}

// ─── Utilities ───────────────────────────────────────────────────────────────

/// Shorten an address for display: `first6...last4`.
///
/// Addresses of ten characters or fewer are returned unchanged.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
