//! Custom serde helpers for backend wire formats.

use serde::{Deserialize, Serialize};

/// An integer the backend sends either as a JSON number or as a numeric string.
///
/// K-line timestamps arrive as `"1700000000"`; most other integers arrive as numbers,
/// but both shapes have been seen for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrInt {
    Int(i64),
    Str(String),
}

impl StringOrInt {
    pub fn to_i64(&self) -> Result<i64, String> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("'{}' is not an integer: {}", s, e)),
        }
    }
}

impl From<i64> for StringOrInt {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

/// Deserializes a number-or-numeric-string field straight into `i64`.
pub mod int_or_string {
    use super::StringOrInt;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        StringOrInt::deserialize(deserializer)?
            .to_i64()
            .map_err(serde::de::Error::custom)
    }

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*value)
    }
}
