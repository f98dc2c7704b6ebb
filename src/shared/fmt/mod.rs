//! Display formatting for dashboard values.
//!
//! - `num`: f64 amounts with thousands separators and fixed decimals
//! - `time`: relative "time ago" labels

pub mod num;
pub mod time;

pub use num::{display_with_decimals, fixed, PRICE_DECIMALS, TOTAL_DECIMALS};
pub use time::format_time_ago;
