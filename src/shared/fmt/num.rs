//! Number formatting utilities for human-readable display.
//!
//! Transaction prices and totals are shown with a fixed number of decimals; chart
//! axes and summaries use trimmed values with comma separators.

/// Decimal places used when displaying a transaction price.
pub const PRICE_DECIMALS: usize = 4;

/// Decimal places used when displaying a transaction total.
pub const TOTAL_DECIMALS: usize = 5;

/// Format with exactly `decimals` places, no grouping (`1.5` → `"1.5000"`).
pub fn fixed(amount: f64, decimals: usize) -> String {
    format!("{:.1$}", amount, decimals)
}

/// Insert thousands separators into the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Round to `decimals` places, trim trailing zeros, add thousands separators.
pub fn display_with_decimals(amount: f64, decimals: usize) -> String {
    let formatted = fixed(amount, decimals);
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    if trimmed == "-0" {
        return "0".to_string();
    }
    group_thousands(trimmed)
}
