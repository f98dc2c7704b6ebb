//! Relative time labels (`"5s ago"`, `"3min ago"`, ...).

use chrono::{DateTime, Utc};

/// Label how long ago `then` was, relative to `now`.
///
/// Buckets: seconds below a minute, minutes below an hour, hours below a day,
/// days below 30 days, 30-day months below 12 months, then years. Each value is
/// floored. Times in the future read as `"0s ago"`.
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}min ago", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d ago", days);
    }

    let months = days / 30;
    if months < 12 {
        return format!("{}mo ago", months);
    }

    format!("{}y ago", months / 12)
}
