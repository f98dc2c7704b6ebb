//! Network URL constants for the feed SDK.

/// Default REST/stream API base URL (local dashboard backend).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
