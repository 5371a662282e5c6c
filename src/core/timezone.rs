use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Checks if the provided timezone string is valid.
pub fn is_valid_timezone(timezone_str: &str) -> bool {
    timezone_str.parse::<Tz>().is_ok()
}

/// Resolves an optional IANA timezone name, falling back to UTC when the
/// name is absent, empty, or unknown.
pub fn resolve_timezone(name: Option<&str>) -> Tz {
    name.filter(|n| !n.is_empty())
        .and_then(|n| n.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Converts an epoch-millisecond instant into a timezone-aware datetime.
///
/// Returns `None` only when the instant is outside the representable range,
/// which callers treat as an invalid numeric result.
pub fn normalize(millis: i64, name: Option<&str>) -> Option<DateTime<Tz>> {
    let tz = resolve_timezone(name);
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz))
}
