use crate::core::timezone;
use chrono::{Duration, NaiveTime, TimeZone};

/// Resolves a time-of-day phrase against "now" in the job's timezone.
///
/// The phrase resolves to today at the given wall-clock time. If that
/// instant equals `last_run` exactly, it is re-resolved as tomorrow at the
/// same time to force forward progress. `None` means the phrase could not
/// be parsed and the job should be failed with an invalid repeat-at format.
pub fn next_at(phrase: &str, timezone_str: Option<&str>, last_run: i64, now: i64) -> Option<i64> {
    let time = parse_time_of_day(phrase)?;
    let tz = timezone::resolve_timezone(timezone_str);
    let local_now = timezone::normalize(now, timezone_str)?;

    let today = local_now.date_naive();
    let mut resolved = tz.from_local_datetime(&today.and_time(time)).earliest()?;
    if resolved.timestamp_millis() == last_run {
        let tomorrow = today.checked_add_signed(Duration::days(1))?;
        resolved = tz.from_local_datetime(&tomorrow.and_time(time)).earliest()?;
    }
    Some(resolved.timestamp_millis())
}

/// Parses a wall-clock time phrase: 24-hour ("15:30", "15:30:00"),
/// 12-hour ("3pm", "3:00pm", "3:00 pm"), or a named time of day.
pub fn parse_time_of_day(phrase: &str) -> Option<NaiveTime> {
    let cleaned = phrase.trim().to_lowercase();

    match cleaned.as_str() {
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        "morning" => return NaiveTime::from_hms_opt(9, 0, 0),
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "afternoon" => return NaiveTime::from_hms_opt(13, 0, 0),
        "evening" => return NaiveTime::from_hms_opt(18, 0, 0),
        "night" => return NaiveTime::from_hms_opt(21, 0, 0),
        _ => {}
    }

    if let Ok(t) = NaiveTime::parse_from_str(&cleaned, "%H:%M:%S") {
        return Some(t);
    }
    if let Ok(t) = NaiveTime::parse_from_str(&cleaned, "%H:%M") {
        return Some(t);
    }

    // 12-hour clock, meridiem required.
    let compact = cleaned.replace(' ', "");
    let (rest, is_pm) = if let Some(rest) = compact.strip_suffix("pm") {
        (rest, true)
    } else if let Some(rest) = compact.strip_suffix("am") {
        (rest, false)
    } else {
        return None;
    };

    let mut parts = rest.split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = match parts.next() {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    let second: u32 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() || !(1..=12).contains(&hour) {
        return None;
    }

    let hour24 = match (hour, is_pm) {
        (12, true) => 12,
        (12, false) => 0,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour24, minute, second)
}
