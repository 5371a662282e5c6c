use crate::core::timezone;
use croner::errors::CronError;
use croner::Cron;

/// Validates the given cron string.
pub fn is_valid_cron_string(cron_string: &str) -> bool {
    Cron::new(cron_string).with_seconds_optional().parse().is_ok()
}

/// Calculates the next run time for a cron expression, strictly after
/// `last_run` and, when possible, strictly after `previous_next_run`.
///
/// Both five-field and six-field (seconds) expressions are accepted. The
/// anchor is interpreted in the job's timezone. If the first match is not
/// strictly after `previous_next_run`, the scan is retried once from
/// `last_run + 1s`; the retry result is kept either way.
///
/// A malformed expression is a parse error, which the caller recovers from
/// by falling through to the next recurrence syntax. `Ok(None)` means the
/// schedule yields no further occurrence.
pub fn next_after(
    cron_str: &str,
    timezone_str: Option<&str>,
    last_run: i64,
    previous_next_run: i64,
) -> Result<Option<i64>, CronError> {
    let schedule = Cron::new(cron_str).with_seconds_optional().parse()?;

    let mut next = scan(&schedule, timezone_str, last_run);
    if let Some(millis) = next {
        if millis <= previous_next_run {
            // One-second nudge so a previously reported instant is not
            // handed back again.
            next = scan(&schedule, timezone_str, last_run + 1000);
        }
    }
    Ok(next)
}

/// Finds the first occurrence strictly after `from`.
fn scan(schedule: &Cron, timezone_str: Option<&str>, from: i64) -> Option<i64> {
    let anchor = timezone::normalize(from, timezone_str)?;
    for timestamp in schedule.iter_from(anchor) {
        let millis = timestamp.timestamp_millis();
        if millis > from {
            return Some(millis);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn accepts_five_and_six_field_expressions() {
        assert!(is_valid_cron_string("0 0 * * *"));
        assert!(is_valid_cron_string("*/30 * * * * *"));
        assert!(!is_valid_cron_string("not a cron"));
        assert!(!is_valid_cron_string("2 hours"));
    }

    #[test]
    fn daily_midnight_advances_one_day() {
        let last = millis(2024, 1, 1, 0, 0, 0);
        let next = next_after("0 0 * * *", None, last, last).unwrap();
        assert_eq!(next, Some(millis(2024, 1, 2, 0, 0, 0)));
    }

    #[test]
    fn result_is_strictly_after_the_anchor() {
        // Anchor sits exactly on a match; the match itself must be skipped.
        let last = millis(2024, 3, 15, 12, 0, 0);
        let next = next_after("0 * * * *", None, last, last).unwrap();
        assert_eq!(next, Some(millis(2024, 3, 15, 13, 0, 0)));
    }

    #[test]
    fn nudges_past_a_previously_reported_instant() {
        let last = millis(2024, 1, 1, 0, 0, 0);
        let reported = millis(2024, 1, 1, 1, 0, 0);
        // First match equals the previously reported next run; the retry
        // from last+1s lands on the same hour, which is kept.
        let next = next_after("0 * * * *", None, last, reported).unwrap();
        assert_eq!(next, Some(reported));
    }

    #[test]
    fn evaluates_in_the_job_timezone() {
        // 9am in New York is 14:00 UTC during EST.
        let last = millis(2024, 1, 1, 0, 0, 0);
        let next = next_after("0 9 * * *", Some("America/New_York"), last, last).unwrap();
        assert_eq!(next, Some(millis(2024, 1, 1, 14, 0, 0)));
    }

    #[test]
    fn malformed_expression_is_a_parse_error() {
        assert!(next_after("every tuesday", None, 0, 0).is_err());
    }
}
