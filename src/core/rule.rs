use crate::core::model::JobSnapshot;
use chrono::{DateTime, Timelike, Utc};
use rrule::{RRule, RRuleError, Tz as RuleTz, Unvalidated};

/// Default occurrence cap applied when a rule carries neither COUNT nor
/// UNTIL, so materialization always terminates.
const DEFAULT_OCCURRENCE_CAP: u32 = 500 + 1;

/// Hard ceiling on materialized occurrences, guarding UNTIL-bounded rules
/// that would otherwise expand into huge sequences.
const MATERIALIZE_LIMIT: u16 = u16::MAX;

/// Result of evaluating a recurrence rule against a job snapshot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RuleOutcome {
    /// First occurrence strictly after the last run, if any.
    pub next_run_at: Option<i64>,
    /// Second-to-last materialized occurrence. The final entry acts as a
    /// sentinel one position beyond the usable expiry; window clamping
    /// relies on this bound.
    pub no_more_at: Option<i64>,
    /// Every materialized occurrence, oldest first.
    pub occurrences: Vec<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Rule(#[from] RRuleError),

    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("instant out of representable range")]
    OutOfRange,
}

/// Evaluates an RFC-5545 recurrence rule string for the given job.
///
/// The rule's `dtstart` is the job's activation start (falling back to the
/// last run) expressed in the job's timezone. When the rule constrains the
/// hour of day and a UTC-offset hint is present, BYHOUR/BYMINUTE are derived
/// from the activation start's local time, or from the trigger-time hint in
/// the timezone-less case. An explicit COUNT is incremented by one because
/// `dtstart` itself counts as an occurrence.
pub fn evaluate(job: &JobSnapshot, last_run: i64) -> Result<RuleOutcome, RuleError> {
    let raw = job.repeat_interval.as_deref().unwrap_or_default();
    let mut rule: RRule<Unvalidated> = raw.parse()?;

    let timezone = job.timezone.as_deref().filter(|name| !name.is_empty());
    let tz = match timezone {
        Some(name) => {
            let parsed = name
                .parse::<chrono_tz::Tz>()
                .map_err(|_| RuleError::UnknownTimezone(name.to_owned()))?;
            RuleTz::Tz(parsed)
        }
        None => RuleTz::UTC,
    };

    let anchor = job.start_runs_at.unwrap_or(last_run);
    let dtstart = DateTime::<Utc>::from_timestamp_millis(anchor)
        .ok_or(RuleError::OutOfRange)?
        .with_timezone(&tz);

    if !rule.get_by_hour().is_empty() && job.tz_offset_minutes.is_some() {
        if timezone.is_some() {
            rule = rule
                .by_hour(vec![dtstart.hour() as u8])
                .by_minute(vec![dtstart.minute() as u8]);
        } else if let Some(trigger) = job.trigger_time {
            let trigger = DateTime::<Utc>::from_timestamp_millis(trigger)
                .ok_or(RuleError::OutOfRange)?;
            rule = rule
                .by_hour(vec![trigger.hour() as u8])
                .by_minute(vec![trigger.minute() as u8]);
        }
    }

    // dtstart itself counts as an occurrence, so an explicit COUNT gets one
    // more; an unbounded rule gets the default cap.
    rule = match rule.get_count() {
        Some(count) => rule.count(count.saturating_add(1)),
        None if rule.get_until().is_none() => rule.count(DEFAULT_OCCURRENCE_CAP),
        None => rule,
    };

    let set = rule.build(dtstart)?;
    let occurrences: Vec<i64> = set
        .all(MATERIALIZE_LIMIT)
        .dates
        .iter()
        .map(|date| date.timestamp_millis())
        .collect();

    let no_more_at = (occurrences.len() >= 2).then(|| occurrences[occurrences.len() - 2]);

    let mut next_run_at = first_after(&occurrences, last_run);
    if next_run_at == Some(last_run) {
        next_run_at = first_after(&occurrences, last_run + 1000);
    } else if next_run_at.is_some() && next_run_at == no_more_at {
        next_run_at = no_more_at;
    }

    Ok(RuleOutcome {
        next_run_at,
        no_more_at,
        occurrences,
    })
}

fn first_after(occurrences: &[i64], instant: i64) -> Option<i64> {
    occurrences.iter().copied().find(|&ts| ts > instant)
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

    fn daily_job(count: u32) -> JobSnapshot {
        JobSnapshot {
            repeat_interval: Some(format!("FREQ=DAILY;COUNT={count}")),
            start_runs_at: Some(millis(2024, 1, 1, 0, 0, 0)),
            ..JobSnapshot::new("report", "job-1")
        }
    }

    #[test]
    fn count_is_incremented_to_cover_dtstart() {
        let job = daily_job(3);
        let outcome = evaluate(&job, millis(2024, 1, 1, 0, 0, 0)).unwrap();
        // COUNT=3 materializes four entries starting at dtstart.
        assert_eq!(
            outcome.occurrences,
            vec![
                millis(2024, 1, 1, 0, 0, 0),
                millis(2024, 1, 2, 0, 0, 0),
                millis(2024, 1, 3, 0, 0, 0),
                millis(2024, 1, 4, 0, 0, 0),
            ]
        );
        // The usable expiry is the second-to-last entry.
        assert_eq!(outcome.no_more_at, Some(millis(2024, 1, 3, 0, 0, 0)));
        assert_eq!(outcome.next_run_at, Some(millis(2024, 1, 2, 0, 0, 0)));
    }

    #[test]
    fn next_is_strictly_after_last_run() {
        let job = daily_job(5);
        let outcome = evaluate(&job, millis(2024, 1, 2, 12, 0, 0)).unwrap();
        assert_eq!(outcome.next_run_at, Some(millis(2024, 1, 3, 0, 0, 0)));
    }

    #[test]
    fn exhausted_rule_yields_no_next_run() {
        let job = daily_job(2);
        let outcome = evaluate(&job, millis(2024, 2, 1, 0, 0, 0)).unwrap();
        assert_eq!(outcome.next_run_at, None);
        assert!(outcome.no_more_at.is_some());
    }

    #[test]
    fn unbounded_rule_gets_the_default_cap() {
        let job = JobSnapshot {
            repeat_interval: Some("FREQ=DAILY".to_owned()),
            start_runs_at: Some(millis(2024, 1, 1, 0, 0, 0)),
            ..JobSnapshot::new("report", "job-1")
        };
        let outcome = evaluate(&job, millis(2024, 1, 1, 0, 0, 0)).unwrap();
        assert_eq!(outcome.occurrences.len(), 501);
    }

    #[test]
    fn until_bound_is_respected_without_a_cap() {
        let job = JobSnapshot {
            repeat_interval: Some("FREQ=DAILY;UNTIL=20240110T000000Z".to_owned()),
            start_runs_at: Some(millis(2024, 1, 1, 0, 0, 0)),
            ..JobSnapshot::new("report", "job-1")
        };
        let outcome = evaluate(&job, millis(2024, 1, 1, 0, 0, 0)).unwrap();
        assert_eq!(outcome.occurrences.len(), 10);
    }

    #[test]
    fn byhour_is_derived_from_activation_start_local_time() {
        // dtstart is midnight in New York; BYHOUR=9 gets overridden to the
        // local hour of the activation start.
        let job = JobSnapshot {
            repeat_interval: Some("FREQ=DAILY;COUNT=2;BYHOUR=9".to_owned()),
            timezone: Some("America/New_York".to_owned()),
            tz_offset_minutes: Some(-300),
            start_runs_at: Some(millis(2024, 1, 1, 5, 0, 0)),
            ..JobSnapshot::new("report", "job-1")
        };
        let outcome = evaluate(&job, millis(2024, 1, 1, 5, 0, 0)).unwrap();
        assert_eq!(outcome.occurrences[0], millis(2024, 1, 1, 5, 0, 0));
        assert_eq!(outcome.occurrences[1], millis(2024, 1, 2, 5, 0, 0));
    }

    #[test]
    fn byhour_is_derived_from_trigger_time_without_a_timezone() {
        let job = JobSnapshot {
            repeat_interval: Some("FREQ=DAILY;COUNT=2;BYHOUR=9;BYMINUTE=0".to_owned()),
            tz_offset_minutes: Some(330),
            trigger_time: Some(millis(2024, 1, 1, 13, 45, 0)),
            start_runs_at: Some(millis(2024, 1, 1, 0, 0, 0)),
            ..JobSnapshot::new("report", "job-1")
        };
        let outcome = evaluate(&job, millis(2024, 1, 1, 0, 0, 0)).unwrap();
        assert_eq!(outcome.occurrences[0], millis(2024, 1, 1, 13, 45, 0));
    }

    #[test]
    fn without_the_offset_hint_byhour_is_left_alone() {
        let job = JobSnapshot {
            repeat_interval: Some("FREQ=DAILY;COUNT=2;BYHOUR=9;BYMINUTE=0".to_owned()),
            start_runs_at: Some(millis(2024, 1, 1, 0, 0, 0)),
            ..JobSnapshot::new("report", "job-1")
        };
        let outcome = evaluate(&job, millis(2024, 1, 1, 0, 0, 0)).unwrap();
        assert_eq!(outcome.occurrences[0], millis(2024, 1, 1, 9, 0, 0));
    }

    #[test]
    fn garbage_is_a_rule_error() {
        let job = JobSnapshot {
            repeat_interval: Some("definitely not an rrule".to_owned()),
            ..JobSnapshot::new("report", "job-1")
        };
        assert!(evaluate(&job, 0).is_err());
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let job = JobSnapshot {
            repeat_interval: Some("FREQ=DAILY;COUNT=2".to_owned()),
            timezone: Some("Mars/Olympus_Mons".to_owned()),
            start_runs_at: Some(millis(2024, 1, 1, 0, 0, 0)),
            ..JobSnapshot::new("report", "job-1")
        };
        assert!(matches!(
            evaluate(&job, 0),
            Err(RuleError::UnknownTimezone(_))
        ));
    }
}
