use crate::core::error::ScheduleError;
use crate::core::model::{ComputedSchedule, JobSnapshot};
use crate::core::{cron, human, repeat_at, rule, timezone, window};
use crate::utc_now;
use tracing::debug;

/// Computes the next run for a job snapshot.
///
/// An interval string is tried as cron, then as a human-readable duration,
/// then as a recurrence rule; the first syntax that parses wins. Without an
/// interval, a time-of-day phrase is used. With neither, the output is
/// untouched. The result is normalized to the job's timezone and clamped to
/// the activation window; a window that has run out clears the next run
/// without failing the job.
pub fn compute_next_run_at(job: &JobSnapshot) -> ComputedSchedule {
    if let Some(interval) = job.repeat_interval.as_deref() {
        compute_from_interval(job, interval)
    } else if let Some(phrase) = job.repeat_at.as_deref() {
        compute_from_repeat_at(job, phrase)
    } else {
        ComputedSchedule::unchanged()
    }
}

fn compute_from_interval(job: &JobSnapshot, interval: &str) -> ComputedSchedule {
    debug!(job = %job.name, id = %job.id, interval, "computing next run via interval");

    let now = utc_now!();
    let last_run = job.last_run_at.unwrap_or(now);
    let previous_next_run = job.previous_next_run_at.unwrap_or(now);

    let mut out = ComputedSchedule::default();

    let tz = job.timezone.as_deref();
    let candidate = match cron::next_after(interval, tz, last_run, previous_next_run) {
        Ok(next) => next,
        Err(_) => match human::parse_interval(interval) {
            // First run of a duration-based job fires immediately.
            Some(_) if job.last_run_at.is_none() => Some(last_run),
            Some(duration) => last_run.checked_add(duration),
            None => match rule::evaluate(job, last_run) {
                Ok(outcome) => {
                    out.no_more_at = outcome.no_more_at;
                    out.occurrences = Some(outcome.occurrences);
                    outcome.next_run_at
                }
                Err(err) => {
                    debug!(job = %job.name, id = %job.id, %err, "recurrence rule rejected");
                    None
                }
            },
        },
    };

    let Some(next) = candidate else {
        debug!(
            job = %job.name,
            id = %job.id,
            "failed to calculate next run due to invalid repeat interval"
        );
        out.failure = Some(ScheduleError::InvalidInterval);
        return out;
    };

    match window::clamp(Some(next), job.start_runs_at, out.no_more_at) {
        Some(clamped) => {
            out.next_run_at = Some(clamped);
            if let Some(local) = timezone::normalize(clamped, tz) {
                debug!(job = %job.name, id = %job.id, next_run_at = %local.to_rfc3339(), "next run scheduled");
            }
        }
        None => {
            debug!(job = %job.name, id = %job.id, "recurrence window exhausted");
        }
    }
    out
}

fn compute_from_repeat_at(job: &JobSnapshot, phrase: &str) -> ComputedSchedule {
    debug!(job = %job.name, id = %job.id, phrase, "computing next run via repeat-at");

    let now = utc_now!();
    let last_run = job.last_run_at.unwrap_or(now);

    let mut out = ComputedSchedule::default();
    match repeat_at::next_at(phrase, job.timezone.as_deref(), last_run, now) {
        Some(next) => {
            out.next_run_at = Some(next);
            if let Some(local) = timezone::normalize(next, job.timezone.as_deref()) {
                debug!(job = %job.name, id = %job.id, next_run_at = %local.to_rfc3339(), "next run scheduled");
            }
        }
        None => {
            debug!(job = %job.name, id = %job.id, "failed to calculate repeat-at time due to invalid format");
            out.failure = Some(ScheduleError::InvalidRepeatAt);
        }
    }
    out
}
