use crate::core::error::ScheduleError;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of the job fields that drive next-run computation.
///
/// All instants are epoch milliseconds, the representation the owning job
/// system stores. The snapshot is supplied fresh on every scheduling pass;
/// the calculator never retains it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub name: String,                      // Job name, diagnostics only
    pub id: String,                        // Job id, diagnostics only
    pub repeat_interval: Option<String>,   // Cron, human interval, or recurrence rule
    pub repeat_at: Option<String>,         // Time-of-day phrase, used when repeat_interval is absent
    pub timezone: Option<String>,          // IANA timezone name
    pub tz_offset_minutes: Option<i32>,    // UTC offset hint for rule-mode byhour derivation
    pub trigger_time: Option<i64>,         // Trigger-time hint for rule-mode byhour derivation
    pub last_run_at: Option<i64>,          // Defaults to "now" when absent
    pub previous_next_run_at: Option<i64>, // Guards against a non-advancing result
    pub start_runs_at: Option<i64>,        // Recurrence must not fire before this instant
}

impl JobSnapshot {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Result of one next-run computation, to be applied to the job record by
/// the host system.
///
/// `next_run_at == None` with `failure == None` means the recurrence is
/// finished (or no descriptor was supplied); with `failure` set it means the
/// recurrence is broken and scheduling should stop until corrected.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ComputedSchedule {
    pub next_run_at: Option<i64>,
    /// Last usable occurrence of a bounded recurrence rule; rule mode only,
    /// recomputed on every call.
    pub no_more_at: Option<i64>,
    /// All materialized rule occurrences, for diagnostics; rule mode only.
    pub occurrences: Option<Vec<i64>>,
    pub failure: Option<ScheduleError>,
}

impl ComputedSchedule {
    /// Output of a call that had nothing to compute.
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Human-readable failure reason, the argument the host passes to its
    /// own `fail` handling.
    pub fn failure_reason(&self) -> Option<String> {
        self.failure.as_ref().map(|e| e.to_string())
    }
}
