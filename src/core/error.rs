use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, thiserror::Error)]
/// Terminal failure reported to the owning job system.
///
/// A value of this type stands in for the `fail(reason)` call the host is
/// expected to apply to its job record; the `Display` output is the
/// human-readable reason string.
pub enum ScheduleError {
    /// None of the recurrence syntaxes (cron, human interval, recurrence
    /// rule) produced a valid instant for the interval string.
    #[error("invalid recurrence interval")]
    InvalidInterval,

    /// The fixed time-of-day phrase could not be resolved to an instant.
    #[error("invalid repeat-at format")]
    InvalidRepeatAt,
}
