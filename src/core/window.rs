/// Clamps a candidate next-run instant to the activation window.
///
/// First matching row wins:
///
/// | start   | end     | rule                                        |
/// |---------|---------|---------------------------------------------|
/// | absent  | absent  | keep candidate                              |
/// | present | absent  | candidate < start → start, else candidate   |
/// | absent  | present | candidate > end → expired, else candidate   |
/// | present | present | candidate < start → start; > end → expired; |
/// |         |         | otherwise keep                              |
///
/// `None` out means the window is exhausted, which is normal recurrence
/// completion, not an error. A missing candidate passes through unchanged.
pub fn clamp(candidate: Option<i64>, starts_at: Option<i64>, ends_at: Option<i64>) -> Option<i64> {
    let next = candidate?;
    match (starts_at, ends_at) {
        (None, None) => Some(next),
        (Some(start), None) => Some(if next < start { start } else { next }),
        (None, Some(end)) => (next <= end).then_some(next),
        (Some(start), Some(end)) => {
            if next < start {
                Some(start)
            } else if next > end {
                None
            } else {
                Some(next)
            }
        }
    }
}
