const SECOND: i64 = 1000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Parses a human-readable duration phrase into milliseconds.
///
/// Accepts one or more `<number> <unit>` components ("2 hours",
/// "1 hour and 30 minutes", "two weeks"), where the number may be digits or
/// a small number word, and a bare integer, which is taken as milliseconds.
/// Returns `None` when the phrase is not a duration, which the fallback
/// chain treats as "try the next syntax".
pub fn parse_interval(input: &str) -> Option<i64> {
    let cleaned = input.trim().to_lowercase();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(millis) = cleaned.parse::<i64>() {
        return Some(millis);
    }

    let mut total: i64 = 0;
    let mut pending: Option<i64> = None;
    let mut matched_unit = false;

    let tokens = cleaned
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty() && *t != "and");

    for token in tokens {
        if let Some(n) = parse_number(token) {
            if pending.is_some() {
                return None;
            }
            pending = Some(n);
        } else if let Some(unit) = unit_millis(token) {
            let n = pending.take()?;
            total = total.checked_add(n.checked_mul(unit)?)?;
            matched_unit = true;
        } else {
            return None;
        }
    }

    // A trailing number without a unit is not a duration.
    if pending.is_some() || !matched_unit {
        return None;
    }
    Some(total)
}

fn parse_number(token: &str) -> Option<i64> {
    if let Ok(n) = token.parse::<i64>() {
        return Some(n);
    }
    match token {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        _ => None,
    }
}

fn unit_millis(token: &str) -> Option<i64> {
    match token {
        "second" | "seconds" | "sec" | "secs" => Some(SECOND),
        "minute" | "minutes" | "min" | "mins" => Some(MINUTE),
        "hour" | "hours" | "hr" | "hrs" => Some(HOUR),
        "day" | "days" => Some(DAY),
        "week" | "weeks" | "wk" | "wks" => Some(WEEK),
        "month" | "months" => Some(MONTH),
        "year" | "years" | "yr" | "yrs" => Some(YEAR),
        _ => None,
    }
}
