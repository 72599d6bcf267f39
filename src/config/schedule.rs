//! Poll schedule expressions.
//!
//! Accepted forms:
//! - plain seconds: `"90"`
//! - single-unit durations: `"45s"`, `"30m"`, `"2h"`, `"1d"`
//! - cron step expressions, minute resolution (`"*/30 * * * *"`, `"* * * * *"`,
//!   `"0 */2 * * *"`, `"0 * * * *"`) or with a leading seconds field
//!   (`"*/15 * * * * *"`)
//!
//! Cron steps are run as fixed intervals from startup, not aligned to the
//! wall clock. A step must divide its field evenly (60 seconds, 60 minutes,
//! 24 hours) so that the fixed interval matches what cron would fire;
//! `*/7` or `*/90` minutes are rejected.

use std::time::Duration;
use thiserror::Error;

/// Errors produced while parsing a schedule expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("schedule expression is empty")]
    Empty,

    #[error("schedule interval must be greater than zero")]
    Zero,

    #[error("unsupported schedule expression '{0}'")]
    Unsupported(String),
}

/// Parse a schedule expression into a fixed poll interval.
pub fn parse_interval(expr: &str) -> Result<Duration, IntervalError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(IntervalError::Empty);
    }

    let fields: Vec<&str> = expr.split_whitespace().collect();
    let secs = match fields.len() {
        1 => parse_duration(expr)?,
        5 => parse_cron(&fields).ok_or_else(|| unsupported(expr))?,
        6 if fields[0] == "*" || fields[0].starts_with("*/") => {
            // Leading seconds field; the remaining five must be wildcards.
            if fields[1..].iter().all(|f| *f == "*") {
                step(fields[0], 60).ok_or_else(|| unsupported(expr))?
            } else {
                return Err(unsupported(expr));
            }
        }
        _ => return Err(unsupported(expr)),
    };

    if secs == 0 {
        return Err(IntervalError::Zero);
    }
    Ok(Duration::from_secs(secs))
}

fn unsupported(expr: &str) -> IntervalError {
    IntervalError::Unsupported(expr.to_string())
}

fn parse_duration(expr: &str) -> Result<u64, IntervalError> {
    let split = expr
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(expr.len());
    let (digits, unit) = expr.split_at(split);
    let value: u64 = digits.parse().map_err(|_| unsupported(expr))?;

    let multiplier = match unit {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return Err(unsupported(expr)),
    };
    value.checked_mul(multiplier).ok_or_else(|| unsupported(expr))
}

/// Minute-resolution five-field cron. Returns the interval in seconds.
fn parse_cron(fields: &[&str]) -> Option<u64> {
    let (minute, hour, rest) = (fields[0], fields[1], &fields[2..]);
    if !rest.iter().all(|f| *f == "*") {
        return None;
    }

    if hour == "*" {
        // Every N minutes, or hourly on a fixed minute.
        if let Some(n) = step(minute, 60) {
            return n.checked_mul(60);
        }
        return minute.parse::<u8>().ok().filter(|m| *m < 60).map(|_| 60 * 60);
    }

    // Every N hours on a fixed minute.
    let n = step(hour, 24)?;
    minute.parse::<u8>().ok().filter(|m| *m < 60)?;
    n.checked_mul(60 * 60)
}

/// `*` is a step of one, `*/N` a step of N. Steps that do not divide `span`
/// are rejected; zero is passed through so the caller reports it.
fn step(field: &str, span: u64) -> Option<u64> {
    if field == "*" {
        return Some(1);
    }
    let n: u64 = field.strip_prefix("*/")?.parse().ok()?;
    (n == 0 || span % n == 0).then_some(n)
}
