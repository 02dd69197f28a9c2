//! Date helper exposed to templates as the `format` function.
//!
//! Supports calls like:
//! - `format("%Y-%m-%d")` formats the invocation date
//! - `format("%A", "2024-03-01")` formats an explicit date
//! - `format("%Y-%m-%d", "+1d")`, `format("%d %B", "-2w")` offset the invocation date
//! - `format("%Y-%m-%d", "-monday")` previous Monday, `"+fri"` next Friday

use std::fmt::Write;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, Weekday};
use regex::Regex;
use thiserror::Error;

/// Error type for date parsing, offsets and formatting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateMathError {
    #[error("invalid date: {0} (expected YYYY-MM-DD, RFC 3339, or 'today')")]
    InvalidDate(String),

    #[error("invalid date offset: {0}")]
    InvalidOffset(String),

    #[error("invalid duration unit: {0}")]
    InvalidUnit(String),

    #[error("invalid number in offset: {0}")]
    InvalidNumber(String),

    #[error("invalid format pattern: {0}")]
    InvalidFormat(String),
}

/// An offset relative to a base date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOffset {
    /// +/- N units
    Duration { amount: i64, unit: DurationUnit },
    /// Previous/next occurrence of a weekday.
    Weekday { weekday: Weekday, direction: Direction },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Days,
    Weeks,
    Months,
    Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous, // -
    Next,     // +
}

static OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])\s*(\d+)([dwMmyY])$").unwrap());

/// The date-formatting capability bound into every render scope.
///
/// Holds the invocation date as given on the command line; it is only parsed
/// when a call actually needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    base: String,
}

impl DateFormatter {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Format `when` (or the invocation date) with a strftime `pattern`.
    ///
    /// `when` is either an absolute date or an offset such as `+3d`.
    pub fn format(
        &self,
        pattern: &str,
        when: Option<&str>,
    ) -> Result<String, DateMathError> {
        let date = match when.map(str::trim) {
            None => parse_date(&self.base)?,
            Some(w) if is_offset(w) => {
                let offset = parse_offset(w)?;
                apply_offset(parse_date(&self.base)?, &offset)
                    .ok_or_else(|| DateMathError::InvalidOffset(w.to_string()))?
            }
            Some(w) => parse_date(w)?,
        };
        format_date(date, pattern)
    }
}

/// Parse an absolute date: `today`, `YYYY-MM-DD`, or an RFC 3339 timestamp.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateMathError> {
    let s = input.trim();
    if s.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .map_err(|_| DateMathError::InvalidDate(input.to_string()))
}

/// Check if a string looks like a relative offset (`+1d`, `-monday`).
pub fn is_offset(s: &str) -> bool {
    s.starts_with('+') || s.starts_with('-')
}

/// Parse an offset like `+1d`, `-2w`, `+1M`, `+1y`, `-monday`.
pub fn parse_offset(input: &str) -> Result<DateOffset, DateMathError> {
    let s = input.trim();
    let direction = if s.starts_with('+') {
        Direction::Next
    } else if s.starts_with('-') {
        Direction::Previous
    } else {
        return Err(DateMathError::InvalidOffset(input.to_string()));
    };

    if let Some(weekday) = parse_weekday(s[1..].trim()) {
        return Ok(DateOffset::Weekday { weekday, direction });
    }

    let caps = OFFSET_RE
        .captures(s)
        .ok_or_else(|| DateMathError::InvalidOffset(input.to_string()))?;

    let amount: i64 =
        caps[2].parse().map_err(|_| DateMathError::InvalidNumber(caps[2].to_string()))?;

    let unit = match &caps[3] {
        "d" => DurationUnit::Days,
        "w" => DurationUnit::Weeks,
        "M" | "m" => DurationUnit::Months,
        "y" | "Y" => DurationUnit::Years,
        u => return Err(DateMathError::InvalidUnit(u.to_string())),
    };

    let amount = match direction {
        Direction::Next => amount,
        Direction::Previous => -amount,
    };

    Ok(DateOffset::Duration { amount, unit })
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Apply an offset; `None` when the result is out of chrono's range.
pub fn apply_offset(date: NaiveDate, offset: &DateOffset) -> Option<NaiveDate> {
    match offset {
        DateOffset::Duration { amount, unit } => match unit {
            DurationUnit::Days => date.checked_add_signed(Duration::try_days(*amount)?),
            DurationUnit::Weeks => {
                date.checked_add_signed(Duration::try_weeks(*amount)?)
            }
            DurationUnit::Months => add_months(date, *amount),
            DurationUnit::Years => add_months(date, amount.checked_mul(12)?),
        },
        DateOffset::Weekday { weekday, direction } => {
            Some(find_relative_weekday(date, *weekday, *direction))
        }
    }
}

// Day-of-month is clamped (Jan 31 + 1M = Feb 28/29).
fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let n = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 { date.checked_add_months(n) } else { date.checked_sub_months(n) }
}

fn find_relative_weekday(
    date: NaiveDate,
    target: Weekday,
    direction: Direction,
) -> NaiveDate {
    let current = i64::from(date.weekday().num_days_from_monday());
    let target = i64::from(target.num_days_from_monday());

    // Never returns `date` itself: "-monday" on a Monday is a week back.
    match direction {
        Direction::Previous => {
            let diff = (current - target + 7) % 7;
            date - Duration::days(if diff == 0 { 7 } else { diff })
        }
        Direction::Next => {
            let diff = (target - current + 7) % 7;
            date + Duration::days(if diff == 0 { 7 } else { diff })
        }
    }
}

/// Format a date with a strftime pattern, rejecting invalid or time-only
/// specifiers instead of panicking.
pub fn format_date(date: NaiveDate, pattern: &str) -> Result<String, DateMathError> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern))
        .map_err(|_| DateMathError::InvalidFormat(pattern.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date("2024-01-15").unwrap(), ymd(2024, 1, 15));
        assert_eq!(parse_date(" 2024-01-15 ").unwrap(), ymd(2024, 1, 15));
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(parse_date("2024-06-01T10:30:00+02:00").unwrap(), ymd(2024, 6, 1));
    }

    #[test]
    fn test_parse_today() {
        assert_eq!(parse_date("today").unwrap(), Local::now().date_naive());
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(matches!(parse_date("yesterday-ish"), Err(DateMathError::InvalidDate(_))));
    }

    #[test]
    fn test_parse_offset_days() {
        assert_eq!(
            parse_offset("+1d").unwrap(),
            DateOffset::Duration { amount: 1, unit: DurationUnit::Days }
        );
        assert_eq!(
            parse_offset("-2w").unwrap(),
            DateOffset::Duration { amount: -2, unit: DurationUnit::Weeks }
        );
    }

    #[test]
    fn test_parse_offset_weekday() {
        assert_eq!(
            parse_offset("-monday").unwrap(),
            DateOffset::Weekday { weekday: Weekday::Mon, direction: Direction::Previous }
        );
        assert_eq!(
            parse_offset("+fri").unwrap(),
            DateOffset::Weekday { weekday: Weekday::Fri, direction: Direction::Next }
        );
    }

    #[test]
    fn test_parse_offset_errors() {
        assert!(matches!(parse_offset("+1x"), Err(DateMathError::InvalidOffset(_))));
        assert!(matches!(parse_offset("1d"), Err(DateMathError::InvalidOffset(_))));
    }

    #[test]
    fn test_add_months_clamps() {
        let d = apply_offset(
            ymd(2024, 1, 31),
            &DateOffset::Duration { amount: 1, unit: DurationUnit::Months },
        );
        assert_eq!(d, Some(ymd(2024, 2, 29)));

        let d = apply_offset(
            ymd(2023, 3, 31),
            &DateOffset::Duration { amount: -1, unit: DurationUnit::Months },
        );
        assert_eq!(d, Some(ymd(2023, 2, 28)));
    }

    #[test]
    fn test_relative_weekday_skips_same_day() {
        // 2024-01-15 is a Monday
        let monday = ymd(2024, 1, 15);
        let prev = apply_offset(
            monday,
            &DateOffset::Weekday { weekday: Weekday::Mon, direction: Direction::Previous },
        );
        assert_eq!(prev, Some(ymd(2024, 1, 8)));

        let next = apply_offset(
            monday,
            &DateOffset::Weekday { weekday: Weekday::Fri, direction: Direction::Next },
        );
        assert_eq!(next, Some(ymd(2024, 1, 19)));
    }

    #[test]
    fn test_formatter_uses_base_date() {
        let f = DateFormatter::new("2024-01-15");
        assert_eq!(f.format("%d/%m/%Y", None).unwrap(), "15/01/2024");
        assert_eq!(f.format("%A", None).unwrap(), "Monday");
    }

    #[test]
    fn test_formatter_offset_and_explicit_date() {
        let f = DateFormatter::new("2024-01-15");
        assert_eq!(f.format("%Y-%m-%d", Some("+1d")).unwrap(), "2024-01-16");
        assert_eq!(f.format("%Y-%m-%d", Some("1999-12-31")).unwrap(), "1999-12-31");
    }

    #[test]
    fn test_formatter_bad_base_only_fails_when_used() {
        let f = DateFormatter::new("someday");
        assert_eq!(f.format("%Y", Some("2020-05-05")).unwrap(), "2020");
        assert!(matches!(f.format("%Y", None), Err(DateMathError::InvalidDate(_))));
    }

    #[test]
    fn test_format_rejects_time_specifiers() {
        assert!(matches!(
            format_date(ymd(2024, 1, 1), "%H:%M"),
            Err(DateMathError::InvalidFormat(_))
        ));
    }
}
