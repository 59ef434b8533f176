//! Compact duration strings such as `"10m"`, `"1h30m"` or `"1d 12h"`.
//!
//! A duration is one or more `<digits><unit>` components, optionally separated
//! by whitespace. Units are `w`, `d`, `h`, `m` and `s`, in either case.
//! Components are summed, so `"90s"` and `"1m30s"` are the same duration.

use std::time::Duration;

/// Reasons a duration string can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationParseError {
    #[error("duration is empty")]
    Empty,

    #[error("number {0} has no unit (expected one of w, d, h, m, s)")]
    MissingUnit(String),

    #[error("unknown duration unit '{0}'")]
    UnknownUnit(char),

    #[error("unit '{0}' is not preceded by a number")]
    MissingNumber(char),

    #[error("duration is too large")]
    Overflow,
}

fn unit_seconds(unit: char) -> Option<u64> {
    match unit.to_ascii_lowercase() {
        'w' => Some(7 * 24 * 60 * 60),
        'd' => Some(24 * 60 * 60),
        'h' => Some(60 * 60),
        'm' => Some(60),
        's' => Some(1),
        _ => None,
    }
}

/// Parses a compact duration string.
///
/// # Examples
///
/// ```rust
/// use rewardable_activities::limiter::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("10m"), Ok(Duration::from_secs(600)));
/// assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5400)));
/// assert!(parse_duration("ten minutes").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let mut total: u64 = 0;
    let mut number = String::new();

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            number.push(ch);
        } else if ch.is_ascii_whitespace() {
            if !number.is_empty() {
                return Err(DurationParseError::MissingUnit(number));
            }
        } else {
            let seconds = unit_seconds(ch).ok_or(DurationParseError::UnknownUnit(ch))?;
            if number.is_empty() {
                return Err(DurationParseError::MissingNumber(ch));
            }
            let amount: u64 = number.parse().map_err(|_| DurationParseError::Overflow)?;
            let component = amount
                .checked_mul(seconds)
                .ok_or(DurationParseError::Overflow)?;
            total = total
                .checked_add(component)
                .ok_or(DurationParseError::Overflow)?;
            number.clear();
        }
    }

    if !number.is_empty() {
        return Err(DurationParseError::MissingUnit(number));
    }

    Ok(Duration::from_secs(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_components() {
        assert_eq!(parse_duration("45s"), Ok(Duration::from_secs(45)));
        assert_eq!(parse_duration("10m"), Ok(Duration::from_secs(600)));
        assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
        assert_eq!(parse_duration("1d"), Ok(Duration::from_secs(86_400)));
        assert_eq!(parse_duration("1w"), Ok(Duration::from_secs(604_800)));
    }

    #[test]
    fn test_combined_components() {
        assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5400)));
        assert_eq!(parse_duration("1d 12h"), Ok(Duration::from_secs(129_600)));
        assert_eq!(parse_duration("1m30s"), parse_duration("90s"));
    }

    #[test]
    fn test_units_are_case_insensitive() {
        assert_eq!(parse_duration("10M"), Ok(Duration::from_secs(600)));
        assert_eq!(parse_duration(" 5S "), Ok(Duration::from_secs(5)));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(parse_duration(""), Err(DurationParseError::Empty));
        assert_eq!(parse_duration("   "), Err(DurationParseError::Empty));
        assert_eq!(
            parse_duration("10"),
            Err(DurationParseError::MissingUnit("10".to_string()))
        );
        assert_eq!(
            parse_duration("10 m"),
            Err(DurationParseError::MissingUnit("10".to_string()))
        );
        assert_eq!(parse_duration("m"), Err(DurationParseError::MissingNumber('m')));
        assert_eq!(parse_duration("5y"), Err(DurationParseError::UnknownUnit('y')));
        assert_eq!(parse_duration("-5m"), Err(DurationParseError::UnknownUnit('-')));
    }

    #[test]
    fn test_rejects_overflow() {
        assert_eq!(
            parse_duration("99999999999999999999s"),
            Err(DurationParseError::Overflow)
        );
        assert_eq!(
            parse_duration("18446744073709551615w"),
            Err(DurationParseError::Overflow)
        );
    }

    #[test]
    fn test_zero_is_a_valid_parse() {
        assert_eq!(parse_duration("0s"), Ok(Duration::ZERO));
    }
}
