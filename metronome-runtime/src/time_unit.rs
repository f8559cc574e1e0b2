use std::str::FromStr;
use std::time::Duration;

use crate::error::TimerError;

/// Time unit accepted in duration expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Scale a raw value into a `Duration`.
    pub fn scale(&self, value: u64) -> Duration {
        match self {
            TimeUnit::Milliseconds => Duration::from_millis(value),
            TimeUnit::Seconds => Duration::from_secs(value),
            TimeUnit::Minutes => Duration::from_secs(value * 60),
            TimeUnit::Hours => Duration::from_secs(value * 3_600),
            TimeUnit::Days => Duration::from_secs(value * 86_400),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "milliseconds" | "millisecond" | "millis" | "milli" | "ms" => {
                Ok(TimeUnit::Milliseconds)
            }
            "seconds" | "second" | "sec" | "s" => Ok(TimeUnit::Seconds),
            "minutes" | "minute" | "min" | "m" => Ok(TimeUnit::Minutes),
            "hours" | "hour" | "hr" | "h" => Ok(TimeUnit::Hours),
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            _ => Err(TimerError::InvalidDuration(s.to_string())),
        }
    }
}

/// Parse a duration expression like "500ms", "2s" or "10m".
///
/// A unit suffix is required; a bare number is rejected rather than guessed
/// at.
pub fn parse_duration(s: &str) -> Result<Duration, TimerError> {
    let s = s.trim();

    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if split == 0 || split == s.len() {
        return Err(TimerError::InvalidDuration(s.to_string()));
    }

    let (num, unit) = s.split_at(split);
    let value: u64 = num
        .parse()
        .map_err(|_| TimerError::InvalidDuration(s.to_string()))?;
    let unit: TimeUnit = unit
        .trim()
        .parse()
        .map_err(|_| TimerError::InvalidDuration(s.to_string()))?;

    Ok(unit.scale(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suffixed_expressions() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3_600));
        assert_eq!(parse_duration("2d").unwrap(), Duration::from_secs(172_800));
    }

    #[test]
    fn accepts_long_unit_names_and_whitespace() {
        assert_eq!(
            parse_duration(" 30 seconds ").unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(parse_duration("5min").unwrap(), Duration::from_secs(300));
    }

    #[test]
    fn rejects_bare_numbers_and_bare_units() {
        assert!(parse_duration("5").is_err());
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5parsecs").is_err());
    }
}
