use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::YtsoundError;

const INVALID_TIME: &str = "Invalid time interval";

/// A clock value given as `m` or `m:s` on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSpec {
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeSpec {
    pub fn new(minutes: u64, seconds: u64) -> Self {
        Self { minutes, seconds }
    }

    /// Parse a user supplied time token.
    ///
    /// A lone number is taken as minutes. In `m:s` form a single seconds digit
    /// counts as tens of seconds, so `5:3` means five minutes thirty.
    pub fn parse(token: &str) -> Result<Self, YtsoundError> {
        let parts: Vec<&str> = token.split(':').collect();
        if parts.len() > 2 {
            return Err(malformed());
        }

        if !parts.iter().all(|part| is_digits(part)) {
            return Err(malformed());
        }

        let minutes = parse_number(parts[0])?;
        let seconds = match parts.get(1) {
            None => 0,
            // Trailing zero: "3" is read as "30"
            Some(secs) if secs.len() == 1 => parse_number(secs)? * 10,
            Some(secs) => parse_number(secs)?,
        };

        // The mark has to be representable in seconds
        minutes
            .checked_mul(60)
            .and_then(|secs| secs.checked_add(seconds))
            .ok_or_else(malformed)?;

        Ok(Self { minutes, seconds })
    }

    /// Saturates, so an unrepresentable mark is past the end of any source
    pub fn total_seconds(&self) -> u64 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }
}

impl FromStr for TimeSpec {
    type Err = YtsoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

fn parse_number(part: &str) -> Result<u64, YtsoundError> {
    part.parse::<u64>().map_err(|_| malformed())
}

fn malformed() -> YtsoundError {
    YtsoundError::MalformedTime(INVALID_TIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(token: &str) -> String {
        TimeSpec::parse(token).unwrap().to_string()
    }

    #[test]
    fn test_parse_minutes_only() {
        assert_eq!(render("5"), "05:00");
        assert_eq!(render("0"), "00:00");
        assert_eq!(render("120"), "120:00");
    }

    #[test]
    fn test_parse_minutes_and_seconds() {
        assert_eq!(render("15:45"), "15:45");
        assert_eq!(render("1:00"), "01:00");
        assert_eq!(render("2:30"), "02:30");
    }

    #[test]
    fn test_single_seconds_digit_is_tens() {
        assert_eq!(render("5:3"), "05:30");
        assert_eq!(TimeSpec::parse("5:3").unwrap().total_seconds(), 330);
        assert_eq!(render("0:0"), "00:00");
    }

    #[test]
    fn test_seconds_not_range_checked() {
        let spec = TimeSpec::parse("1:75").unwrap();
        assert_eq!(spec, TimeSpec::new(1, 75));
        assert_eq!(spec.total_seconds(), 135);
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for token in ["5:30:10", "ab", "", "5:", ":30", "1:3a", "-1", "1.5", " 5"] {
            match TimeSpec::parse(token) {
                Err(YtsoundError::MalformedTime(msg)) => assert_eq!(msg, "Invalid time interval"),
                other => panic!("expected MalformedTime for {:?}, got {:?}", token, other),
            }
        }
    }

    #[test]
    fn test_rejects_overflowing_numbers() {
        assert!(TimeSpec::parse("99999999999999999999999").is_err());
        // Fits in u64 as minutes but not as seconds
        assert!(matches!(
            TimeSpec::parse("307445734561825861"),
            Err(YtsoundError::MalformedTime(_))
        ));
        assert_eq!(TimeSpec::parse("307445734561825860:15").unwrap().total_seconds(), u64::MAX);
        assert!(TimeSpec::parse("307445734561825860:16").is_err());
    }

    #[test]
    fn test_total_seconds_saturates() {
        assert_eq!(TimeSpec::new(u64::MAX / 2, 59).total_seconds(), u64::MAX);
    }

    #[test]
    fn test_from_str() {
        let spec: TimeSpec = "3:15".parse().unwrap();
        assert_eq!(spec, TimeSpec::new(3, 15));
    }
}
