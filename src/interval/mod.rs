use serde::{Deserialize, Serialize};
use std::fmt;

pub mod duration;
pub mod timespec;

pub use duration::ClipDuration;
pub use timespec::TimeSpec;

use crate::YtsoundError;

/// Crop window requested by the user
///
/// Built by [`Interval::validate`] as either `(None, Some(end))` or `(Some(start), Some(end))`,
/// or by [`Interval::full`] when no cropping was asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: Option<TimeSpec>,
    pub end: Option<TimeSpec>,
}

impl Interval {
    /// The whole source, no cropping
    pub fn full() -> Self {
        Self::default()
    }

    /// Turn one or two time tokens into an interval.
    ///
    /// A single token is the end mark, cropping from the beginning.
    /// Start/end ordering is checked later against the source length.
    pub fn validate<S: AsRef<str>>(tokens: &[S]) -> Result<Self, YtsoundError> {
        match tokens {
            [] => Err(YtsoundError::MalformedTime("Empty time interval".to_string())),
            [end] => Ok(Self {
                start: None,
                end: Some(TimeSpec::parse(end.as_ref())?),
            }),
            [start, end] => Ok(Self {
                start: Some(TimeSpec::parse(start.as_ref())?),
                end: Some(TimeSpec::parse(end.as_ref())?),
            }),
            _ => Err(YtsoundError::MalformedTime("Too many arguments".to_string())),
        }
    }

    pub fn is_full(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start.unwrap_or_default();
        match self.end {
            Some(end) => write!(f, "{} - {}", start, end),
            None => write!(f, "{} - end", start),
        }
    }
}
