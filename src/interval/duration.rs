use serde::{Deserialize, Serialize};
use std::fmt;

use super::Interval;
use crate::YtsoundError;

/// Length of the audio that ends up in the final file, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipDuration(u64);

impl ClipDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Check `interval` against the source length and return the length of the cropped clip.
    pub fn compute(source_secs: u64, interval: &Interval) -> Result<Self, YtsoundError> {
        let start = interval.start.map(|t| t.total_seconds());
        let end = interval.end.map(|t| t.total_seconds());

        if start.is_some_and(|s| s > source_secs) {
            return Err(YtsoundError::Range(
                "Start of the cropped video exceeds video length".to_string(),
            ));
        }

        if end.is_some_and(|e| e > source_secs) {
            return Err(YtsoundError::Range(
                "End of the cropped video exceeds video length".to_string(),
            ));
        }

        let secs = match (start, end) {
            (Some(s), Some(e)) if s > e => {
                return Err(YtsoundError::Range(
                    "Start of the interval is bigger than the end".to_string(),
                ));
            }
            (Some(s), Some(e)) => e - s,
            (None, Some(e)) => e,
            (Some(s), None) => source_secs - s,
            (None, None) => source_secs,
        };

        Ok(Self(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClipDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}
