use std::fmt;
use std::ops::Add;

use crate::duration::Duration;
use crate::parse_error::TimeParseError;

/// A wall-clock instant within a single operating day, stored as seconds
/// since 00:00:00. Not bounded to `< 86400`: a leg that overruns midnight is
/// represented rather than rejected, matching how the source treats
/// `latest_*` values that legitimately fall beyond 24h for a long night line.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Time(u32);

impl Time {
    pub const MIDNIGHT: Time = Time(0);

    pub fn from_seconds(seconds: u32) -> Self {
        Time(seconds)
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Parses a `HH:MM:SS` (or `HH:MM`, seconds default to zero) string.
    pub fn parse(string: &str) -> Result<Time, TimeParseError> {
        let parts: Vec<&str> = string.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(TimeParseError::WrongFormat(string.to_string()));
        }
        let hours: u32 = parts[0]
            .parse()
            .map_err(|_| TimeParseError::WrongFormat(string.to_string()))?;
        let minutes: u32 = parts[1]
            .parse()
            .map_err(|_| TimeParseError::WrongFormat(string.to_string()))?;
        if minutes >= 60 {
            return Err(TimeParseError::MinuteOutOfRange(string.to_string()));
        }
        let seconds: u32 = if parts.len() == 2 {
            0
        } else {
            parts[2]
                .parse()
                .map_err(|_| TimeParseError::WrongFormat(string.to_string()))?
        };
        if seconds >= 60 {
            return Err(TimeParseError::SecondOutOfRange(string.to_string()));
        }
        Ok(Time(hours * 3600 + minutes * 60 + seconds))
    }

    pub fn add_seconds(&self, delta: u32) -> Time {
        Time(self.0 + delta)
    }

    pub fn checked_sub_seconds(&self, delta: u32) -> Option<Time> {
        self.0.checked_sub(delta).map(Time)
    }

    /// `self - earlier`, as a signed seconds delta. Used by the MIP big-M
    /// construction and the event-graph sweeps, which routinely need a
    /// possibly-negative comparison between two time points.
    pub fn delta_seconds(&self, earlier: Time) -> i64 {
        self.0 as i64 - earlier.0 as i64
    }

    pub fn max(self, other: Time) -> Time {
        if self >= other {
            self
        } else {
            other
        }
    }

    pub fn min(self, other: Time) -> Time {
        if self <= other {
            self
        } else {
            other
        }
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        Time(self.0 + rhs.seconds())
    }
}

impl Add<u32> for Time {
    type Output = Time;

    fn add(self, rhs: u32) -> Time {
        Time(self.0 + rhs)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0 / 3600,
            self.0 % 3600 / 60,
            self.0 % 60
        )
    }
}
