use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// A non-negative length of time in whole seconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct Duration(u32);

impl Duration {
    pub fn zero() -> Duration {
        Duration(0)
    }

    pub fn from_seconds(seconds: u32) -> Duration {
        Duration(seconds)
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }

    pub fn in_minutes(&self) -> f64 {
        self.0 as f64 / 60.0
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, other: Duration) -> Duration {
        Duration(self.0 + other.0)
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, other: Duration) -> Duration {
        assert!(
            self >= other,
            "cannot subtract a longer duration ({}) from a shorter one ({})",
            other,
            self
        );
        Duration(self.0 - other.0)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::zero(), |a, b| a + b)
    }
}

impl fmt::Display for Duration {
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
