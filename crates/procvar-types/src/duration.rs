use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Exact elapsed time in signed milliseconds.
///
/// Unlike a [`Period`](crate::Period), a duration has a single scalar
/// magnitude, so its order is the plain integer order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration {
    millis: i64,
}

impl Duration {
    /// The zero-length duration.
    pub const ZERO: Self = Self { millis: 0 };

    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self {
            millis: secs.saturating_mul(1_000),
        }
    }

    pub const fn as_millis(&self) -> i64 {
        self.millis
    }

    pub const fn is_zero(&self) -> bool {
        self.millis == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.millis < 0
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}ms)", self.millis)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}

/// Truncates sub-millisecond precision toward zero.
impl From<chrono::TimeDelta> for Duration {
    fn from(delta: chrono::TimeDelta) -> Self {
        Self::from_millis(delta.num_milliseconds())
    }
}

/// `i64::MIN` milliseconds is outside chrono's range and clamps to its minimum.
impl From<Duration> for chrono::TimeDelta {
    fn from(duration: Duration) -> Self {
        chrono::TimeDelta::try_milliseconds(duration.millis)
            .unwrap_or(chrono::TimeDelta::MIN)
    }
}

impl TryFrom<std::time::Duration> for Duration {
    type Error = TypeError;

    fn try_from(duration: std::time::Duration) -> Result<Self, Self::Error> {
        i64::try_from(duration.as_millis())
            .map(Self::from_millis)
            .map_err(|_| TypeError::Overflow(format!("{duration:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_signed() {
        assert!(Duration::from_millis(-1) < Duration::ZERO);
        assert!(Duration::from_secs(1) > Duration::from_millis(999));
    }

    #[test]
    fn from_secs_scales() {
        assert_eq!(Duration::from_secs(3).as_millis(), 3_000);
        assert_eq!(Duration::from_secs(i64::MAX).as_millis(), i64::MAX);
    }

    #[test]
    fn chrono_conversion_truncates() {
        let delta = chrono::TimeDelta::microseconds(2_999);
        assert_eq!(Duration::from(delta), Duration::from_millis(2));
        let back: chrono::TimeDelta = Duration::from_millis(1_500).into();
        assert_eq!(back.num_milliseconds(), 1_500);
    }

    #[test]
    fn chrono_conversion_clamps_at_minimum() {
        let min: chrono::TimeDelta = Duration::from_millis(i64::MIN).into();
        assert_eq!(min, chrono::TimeDelta::MIN);
        let max: chrono::TimeDelta = Duration::from_millis(i64::MAX).into();
        assert_eq!(max.num_milliseconds(), i64::MAX);
    }

    #[test]
    fn std_conversion() {
        let d = Duration::try_from(std::time::Duration::from_millis(42)).unwrap();
        assert_eq!(d.as_millis(), 42);
        let err = Duration::try_from(std::time::Duration::MAX).unwrap_err();
        assert!(matches!(err, TypeError::Overflow(_)));
    }

    #[test]
    fn display_format() {
        assert_eq!(Duration::from_millis(-250).to_string(), "-250ms");
    }

    #[test]
    fn serde_is_bare_integer() {
        let json = serde_json::to_string(&Duration::from_millis(1234)).unwrap();
        assert_eq!(json, "1234");
        let parsed: Duration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_millis(), 1234);
    }
}
