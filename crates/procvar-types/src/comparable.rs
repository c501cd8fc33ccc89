use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, TimeDelta, Utc};

use crate::duration::Duration;
use crate::error::{Result, TypeError};
use crate::period::{DurationField, Period};
use crate::value::TypedValue;

/// The fixed instant periods are measured from: 1970-01-01T00:00:00Z.
///
/// Every comparison uses this same constant. Measuring from a moving instant
/// such as "now" would let the order between two periods change over time.
pub fn anchor() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Anything a [`ComparablePeriod`] can be ordered against.
///
/// The set is closed: a period, another comparable period, or an exact
/// duration. Dynamically typed values go through
/// [`ComparablePeriod::compare_value`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparand {
    Period(Period),
    Comparable(ComparablePeriod),
    Duration(Duration),
}

impl From<Period> for Comparand {
    fn from(period: Period) -> Self {
        Self::Period(period)
    }
}

impl From<&Period> for Comparand {
    fn from(period: &Period) -> Self {
        Self::Period(*period)
    }
}

impl From<ComparablePeriod> for Comparand {
    fn from(period: ComparablePeriod) -> Self {
        Self::Comparable(period)
    }
}

impl From<&ComparablePeriod> for Comparand {
    fn from(period: &ComparablePeriod) -> Self {
        Self::Comparable(*period)
    }
}

impl From<Duration> for Comparand {
    fn from(duration: Duration) -> Self {
        Self::Duration(duration)
    }
}

/// A [`Period`] with a total order.
///
/// Periods are normalized before comparison: a 12 month year, 31 day month,
/// 7 day week, 24 hour day, 60 minute hour and 60 second minute. Under this
/// convention `P1M` equals `P31D` and `P1Y` equals `P12M`. Comparison is
/// exact; the normalized length is held in 128 bits.
///
/// Equality and hashing both use the normalized length, so `P1M` and `P31D`
/// land in the same bucket of a hashed collection. The wrapped periods
/// themselves are still structurally different; see [`period`].
///
/// [`period`]: ComparablePeriod::period
#[derive(Clone, Copy)]
pub struct ComparablePeriod {
    period: Period,
}

impl ComparablePeriod {
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    /// Wrap the period held by a typed value.
    ///
    /// Fails with [`TypeError::InvalidArgument`] for `Null` or any other
    /// non-period value.
    pub fn from_value(value: &TypedValue) -> Result<Self> {
        match value {
            TypedValue::Period(period) => Ok(Self::new(*period)),
            TypedValue::Null => Err(TypeError::InvalidArgument {
                name: "period",
                reason: "is null".into(),
            }),
            other => Err(TypeError::InvalidArgument {
                name: "period",
                reason: format!("expected a period, got {}", other.value_type()),
            }),
        }
    }

    /// The wrapped period, unchanged.
    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn to_period(&self) -> Period {
        self.period
    }

    pub fn into_period(self) -> Period {
        self.period
    }

    pub fn normalized_millis(&self) -> i128 {
        self.period.normalized_millis()
    }

    /// The normalized length as a [`Duration`].
    pub fn to_duration(&self) -> Result<Duration> {
        i64::try_from(self.normalized_millis())
            .map(Duration::from_millis)
            .map_err(|_| TypeError::Overflow(self.period.to_string()))
    }

    /// The instant reached by applying the normalized length to [`anchor`].
    ///
    /// Returns `None` when the result is outside chrono's representable range.
    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.normalized_millis()).ok()?;
        anchor().checked_add_signed(TimeDelta::try_milliseconds(millis)?)
    }

    pub fn compare_to(&self, other: impl Into<Comparand>) -> Ordering {
        match other.into() {
            Comparand::Period(period) => self.compare_to_period(&period),
            Comparand::Comparable(other) => self.compare_to_period(other.period()),
            Comparand::Duration(duration) => self.compare_to_duration(duration),
        }
    }

    pub fn compare_to_period(&self, other: &Period) -> Ordering {
        self.normalized_millis().cmp(&other.normalized_millis())
    }

    pub fn compare_to_duration(&self, other: Duration) -> Ordering {
        self.normalized_millis()
            .cmp(&i128::from(other.as_millis()))
    }

    /// Compare against a dynamically typed value.
    ///
    /// Only periods and durations are comparable; every other type, `Null`
    /// included, is an invalid argument.
    pub fn compare_value(&self, value: &TypedValue) -> Result<Ordering> {
        match value {
            TypedValue::Period(period) => Ok(self.compare_to_period(period)),
            TypedValue::Duration(duration) => Ok(self.compare_to_duration(*duration)),
            other => Err(TypeError::InvalidArgument {
                name: "other",
                reason: format!("can not compare to value of type {}", other.value_type()),
            }),
        }
    }

    pub fn size(&self) -> usize {
        self.period.size()
    }

    pub fn field_type(&self, index: usize) -> Option<DurationField> {
        self.period.field_type(index)
    }

    pub fn value(&self, index: usize) -> Option<i32> {
        self.period.value(index)
    }

    pub fn get(&self, field: DurationField) -> i32 {
        self.period.get(field)
    }

    pub fn is_supported(&self, field: DurationField) -> bool {
        self.period.is_supported(field)
    }
}

impl From<Period> for ComparablePeriod {
    fn from(period: Period) -> Self {
        Self::new(period)
    }
}

impl From<ComparablePeriod> for Period {
    fn from(period: ComparablePeriod) -> Self {
        period.period
    }
}

impl PartialEq for ComparablePeriod {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ComparablePeriod {}

impl PartialOrd for ComparablePeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComparablePeriod {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to_period(other.period())
    }
}

impl Hash for ComparablePeriod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_millis().hash(state);
    }
}

impl PartialEq<Period> for ComparablePeriod {
    fn eq(&self, other: &Period) -> bool {
        self.compare_to_period(other) == Ordering::Equal
    }
}

impl PartialEq<ComparablePeriod> for Period {
    fn eq(&self, other: &ComparablePeriod) -> bool {
        other == self
    }
}

impl PartialOrd<Period> for ComparablePeriod {
    fn partial_cmp(&self, other: &Period) -> Option<Ordering> {
        Some(self.compare_to_period(other))
    }
}

impl PartialOrd<ComparablePeriod> for Period {
    fn partial_cmp(&self, other: &ComparablePeriod) -> Option<Ordering> {
        Some(other.compare_to_period(self).reverse())
    }
}

impl PartialEq<Duration> for ComparablePeriod {
    fn eq(&self, other: &Duration) -> bool {
        self.compare_to_duration(*other) == Ordering::Equal
    }
}

impl PartialEq<ComparablePeriod> for Duration {
    fn eq(&self, other: &ComparablePeriod) -> bool {
        other == self
    }
}

impl PartialOrd<Duration> for ComparablePeriod {
    fn partial_cmp(&self, other: &Duration) -> Option<Ordering> {
        Some(self.compare_to_duration(*other))
    }
}

impl PartialOrd<ComparablePeriod> for Duration {
    fn partial_cmp(&self, other: &ComparablePeriod) -> Option<Ordering> {
        Some(other.compare_to_duration(*self).reverse())
    }
}

impl fmt::Debug for ComparablePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComparablePeriod({})", self.period)
    }
}

impl fmt::Display for ComparablePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComparablePeriod[{}]", self.period)
    }
}
