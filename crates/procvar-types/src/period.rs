use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TypeError};

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;
const MILLIS_PER_MONTH: i64 = 31 * MILLIS_PER_DAY;
const MILLIS_PER_YEAR: i64 = 12 * MILLIS_PER_MONTH;

/// A named component of a [`Period`].
///
/// Variants are declared in canonical order, largest unit first. Periods
/// iterate their fields in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationField {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Millis,
}

impl DurationField {
    /// All fields in canonical order.
    pub const ALL: [DurationField; 8] = [
        Self::Years,
        Self::Months,
        Self::Weeks,
        Self::Days,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
        Self::Millis,
    ];

    /// Fixed length of one unit of this field, in milliseconds.
    pub const fn unit_millis(self) -> i64 {
        match self {
            Self::Years => MILLIS_PER_YEAR,
            Self::Months => MILLIS_PER_MONTH,
            Self::Weeks => MILLIS_PER_WEEK,
            Self::Days => MILLIS_PER_DAY,
            Self::Hours => MILLIS_PER_HOUR,
            Self::Minutes => MILLIS_PER_MINUTE,
            Self::Seconds => MILLIS_PER_SECOND,
            Self::Millis => 1,
        }
    }

    /// Lowercase field name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Millis => "millis",
        }
    }

    /// ISO-8601 designator. Millis have none; they are folded into seconds.
    fn designator(self) -> Option<char> {
        match self {
            Self::Years => Some('Y'),
            Self::Months => Some('M'),
            Self::Weeks => Some('W'),
            Self::Days => Some('D'),
            Self::Hours => Some('H'),
            Self::Minutes => Some('M'),
            Self::Seconds => Some('S'),
            Self::Millis => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DurationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const DATE_FIELDS: [DurationField; 4] = [
    DurationField::Years,
    DurationField::Months,
    DurationField::Weeks,
    DurationField::Days,
];

const TIME_FIELDS: [DurationField; 3] = [
    DurationField::Hours,
    DurationField::Minutes,
    DurationField::Seconds,
];

/// A calendar-style duration made of separate named fields.
///
/// A period holds at most one value per [`DurationField`]. A field that is
/// present with value `0` is still *supported* and counted by [`size`], while
/// [`get`] reads an absent field as `0`. Periods compare structurally; use
/// [`ComparablePeriod`](crate::ComparablePeriod) for the normalized order.
///
/// The text form is ISO-8601 (`P1Y2M3W4DT5H6M7.008S`). It omits zero-valued
/// fields and folds millis into seconds, so parsing it back keeps the
/// normalized length but not necessarily the fields. Serialization is exact:
/// a map from field name to value (`{"seconds":1,"millis":500}`). A text
/// period is also accepted on input.
///
/// [`size`]: Period::size
/// [`get`]: Period::get
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Period {
    values: [Option<i32>; 8],
}

impl Period {
    /// An empty period (no fields).
    pub const fn new() -> Self {
        Self { values: [None; 8] }
    }

    /// The zero-length period. Same as [`Period::new`].
    pub const fn zero() -> Self {
        Self::new()
    }

    pub fn years(years: i32) -> Self {
        Self::new().with(DurationField::Years, years)
    }

    pub fn months(months: i32) -> Self {
        Self::new().with(DurationField::Months, months)
    }

    pub fn weeks(weeks: i32) -> Self {
        Self::new().with(DurationField::Weeks, weeks)
    }

    pub fn days(days: i32) -> Self {
        Self::new().with(DurationField::Days, days)
    }

    pub fn hours(hours: i32) -> Self {
        Self::new().with(DurationField::Hours, hours)
    }

    pub fn minutes(minutes: i32) -> Self {
        Self::new().with(DurationField::Minutes, minutes)
    }

    pub fn seconds(seconds: i32) -> Self {
        Self::new().with(DurationField::Seconds, seconds)
    }

    pub fn millis(millis: i32) -> Self {
        Self::new().with(DurationField::Millis, millis)
    }

    /// Return a copy with `field` set to `value`, overwriting any previous value.
    pub fn with(mut self, field: DurationField, value: i32) -> Self {
        self.values[field.index()] = Some(value);
        self
    }

    /// Return a copy with `field` removed.
    pub fn without(mut self, field: DurationField) -> Self {
        self.values[field.index()] = None;
        self
    }

    /// Number of fields present.
    pub fn size(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Field type of the `index`-th present field.
    pub fn field_type(&self, index: usize) -> Option<DurationField> {
        self.iter().nth(index).map(|(field, _)| field)
    }

    /// Value of the `index`-th present field.
    pub fn value(&self, index: usize) -> Option<i32> {
        self.iter().nth(index).map(|(_, value)| value)
    }

    /// Value of `field`, or `0` when the field is absent.
    pub fn get(&self, field: DurationField) -> i32 {
        self.values[field.index()].unwrap_or(0)
    }

    /// Returns `true` if `field` is present, even with value `0`.
    pub fn is_supported(&self, field: DurationField) -> bool {
        self.values[field.index()].is_some()
    }

    /// Returns `true` if every present field is zero.
    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, value)| value == 0)
    }

    /// Present fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (DurationField, i32)> + '_ {
        DurationField::ALL
            .into_iter()
            .filter_map(move |field| self.values[field.index()].map(|value| (field, value)))
    }

    /// Exact length in milliseconds under the fixed calendar convention.
    ///
    /// The accumulator is 128 bits wide, so no combination of `i32` fields
    /// can overflow.
    pub fn normalized_millis(&self) -> i128 {
        self.iter()
            .map(|(field, value)| i128::from(value) * i128::from(field.unit_millis()))
            .sum()
    }
}

impl fmt::Debug for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Period");
        for (field, value) in self.iter() {
            s.field(field.name(), &value);
        }
        s.finish()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.get(DurationField::Hours);
        let minutes = self.get(DurationField::Minutes);
        let total_millis = i64::from(self.get(DurationField::Seconds)) * MILLIS_PER_SECOND
            + i64::from(self.get(DurationField::Millis));
        let has_date = DATE_FIELDS.iter().any(|&field| self.get(field) != 0);
        let has_time = hours != 0 || minutes != 0 || total_millis != 0;
        if !has_date && !has_time {
            return f.write_str("PT0S");
        }

        f.write_str("P")?;
        for field in DATE_FIELDS {
            let value = self.get(field);
            if value != 0 {
                write!(f, "{value}{}", field.designator().unwrap_or('?'))?;
            }
        }
        if !has_time {
            return Ok(());
        }

        f.write_str("T")?;
        if hours != 0 {
            write!(f, "{hours}H")?;
        }
        if minutes != 0 {
            write!(f, "{minutes}M")?;
        }
        if total_millis != 0 {
            let sign = if total_millis < 0 { "-" } else { "" };
            let abs = total_millis.unsigned_abs();
            let whole = abs / MILLIS_PER_SECOND as u64;
            let frac = abs % MILLIS_PER_SECOND as u64;
            if frac == 0 {
                write!(f, "{sign}{whole}S")?;
            } else {
                write!(f, "{sign}{whole}.{frac:03}S")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Period {
    type Err = TypeError;

    fn from_str(input: &str) -> Result<Self> {
        let body = input
            .strip_prefix('P')
            .ok_or_else(|| invalid(input, "missing leading 'P'"))?;
        let (date, time) = match body.split_once('T') {
            Some((_, "")) => return Err(invalid(input, "empty time part")),
            Some((date, time)) => (date, Some(time)),
            None => (body, None),
        };
        if date.is_empty() && time.is_none() {
            return Err(invalid(input, "no components"));
        }

        let period = parse_components(input, date, &DATE_FIELDS, Period::new())?;
        match time {
            Some(time) => parse_components(input, time, &TIME_FIELDS, period),
            None => Ok(period),
        }
    }
}

/// Parse `<number><designator>` pairs; designators must follow `allowed` order.
fn parse_components(
    input: &str,
    part: &str,
    allowed: &[DurationField],
    mut period: Period,
) -> Result<Period> {
    let mut rest = part;
    let mut next = 0;

    while !rest.is_empty() {
        let end = rest
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| invalid(input, "number without designator"))?;
        let (number, tail) = rest.split_at(end);
        let designator = char::from(tail.as_bytes()[0]);
        rest = &tail[1..];

        let pos = allowed[next..]
            .iter()
            .position(|field| field.designator() == Some(designator))
            .map(|pos| pos + next)
            .ok_or_else(|| invalid(input, &format!("unexpected designator '{designator}'")))?;
        next = pos + 1;

        let field = allowed[pos];
        if field == DurationField::Seconds {
            period = parse_seconds(input, number, period)?;
        } else if number.contains(['.', ',']) {
            return Err(invalid(input, "fractions are only allowed on seconds"));
        } else {
            period = period.with(field, parse_int(input, number)?);
        }
    }
    Ok(period)
}

/// Parse the seconds component into the seconds and millis fields.
///
/// Whole seconds beyond the `i32` range carry into millis. A fraction always
/// sets the millis field.
fn parse_seconds(input: &str, number: &str, period: Period) -> Result<Period> {
    let (whole, frac) = match number.split_once(['.', ',']) {
        Some((whole, frac)) => (whole, Some(parse_fraction(input, frac)?)),
        None => (number, None),
    };
    let negative = whole.starts_with('-');
    let whole: i64 = parse_int(input, whole)?;
    let frac = i128::from(frac.unwrap_or(0));
    let unit = i128::from(MILLIS_PER_SECOND);
    let total = i128::from(whole) * unit + if negative { -frac } else { frac };

    let seconds = (total / unit).clamp(i128::from(i32::MIN), i128::from(i32::MAX));
    let millis = i32::try_from(total - seconds * unit)
        .map_err(|_| invalid(input, &format!("seconds {number:?} out of range")))?;
    let period = period.with(DurationField::Seconds, seconds as i32);
    Ok(if millis != 0 || number.contains(['.', ',']) {
        period.with(DurationField::Millis, millis)
    } else {
        period
    })
}

fn parse_int<T: FromStr>(input: &str, number: &str) -> Result<T> {
    let digits = number.strip_prefix(['-', '+']).unwrap_or(number);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(input, &format!("malformed number {number:?}")));
    }
    number
        .parse()
        .map_err(|_| invalid(input, &format!("number {number:?} out of range")))
}

fn parse_fraction(input: &str, frac: &str) -> Result<i32> {
    if frac.is_empty() || frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(input, "fractional seconds take one to three digits"));
    }
    let scale = 10i32.pow(3 - frac.len() as u32);
    frac.parse::<i32>()
        .map(|millis| millis * scale)
        .map_err(|_| invalid(input, "malformed fraction"))
}

fn invalid(input: &str, reason: &str) -> TypeError {
    TypeError::InvalidPeriod {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(field, value)| (field.name(), value)))
    }
}

struct PeriodVisitor;

impl<'de> Visitor<'de> for PeriodVisitor {
    type Value = Period;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of period fields or an ISO-8601 period")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Period, A::Error> {
        let mut period = Period::new();
        while let Some(field) = map.next_key::<DurationField>()? {
            if period.is_supported(field) {
                return Err(de::Error::duplicate_field(field.name()));
            }
            period = period.with(field, map.next_value()?);
        }
        Ok(period)
    }

    fn visit_str<E: de::Error>(self, text: &str) -> std::result::Result<Period, E> {
        text.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(PeriodVisitor)
    }
}
