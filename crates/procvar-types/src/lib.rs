//! Foundation types for process variables.
//!
//! This crate provides the temporal value types of the typed-variable system
//! and the ordering rules between them. Calendar periods ("1 month",
//! "30 days") have no natural order, so comparison goes through a fixed
//! normalization: each field is given a fixed length and the period is
//! measured as the exact time it spans from a constant anchor instant.
//!
//! # Key Types
//!
//! - [`Period`] - Calendar duration made of named fields (years … millis)
//! - [`Duration`] - Exact elapsed time in signed milliseconds
//! - [`ComparablePeriod`] - Period wrapper with a total order over periods and durations
//! - [`Comparand`] - The closed set of things a period can be compared with
//! - [`TypedValue`] / [`ValueType`] - Tagged variable payloads
//!
//! # Calendar Convention
//!
//! 12 months per year, 31 days per month, 7 days per week, 24 hours per day,
//! 60 minutes per hour, 60 seconds per minute.

pub mod comparable;
pub mod duration;
pub mod error;
pub mod period;
pub mod value;

pub use comparable::{anchor, Comparand, ComparablePeriod};
pub use duration::Duration;
pub use error::TypeError;
pub use period::{DurationField, Period};
pub use value::{NamedValue, TypedValue, ValueType};
