//! The `civil_time` crate provides calendar and clock values that are
//! resolved from ISO-8601 text by a backtracking combinator parser and
//! anchored to instants through pluggable time zone rules.
//!
//! ```rust
//! use civil_time::{Date, DateTime};
//! use core::str::FromStr;
//!
//! // Parse an extended-format calendar date
//! let date = Date::from_str("2008-09-01").unwrap();
//! assert_eq!((date.year(), date.month(), date.day()), (2008, 9, 1));
//! assert_eq!(date.to_string(), "2008-09-01");
//!
//! // Date-times accept a `T` or a space between the date and time parts
//! let date_time = DateTime::from_str("2008-09-01T18:30").unwrap();
//! assert_eq!(date_time.time().hour(), 18);
//! ```
//!
//! Parsing is grammar-driven: the productions in [`parsers::iso`] are
//! built from the combinator set in [`parsers`] and can be mixed with
//! user-defined grammars through [`parsers::ParserBuilder`]. Local
//! date-times become [`ZonedDateTime`]s through rules supplied by a
//! [`provider::TimeZoneRulesProvider`], with daylight saving gaps and
//! overlaps resolved deterministically.
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::cognitive_complexity,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_panics_doc,
)]

extern crate alloc;
extern crate core;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod fields;
pub mod options;
pub mod parsers;
pub mod provider;

mod components;

#[doc(hidden)]
pub(crate) mod utils;

use core::cmp::Ordering;

#[doc(inline)]
pub use error::CivilError;

/// The `civil_time` result type.
pub type CivilResult<T> = Result<T, CivilError>;

pub use crate::components::{
    Date, DateTime, Duration, Instant, OffsetDateTime, Period, Time, TimeZone, UtcOffset,
    ZonedDateTime,
};

#[cfg(feature = "std")]
pub use crate::provider::{register_time_zone_rules, time_zone_rules};

/// A general sign type.
#[repr(i8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sign {
    #[default]
    Positive = 1,
    Zero = 0,
    Negative = -1,
}

impl From<i8> for Sign {
    fn from(value: i8) -> Self {
        match value.cmp(&0) {
            Ordering::Greater => Self::Positive,
            Ordering::Equal => Self::Zero,
            Ordering::Less => Self::Negative,
        }
    }
}

/// A library specific trait for unwrapping assertions.
pub(crate) trait CivilUnwrap {
    type Output;

    /// `civil_time` based assertion for unwrapping. This will panic in
    /// debug builds, but throws an error during runtime.
    fn civil_unwrap(self) -> CivilResult<Self::Output>;
}

impl<T> CivilUnwrap for Option<T> {
    type Output = T;

    fn civil_unwrap(self) -> CivilResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(CivilError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! civil_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err(CivilError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err(CivilError::assert());
        }
    };
}
