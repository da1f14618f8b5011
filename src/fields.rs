//! Field keys and the field map that parsing accumulates into.
//!
//! A [`Parser`][crate::parsers::Parser] does not produce values directly;
//! it produces a [`ParsedFields`] map keyed by [`Field`]. The component
//! types then resolve the map into concrete values, so one grammar can
//! feed several target types.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

/// The set of fields a grammar can populate.
///
/// Integer fields carry `i64` values; [`Field::TimeZoneId`] carries text.
/// [`Field::IsUnbounded`] is a marker written as the integer `1` by the
/// `..` interval designator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Year,
    MonthOfYear,
    DayOfYear,
    DayOfMonth,
    DayOfWeek,
    HourOfDay,
    MinuteOfHour,
    SecondOfMinute,
    MillisecondOfSecond,
    NanosecondOfSecond,
    UtcOffsetSign,
    UtcOffsetHours,
    UtcOffsetMinutes,
    UtcOffsetSeconds,
    UtcOffsetTotalSeconds,
    PeriodSign,
    PeriodOfYears,
    PeriodOfMonths,
    PeriodOfWeeks,
    PeriodOfDays,
    DurationOfHours,
    DurationOfMinutes,
    DurationOfSeconds,
    TimeZoneId,
    IsUnbounded,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => "year",
            Self::MonthOfYear => "month-of-year",
            Self::DayOfYear => "day-of-year",
            Self::DayOfMonth => "day-of-month",
            Self::DayOfWeek => "day-of-week",
            Self::HourOfDay => "hour-of-day",
            Self::MinuteOfHour => "minute-of-hour",
            Self::SecondOfMinute => "second-of-minute",
            Self::MillisecondOfSecond => "millisecond-of-second",
            Self::NanosecondOfSecond => "nanosecond-of-second",
            Self::UtcOffsetSign => "utc-offset-sign",
            Self::UtcOffsetHours => "utc-offset-hours",
            Self::UtcOffsetMinutes => "utc-offset-minutes",
            Self::UtcOffsetSeconds => "utc-offset-seconds",
            Self::UtcOffsetTotalSeconds => "utc-offset-total-seconds",
            Self::PeriodSign => "period-sign",
            Self::PeriodOfYears => "period-of-years",
            Self::PeriodOfMonths => "period-of-months",
            Self::PeriodOfWeeks => "period-of-weeks",
            Self::PeriodOfDays => "period-of-days",
            Self::DurationOfHours => "duration-of-hours",
            Self::DurationOfMinutes => "duration-of-minutes",
            Self::DurationOfSeconds => "duration-of-seconds",
            Self::TimeZoneId => "time-zone-id",
            Self::IsUnbounded => "is-unbounded",
        }
        .fmt(f)
    }
}

/// A single parsed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    Integer(i64),
    Text(String),
}

impl ParsedValue {
    /// Returns the integer value, if this is an integer field.
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// Returns the text value, if this is a text field.
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Integer(_) => None,
            Self::Text(value) => Some(value),
        }
    }
}

impl From<i64> for ParsedValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<String> for ParsedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Returned by [`ParsedFields::insert`] when a field is re-set with a
/// different value, which indicates an ambiguous grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConflict {
    pub field: Field,
    pub existing: ParsedValue,
    pub rejected: ParsedValue,
}

/// The map of fields accumulated over one parse.
///
/// Cloned wholesale at backtrack points so that a failed optional or
/// alternative leaves no trace behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    fields: BTreeMap<Field, ParsedValue>,
}

impl ParsedFields {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `field`.
    #[inline]
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&ParsedValue> {
        self.fields.get(&field)
    }

    /// Returns the integer stored under `field`, ignoring text fields.
    #[inline]
    #[must_use]
    pub fn get_integer(&self, field: Field) -> Option<i64> {
        self.get(field).and_then(ParsedValue::as_integer)
    }

    /// Returns the text stored under `field`, ignoring integer fields.
    #[inline]
    #[must_use]
    pub fn get_text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(ParsedValue::as_text)
    }

    /// Stores `value` under `field`.
    ///
    /// Re-inserting a value equal to the stored one is a no-op; inserting
    /// a different value is a conflict.
    pub fn insert(
        &mut self,
        field: Field,
        value: impl Into<ParsedValue>,
    ) -> Result<(), FieldConflict> {
        let value = value.into();
        if let Some(existing) = self.fields.get(&field) {
            if *existing != value {
                return Err(FieldConflict {
                    field,
                    existing: existing.clone(),
                    rejected: value,
                });
            }
            return Ok(());
        }
        self.fields.insert(field, value);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates over the stored fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &ParsedValue)> {
        self.fields.iter().map(|(field, value)| (*field, value))
    }
}
