//! This module implements `DateTime`, the combination of a date and a
//! time of day with no offset or zone attached.

use core::fmt;
use core::str::FromStr;

use writeable::Writeable;

use crate::fields::ParsedFields;
use crate::options::ParserSettings;
use crate::parsers::{iso, FormattableDateTime, IsoFormat, Parser};
use crate::utils::SECONDS_PER_DAY;
use crate::{CivilError, CivilResult};

use super::{unresolved_as, Date, Time, UtcOffset};

/// A date paired with a time of day.
///
/// A `DateTime` is a civil value: it names a position on the calendar
/// and clock without saying which instant that position corresponds to.
/// Interpreting it at a [`UtcOffset`] yields an epoch time; resolving it
/// in a time zone yields a [`ZonedDateTime`][super::ZonedDateTime].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    date: Date,
    time: Time,
}

impl DateTime {
    /// Combines a date and a time of day.
    #[must_use]
    pub const fn new(date: Date, time: Time) -> Self {
        Self { date, time }
    }

    /// Resolves a date-time from parsed fields. Both the date and the
    /// time fields must be present.
    pub fn from_parsed(parsed: &ParsedFields) -> CivilResult<Self> {
        let date = unresolved_as(Date::from_parsed(parsed), "date-time")?;
        let time = unresolved_as(Time::from_parsed(parsed), "date-time")?;
        Ok(Self { date, time })
    }

    /// Parses a date-time with a caller-supplied grammar.
    pub fn parse_with(text: &str, parser: &Parser, settings: &ParserSettings) -> CivilResult<Self> {
        let parsed = parser.parse_with(text, settings)?;
        Self::from_parsed(&parsed)
    }

    pub const fn date(&self) -> Date {
        self.date
    }

    pub const fn time(&self) -> Time {
        self.time
    }

    /// Shifts this date-time by a number of seconds, leaving the
    /// nanosecond untouched. Returns `None` when the result leaves the
    /// supported date range.
    pub fn checked_add_seconds(&self, seconds: i64) -> Option<Self> {
        let total = self
            .date
            .epoch_days()
            .checked_mul(SECONDS_PER_DAY)?
            .checked_add(i64::from(self.time.second_of_day()))?
            .checked_add(seconds)?;
        let date = Date::from_epoch_days(total.div_euclid(SECONDS_PER_DAY)).ok()?;
        let time = Time::from_second_of_day(
            total.rem_euclid(SECONDS_PER_DAY) as u32,
            self.time.nanosecond(),
        )
        .ok()?;
        Some(Self { date, time })
    }

    /// Seconds since the Unix epoch when this local time is interpreted
    /// at the given offset. The nanosecond is not included.
    pub fn epoch_seconds_at(&self, offset: UtcOffset) -> i64 {
        self.date.epoch_days() * SECONDS_PER_DAY + i64::from(self.time.second_of_day())
            - i64::from(offset.total_seconds())
    }

    /// Rebuilds the local date-time that has the given epoch second at
    /// the given offset.
    pub fn from_epoch_seconds(
        seconds: i64,
        nanosecond: u32,
        offset: UtcOffset,
    ) -> CivilResult<Self> {
        let local = seconds
            .checked_add(i64::from(offset.total_seconds()))
            .ok_or_else(|| {
                CivilError::range().with_message("epoch second count overflows at this offset")
            })?;
        let date = Date::from_epoch_days(local.div_euclid(SECONDS_PER_DAY))?;
        let time = Time::from_second_of_day(local.rem_euclid(SECONDS_PER_DAY) as u32, nanosecond)?;
        Ok(Self { date, time })
    }

    /// Returns a writer rendering this date-time in the given format,
    /// with a `T` separating the two parts.
    pub fn to_writeable(&self, format: IsoFormat) -> FormattableDateTime {
        FormattableDateTime {
            date: self.date.to_writeable(format),
            time: self.time.to_writeable(format),
        }
    }
}

impl FromStr for DateTime {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = iso::extended::date_time().parse(s)?;
        Self::from_parsed(&parsed)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_writeable(IsoFormat::Extended).write_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use crate::error::ErrorKind;

    fn datetime(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> DateTime {
        DateTime::new(
            Date::new(year, month, day).unwrap(),
            Time::new(hour, minute, second, nanosecond).unwrap(),
        )
    }

    #[test]
    fn accepts_t_and_space_separators() {
        let expected = datetime(2008, 9, 1, 18, 30, 0, 0);
        assert_eq!(DateTime::from_str("2008-09-01T18:30").unwrap(), expected);
        assert_eq!(DateTime::from_str("2008-09-01 18:30").unwrap(), expected);
    }

    #[test]
    fn formats_with_a_t_separator() {
        let value = datetime(2008, 9, 1, 18, 30, 0, 0);
        assert_eq!(value.to_string(), "2008-09-01T18:30");
        assert_eq!(
            value.to_writeable(IsoFormat::Basic).to_string(),
            "20080901T1830"
        );
    }

    #[test]
    fn requires_both_parts() {
        let parsed = iso::extended::calendar_date().parse("2008-09-01").unwrap();
        let err = DateTime::from_parsed(&parsed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.message().contains("date-time"));
    }

    #[test]
    fn adds_seconds_across_day_boundaries() {
        let value = datetime(2008, 9, 1, 23, 59, 30, 5);
        let shifted = value.checked_add_seconds(45).unwrap();
        assert_eq!(shifted, datetime(2008, 9, 2, 0, 0, 15, 5));
        let back = shifted.checked_add_seconds(-45).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn add_seconds_stops_at_the_date_range() {
        let value = DateTime::new(Date::MAX, Time::MAX);
        assert!(value.checked_add_seconds(1).is_none());
        assert!(value.checked_add_seconds(0).is_some());
    }

    #[test]
    fn epoch_seconds_respect_the_offset() {
        let value = datetime(1970, 1, 1, 0, 0, 0, 0);
        assert_eq!(value.epoch_seconds_at(UtcOffset::ZERO), 0);
        let plus_one = UtcOffset::from_total_seconds(3600).unwrap();
        assert_eq!(value.epoch_seconds_at(plus_one), -3600);
        let rebuilt = DateTime::from_epoch_seconds(-3600, 0, plus_one).unwrap();
        assert_eq!(rebuilt, value);
    }
}
