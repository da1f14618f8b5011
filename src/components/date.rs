//! This module implements `Date` and its resolution from parsed fields.

use alloc::format;
use core::fmt;
use core::str::FromStr;

use writeable::Writeable;

use crate::fields::{Field, ParsedFields};
use crate::options::ParserSettings;
use crate::parsers::{iso, FormattableDate, IsoFormat, Parser};
use crate::{utils, CivilError, CivilResult};

use super::{narrow, unresolved};

/// A date in the proleptic Gregorian calendar.
///
/// The supported year range is `-9999..=9999`.
///
/// ```rust
/// use civil_time::Date;
/// use core::str::FromStr;
///
/// let date = Date::from_str("2008-09-01")?;
/// assert_eq!(date.day_of_year(), 245);
/// assert_eq!(date.to_string(), "2008-09-01");
/// # Ok::<(), civil_time::CivilError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
}

impl Date {
    /// The earliest supported date, `-9999-01-01`.
    pub const MIN: Self = Self {
        year: -9999,
        month: 1,
        day: 1,
    };

    /// The latest supported date, `9999-12-31`.
    pub const MAX: Self = Self {
        year: 9999,
        month: 12,
        day: 31,
    };

    /// Creates a date from a year, month, and day of month.
    pub fn new(year: i32, month: u8, day: u8) -> CivilResult<Self> {
        check_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(CivilError::range().with_message("month must be within 1..=12"));
        }
        let last = utils::days_in_month(year, month);
        if day == 0 || day > last {
            return Err(CivilError::range()
                .with_message(format!("day must be within 1..={last} for month {month}")));
        }
        Ok(Self { year, month, day })
    }

    /// Creates a date from a year and a 1-based ordinal day within it.
    pub fn from_day_of_year(year: i32, day_of_year: u16) -> CivilResult<Self> {
        check_year(year)?;
        if day_of_year == 0 || day_of_year > utils::days_in_year(year) {
            return Err(CivilError::range().with_message(format!(
                "day of year must be within 1..={} for year {year}",
                utils::days_in_year(year)
            )));
        }
        let (month, day) = utils::month_day_from_day_of_year(year, day_of_year);
        Ok(Self { year, month, day })
    }

    /// Creates a date from a count of days since `1970-01-01`.
    pub fn from_epoch_days(epoch_days: i64) -> CivilResult<Self> {
        if epoch_days < Self::MIN.epoch_days() || epoch_days > Self::MAX.epoch_days() {
            return Err(CivilError::range()
                .with_message("epoch day count is outside the supported year range"));
        }
        let (year, month, day) = utils::gregorian_from_epoch_days(epoch_days);
        Ok(Self { year, month, day })
    }

    /// Resolves a date from parsed fields.
    ///
    /// The fields must contain either a year, month, and day of month,
    /// or a year and day of year.
    pub fn from_parsed(parsed: &ParsedFields) -> CivilResult<Self> {
        let Some(year) = parsed.get_integer(Field::Year) else {
            return Err(unresolved("date"));
        };
        let year = narrow(Field::Year, year)?;
        let month = parsed.get_integer(Field::MonthOfYear);
        let day = parsed.get_integer(Field::DayOfMonth);
        if let (Some(month), Some(day)) = (month, day) {
            return Self::new(
                year,
                narrow(Field::MonthOfYear, month)?,
                narrow(Field::DayOfMonth, day)?,
            );
        }
        if let Some(day_of_year) = parsed.get_integer(Field::DayOfYear) {
            return Self::from_day_of_year(year, narrow(Field::DayOfYear, day_of_year)?);
        }
        Err(unresolved("date"))
    }

    /// Parses a date with a caller-supplied grammar.
    pub fn parse_with(text: &str, parser: &Parser, settings: &ParserSettings) -> CivilResult<Self> {
        let parsed = parser.parse_with(text, settings)?;
        Self::from_parsed(&parsed)
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    /// The 1-based ordinal day within the year.
    pub fn day_of_year(&self) -> u16 {
        utils::day_of_year(self.year, self.month, self.day)
    }

    /// The ISO day of the week, Monday = 1 through Sunday = 7.
    pub fn day_of_week(&self) -> u8 {
        utils::iso_day_of_week(self.epoch_days())
    }

    /// Days since `1970-01-01`.
    pub const fn epoch_days(&self) -> i64 {
        utils::epoch_days_from_gregorian(self.year, self.month, self.day)
    }

    /// Returns a writer rendering this date in the given format.
    pub fn to_writeable(&self, format: IsoFormat) -> FormattableDate {
        FormattableDate {
            year: self.year,
            month: self.month,
            day: self.day,
            format,
        }
    }
}

fn check_year(year: i32) -> CivilResult<()> {
    if (-9999..=9999).contains(&year) {
        Ok(())
    } else {
        Err(CivilError::range().with_message("year must be within -9999..=9999"))
    }
}

impl FromStr for Date {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = iso::extended::calendar_date().parse(s)?;
        Self::from_parsed(&parsed)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_writeable(IsoFormat::Extended).write_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use crate::error::ErrorKind;

    #[test]
    fn rejects_out_of_range_components() {
        assert_eq!(Date::new(2008, 13, 1).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(Date::new(2008, 0, 1).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(Date::new(2008, 4, 31).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(
            Date::new(10_000, 1, 1).unwrap_err().kind(),
            ErrorKind::Range
        );
        assert!(Date::new(2008, 2, 29).is_ok());
        assert!(Date::new(2007, 2, 29).is_err());
    }

    #[test]
    fn round_trips_extended_text() {
        let date = Date::from_str("2008-09-01").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2008, 9, 1));
        assert_eq!(date.to_string(), "2008-09-01");
    }

    #[test]
    fn formats_basic_text() {
        let date = Date::new(2008, 9, 1).unwrap();
        assert_eq!(date.to_writeable(IsoFormat::Basic).to_string(), "20080901");
        assert_eq!(
            Date::parse_with(
                "20080901",
                &iso::basic::calendar_date(),
                &ParserSettings::DEFAULT,
            )
            .unwrap(),
            date,
        );
    }

    #[test]
    fn resolves_ordinal_dates() {
        let date = Date::parse_with(
            "2008-245",
            &iso::extended::ordinal_date(),
            &ParserSettings::DEFAULT,
        )
        .unwrap();
        assert_eq!(date, Date::new(2008, 9, 1).unwrap());
        assert_eq!(date.day_of_year(), 245);
    }

    #[test]
    fn combined_date_grammar_accepts_both_shapes() {
        for text in ["2008-09-01", "20080901", "2008-245", "2008245"] {
            let date =
                Date::parse_with(text, &iso::date(), &ParserSettings::DEFAULT).unwrap();
            assert_eq!(date, Date::new(2008, 9, 1).unwrap());
        }
    }

    #[test]
    fn reports_missing_fields() {
        let parsed = iso::year().parse("2008").unwrap();
        let err = Date::from_parsed(&parsed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.message().contains("date"));
    }

    #[test]
    fn day_of_week_is_iso_numbered() {
        assert_eq!(Date::new(2008, 9, 1).unwrap().day_of_week(), 1);
        assert_eq!(Date::new(2007, 10, 28).unwrap().day_of_week(), 7);
    }
}
