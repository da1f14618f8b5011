//! This module implements `Time` and its resolution from parsed fields.

use core::fmt;
use core::str::FromStr;

use writeable::Writeable;

use crate::fields::{Field, ParsedFields};
use crate::options::ParserSettings;
use crate::parsers::{iso, FormattableTime, IsoFormat, Parser, Precision};
use crate::utils::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::{civil_assert, CivilError, CivilResult};

use super::{narrow, unresolved};

/// A time of day with nanosecond precision.
///
/// ```rust
/// use civil_time::Time;
/// use core::str::FromStr;
///
/// let time = Time::from_str("18:30:15.500")?;
/// assert_eq!((time.hour(), time.minute(), time.second()), (18, 30, 15));
/// assert_eq!(time.nanosecond(), 500_000_000);
/// assert_eq!(time.to_string(), "18:30:15.500");
/// # Ok::<(), civil_time::CivilError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

impl Time {
    /// The first representable time of day, `00:00`.
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
        nanosecond: 0,
    };

    /// `12:00`.
    pub const NOON: Self = Self {
        hour: 12,
        minute: 0,
        second: 0,
        nanosecond: 0,
    };

    /// The last representable time of day, `23:59:59.999999999`.
    pub const MAX: Self = Self {
        hour: 23,
        minute: 59,
        second: 59,
        nanosecond: 999_999_999,
    };

    /// Creates a time of day from its components.
    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> CivilResult<Self> {
        if hour > 23 {
            return Err(CivilError::range().with_message("hour must be within 0..=23"));
        }
        if minute > 59 {
            return Err(CivilError::range().with_message("minute must be within 0..=59"));
        }
        if second > 59 {
            return Err(CivilError::range().with_message("second must be within 0..=59"));
        }
        if nanosecond > 999_999_999 {
            return Err(
                CivilError::range().with_message("nanosecond must be within 0..=999999999")
            );
        }
        Ok(Self {
            hour,
            minute,
            second,
            nanosecond,
        })
    }

    /// Builds a time from a second of the day, `0..86400`.
    pub(crate) fn from_second_of_day(second_of_day: u32, nanosecond: u32) -> CivilResult<Self> {
        civil_assert!(i64::from(second_of_day) < SECONDS_PER_DAY && nanosecond < 1_000_000_000);
        Ok(Self {
            hour: (i64::from(second_of_day) / SECONDS_PER_HOUR) as u8,
            minute: (i64::from(second_of_day) % SECONDS_PER_HOUR / SECONDS_PER_MINUTE) as u8,
            second: (i64::from(second_of_day) % SECONDS_PER_MINUTE) as u8,
            nanosecond,
        })
    }

    /// Resolves a time from parsed fields.
    ///
    /// The hour is required; the minute, second, and nanosecond default
    /// to zero.
    pub fn from_parsed(parsed: &ParsedFields) -> CivilResult<Self> {
        let Some(hour) = parsed.get_integer(Field::HourOfDay) else {
            return Err(unresolved("time"));
        };
        let minute = parsed.get_integer(Field::MinuteOfHour).unwrap_or(0);
        let second = parsed.get_integer(Field::SecondOfMinute).unwrap_or(0);
        let nanosecond = parsed.get_integer(Field::NanosecondOfSecond).unwrap_or(0);
        Self::new(
            narrow(Field::HourOfDay, hour)?,
            narrow(Field::MinuteOfHour, minute)?,
            narrow(Field::SecondOfMinute, second)?,
            narrow(Field::NanosecondOfSecond, nanosecond)?,
        )
    }

    /// Parses a time with a caller-supplied grammar.
    pub fn parse_with(text: &str, parser: &Parser, settings: &ParserSettings) -> CivilResult<Self> {
        let parsed = parser.parse_with(text, settings)?;
        Self::from_parsed(&parsed)
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    pub const fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    /// The second of the day, `0..86400`.
    pub const fn second_of_day(&self) -> u32 {
        self.hour as u32 * SECONDS_PER_HOUR as u32
            + self.minute as u32 * SECONDS_PER_MINUTE as u32
            + self.second as u32
    }

    /// Returns a writer rendering this time in the given format, with
    /// automatic precision.
    pub fn to_writeable(&self, format: IsoFormat) -> FormattableTime {
        FormattableTime {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            nanosecond: self.nanosecond,
            precision: Precision::Auto,
            format,
        }
    }
}

impl FromStr for Time {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = iso::extended::time().parse(s)?;
        Self::from_parsed(&parsed)
    }
}

impl fmt::Display for Time {
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
        assert_eq!(Time::new(24, 0, 0, 0).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(Time::new(0, 60, 0, 0).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(Time::new(0, 0, 60, 0).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(
            Time::new(0, 0, 0, 1_000_000_000).unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn resolves_partial_times() {
        assert_eq!(Time::from_str("18").unwrap(), Time::new(18, 0, 0, 0).unwrap());
        assert_eq!(
            Time::from_str("18:30").unwrap(),
            Time::new(18, 30, 0, 0).unwrap()
        );
        assert_eq!(
            Time::from_str("18:30:00").unwrap(),
            Time::new(18, 30, 0, 0).unwrap()
        );
    }

    #[test]
    fn omits_zero_seconds_when_formatting() {
        assert_eq!(Time::new(18, 30, 0, 0).unwrap().to_string(), "18:30");
        assert_eq!(Time::new(18, 30, 5, 0).unwrap().to_string(), "18:30:05");
        assert_eq!(Time::MIDNIGHT.to_string(), "00:00");
    }

    #[test]
    fn groups_fraction_digits_by_precision() {
        assert_eq!(
            Time::new(1, 2, 3, 500_000_000).unwrap().to_string(),
            "01:02:03.500"
        );
        assert_eq!(
            Time::new(1, 2, 3, 500_000).unwrap().to_string(),
            "01:02:03.000500"
        );
        assert_eq!(
            Time::new(1, 2, 3, 500).unwrap().to_string(),
            "01:02:03.000000500"
        );
        assert_eq!(Time::MAX.to_string(), "23:59:59.999999999");
    }

    #[test]
    fn fixed_precision_overrides_the_default() {
        let mut writeable = Time::new(18, 30, 0, 0).unwrap().to_writeable(IsoFormat::Extended);
        writeable.precision = Precision::Digit(3);
        assert_eq!(writeable.to_string(), "18:30:00.000");
        writeable.precision = Precision::Minute;
        assert_eq!(writeable.to_string(), "18:30");
    }

    #[test]
    fn round_trips_basic_text() {
        let time = Time::new(18, 30, 15, 0).unwrap();
        assert_eq!(time.to_writeable(IsoFormat::Basic).to_string(), "183015");
        assert_eq!(
            Time::parse_with("183015", &iso::basic::time(), &ParserSettings::DEFAULT).unwrap(),
            time
        );
    }

    #[test]
    fn second_of_day_counts_from_midnight() {
        assert_eq!(Time::MIDNIGHT.second_of_day(), 0);
        assert_eq!(Time::NOON.second_of_day(), 43_200);
        assert_eq!(Time::MAX.second_of_day(), 86_399);
        let time = Time::from_second_of_day(66_615, 7).unwrap();
        assert_eq!(time, Time::new(18, 30, 15, 7).unwrap());
    }
}
