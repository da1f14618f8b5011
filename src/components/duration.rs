//! This module implements `Period` and `Duration`, the two measure
//! types: one counted in calendar units, one in exact clock time.

use core::fmt;
use core::str::FromStr;

use writeable::Writeable;

use crate::fields::{Field, ParsedFields};
use crate::options::ParserSettings;
use crate::parsers::{iso, FormattableDuration, FormattablePeriod, Parser};
use crate::utils::{NS_PER_SECOND, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::{CivilError, CivilResult};

use super::unresolved;

/// A calendar-unit measure of years, months, and days.
///
/// The components are independent and may differ in sign; no unit is
/// converted into another. A zero period renders as `P0D`.
///
/// ```rust
/// use civil_time::Period;
/// use core::str::FromStr;
///
/// let period = Period::from_str("P1Y-2M3D")?;
/// assert_eq!((period.years(), period.months(), period.days()), (1, -2, 3));
/// assert_eq!(period.to_string(), "P1Y-2M3D");
/// # Ok::<(), civil_time::CivilError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    years: i64,
    months: i64,
    days: i64,
}

impl Period {
    /// A period of no length, `P0D`.
    pub const ZERO: Self = Self {
        years: 0,
        months: 0,
        days: 0,
    };

    /// Creates a period from its components.
    #[must_use]
    pub const fn new(years: i64, months: i64, days: i64) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// Resolves a period from parsed fields.
    ///
    /// At least one of the year, month, week, or day fields must be
    /// present; weeks fold into days at seven days each, and a leading
    /// sign negates every component.
    pub fn from_parsed(parsed: &ParsedFields) -> CivilResult<Self> {
        let years = parsed.get_integer(Field::PeriodOfYears);
        let months = parsed.get_integer(Field::PeriodOfMonths);
        let weeks = parsed.get_integer(Field::PeriodOfWeeks);
        let days = parsed.get_integer(Field::PeriodOfDays);
        if years.is_none() && months.is_none() && weeks.is_none() && days.is_none() {
            return Err(unresolved("period"));
        }
        let overflow = || CivilError::range().with_message("period component overflows");
        let days = weeks
            .unwrap_or(0)
            .checked_mul(7)
            .and_then(|weeks| weeks.checked_add(days.unwrap_or(0)))
            .ok_or_else(overflow)?;
        let mut period = Self::new(years.unwrap_or(0), months.unwrap_or(0), days);
        if parsed.get_integer(Field::PeriodSign).unwrap_or(1) < 0 {
            period = Self::new(
                period.years.checked_neg().ok_or_else(overflow)?,
                period.months.checked_neg().ok_or_else(overflow)?,
                period.days.checked_neg().ok_or_else(overflow)?,
            );
        }
        Ok(period)
    }

    /// Parses a period with a caller-supplied grammar.
    pub fn parse_with(text: &str, parser: &Parser, settings: &ParserSettings) -> CivilResult<Self> {
        let parsed = parser.parse_with(text, settings)?;
        Self::from_parsed(&parsed)
    }

    pub const fn years(&self) -> i64 {
        self.years
    }

    pub const fn months(&self) -> i64 {
        self.months
    }

    pub const fn days(&self) -> i64 {
        self.days
    }

    pub const fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// Returns a writer rendering this period.
    pub fn to_writeable(&self) -> FormattablePeriod {
        FormattablePeriod {
            years: self.years,
            months: self.months,
            days: self.days,
        }
    }
}

impl FromStr for Period {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = iso::period().parse(s)?;
        Self::from_parsed(&parsed)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_writeable().write_to(f)
    }
}

/// An exact span of clock time with nanosecond precision.
///
/// The value is normalized so the nanosecond adjustment carries the
/// same sign as the seconds. Rendering is clock-based: days never
/// appear, and a zero duration renders as `PT0S`.
///
/// ```rust
/// use civil_time::Duration;
/// use core::str::FromStr;
///
/// let duration = Duration::from_str("P1DT2H3M4.5S")?;
/// assert_eq!(duration.seconds(), 86_400 + 2 * 3600 + 3 * 60 + 4);
/// assert_eq!(duration.nanoseconds(), 500_000_000);
/// assert_eq!(duration.to_string(), "PT26H3M4.5S");
/// # Ok::<(), civil_time::CivilError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    seconds: i64,
    nanoseconds: i32,
}

impl Duration {
    /// A duration of no length, `PT0S`.
    pub const ZERO: Self = Self {
        seconds: 0,
        nanoseconds: 0,
    };

    /// Creates a duration from seconds and a nanosecond count, carrying
    /// whole seconds in the nanoseconds over and normalizing the two
    /// parts to a single sign.
    pub fn from_seconds_and_nanoseconds(seconds: i64, nanoseconds: i64) -> CivilResult<Self> {
        let mut seconds = seconds
            .checked_add(nanoseconds / NS_PER_SECOND)
            .ok_or_else(|| CivilError::range().with_message("duration overflows"))?;
        let mut nanoseconds = (nanoseconds % NS_PER_SECOND) as i32;
        if seconds > 0 && nanoseconds < 0 {
            seconds -= 1;
            nanoseconds += NS_PER_SECOND as i32;
        } else if seconds < 0 && nanoseconds > 0 {
            seconds += 1;
            nanoseconds -= NS_PER_SECOND as i32;
        }
        Ok(Self {
            seconds,
            nanoseconds,
        })
    }

    /// Resolves a duration from parsed fields.
    ///
    /// At least one of the day, hour, minute, or second fields must be
    /// present; days count as exactly 24 hours.
    pub fn from_parsed(parsed: &ParsedFields) -> CivilResult<Self> {
        let days = parsed.get_integer(Field::PeriodOfDays);
        let hours = parsed.get_integer(Field::DurationOfHours);
        let minutes = parsed.get_integer(Field::DurationOfMinutes);
        let seconds = parsed.get_integer(Field::DurationOfSeconds);
        if days.is_none() && hours.is_none() && minutes.is_none() && seconds.is_none() {
            return Err(unresolved("duration"));
        }
        let overflow = || CivilError::range().with_message("duration overflows");
        let total = days
            .unwrap_or(0)
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|total| hours.unwrap_or(0).checked_mul(SECONDS_PER_HOUR)?.checked_add(total))
            .and_then(|total| {
                minutes
                    .unwrap_or(0)
                    .checked_mul(SECONDS_PER_MINUTE)?
                    .checked_add(total)
            })
            .and_then(|total| seconds.unwrap_or(0).checked_add(total))
            .ok_or_else(overflow)?;
        let nanoseconds = parsed.get_integer(Field::NanosecondOfSecond).unwrap_or(0);
        Self::from_seconds_and_nanoseconds(total, nanoseconds)
    }

    /// Parses a duration with a caller-supplied grammar.
    pub fn parse_with(text: &str, parser: &Parser, settings: &ParserSettings) -> CivilResult<Self> {
        let parsed = parser.parse_with(text, settings)?;
        Self::from_parsed(&parsed)
    }

    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// The nanosecond adjustment, with the same sign as the seconds.
    pub const fn nanoseconds(&self) -> i32 {
        self.nanoseconds
    }

    pub const fn is_zero(&self) -> bool {
        self.seconds == 0 && self.nanoseconds == 0
    }

    /// Returns a writer rendering this duration.
    pub fn to_writeable(&self) -> FormattableDuration {
        FormattableDuration {
            seconds: self.seconds,
            nanoseconds: self.nanoseconds,
        }
    }
}

impl FromStr for Duration {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = iso::duration().parse(s)?;
        Self::from_parsed(&parsed)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_writeable().write_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use crate::error::ErrorKind;

    #[test]
    fn period_round_trips_component_signs() {
        assert_eq!(Period::from_str("P1Y2M3D").unwrap(), Period::new(1, 2, 3));
        assert_eq!(Period::from_str("P-1Y").unwrap(), Period::new(-1, 0, 0));
        let mixed = Period::new(1, -2, 3);
        assert_eq!(Period::from_str(&mixed.to_string()).unwrap(), mixed);
    }

    #[test]
    fn period_leading_sign_negates_every_component() {
        let parsed = Period::parse_with(
            "-P1Y2M3D",
            &Parser::build(|b| b.period_sign().parser(&iso::period())),
            &ParserSettings::DEFAULT,
        )
        .unwrap();
        assert_eq!(parsed, Period::new(-1, -2, -3));
    }

    #[test]
    fn period_weeks_fold_into_days() {
        let parsed = Period::parse_with(
            "P2W3D",
            &Parser::build(|b| {
                b.literal('P')
                    .optional(|b| b.period_of_weeks(1..=10, None).literal('W'))
                    .optional(|b| b.period_of_days(1..=10, None).literal('D'))
            }),
            &ParserSettings::DEFAULT,
        )
        .unwrap();
        assert_eq!(parsed, Period::new(0, 0, 17));
    }

    #[test]
    fn period_zero_renders_as_p0d() {
        assert_eq!(Period::ZERO.to_string(), "P0D");
        assert_eq!(Period::from_str("P0D").unwrap(), Period::ZERO);
    }

    #[test]
    fn empty_period_is_a_resolution_error() {
        let err = Period::from_str("P").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.message().contains("period"));
    }

    #[test]
    fn duration_sums_unit_components() {
        assert_eq!(
            Duration::from_str("P1DT2H3M4.5S").unwrap(),
            Duration::from_seconds_and_nanoseconds(93_784, 500_000_000).unwrap()
        );
        assert_eq!(
            Duration::from_str("PT90M").unwrap(),
            Duration::from_seconds_and_nanoseconds(5400, 0).unwrap()
        );
    }

    #[test]
    fn duration_formats_without_days() {
        assert_eq!(Duration::from_str("P1D").unwrap().to_string(), "PT24H");
        assert_eq!(
            Duration::from_seconds_and_nanoseconds(3600 + 90, 0)
                .unwrap()
                .to_string(),
            "PT1H1M30S"
        );
    }

    #[test]
    fn duration_normalizes_mixed_signs() {
        let value = Duration::from_seconds_and_nanoseconds(1, -1_500_000_000).unwrap();
        assert_eq!((value.seconds(), value.nanoseconds()), (0, -500_000_000));
        assert_eq!(value.to_string(), "PT-0.5S");
        let carried = Duration::from_seconds_and_nanoseconds(-1, 1_500_000_000).unwrap();
        assert_eq!((carried.seconds(), carried.nanoseconds()), (0, 500_000_000));
    }

    #[test]
    fn duration_trims_the_fraction() {
        let value = Duration::from_seconds_and_nanoseconds(4, 500_000_000).unwrap();
        assert_eq!(value.to_string(), "PT4.5S");
        let tiny = Duration::from_seconds_and_nanoseconds(0, 100).unwrap();
        assert_eq!(tiny.to_string(), "PT0.0000001S");
    }

    #[test]
    fn duration_zero_renders_as_pt0s() {
        assert_eq!(Duration::ZERO.to_string(), "PT0S");
        assert_eq!(Duration::from_str("PT0S").unwrap(), Duration::ZERO);
    }

    #[test]
    fn empty_duration_is_a_resolution_error() {
        for text in ["P", "PT"] {
            let err = Duration::from_str(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Generic, "{text}");
        }
    }

    #[test]
    fn negative_fraction_of_a_second() {
        let value = Duration::from_str("PT-0.5S").unwrap();
        assert_eq!((value.seconds(), value.nanoseconds()), (0, -500_000_000));
        assert_eq!(value.to_string(), "PT-0.5S");
        assert_eq!(Duration::from_str(&value.to_string()).unwrap(), value);
    }
}
