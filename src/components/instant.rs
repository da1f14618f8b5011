//! An implementation of `Instant`, an exact point on the time line.

use core::fmt;
use core::str::FromStr;

use num_traits::Euclid;
use writeable::Writeable;

use crate::fields::ParsedFields;
use crate::options::ParserSettings;
use crate::parsers::{iso, IsoFormat, Parser};
use crate::utils::{NS_PER_DAY, NS_PER_SECOND};
use crate::{CivilError, CivilResult};

use super::{unresolved_as, Date, DateTime, UtcOffset};

/// The earliest instant, `Date::MIN` at midnight UTC.
const MIN_EPOCH_NANOSECONDS: i128 = Date::MIN.epoch_days() as i128 * NS_PER_DAY;
/// The latest instant, the last nanosecond of `Date::MAX` in UTC.
const MAX_EPOCH_NANOSECONDS: i128 = (Date::MAX.epoch_days() + 1) as i128 * NS_PER_DAY - 1;

/// An instant in time, independent of any calendar, offset, or zone.
///
/// Instants are stored as nanoseconds relative to the Unix epoch and
/// are bounded by the supported [`Date`] range evaluated in UTC. They
/// render as an extended-format date-time with the `Z` designator.
///
/// ```rust
/// use civil_time::Instant;
/// use core::str::FromStr;
///
/// let instant = Instant::from_str("2001-05-10T00:24:00.00205Z")?;
/// assert_eq!(instant.to_string(), "2001-05-10T00:24:00.002050Z");
/// # Ok::<(), civil_time::CivilError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    epoch_nanoseconds: i128,
}

impl Instant {
    /// `1970-01-01T00:00Z`.
    pub const UNIX_EPOCH: Self = Self {
        epoch_nanoseconds: 0,
    };

    /// Creates an instant from nanoseconds relative to the Unix epoch.
    pub fn from_epoch_nanoseconds(epoch_nanoseconds: i128) -> CivilResult<Self> {
        if !(MIN_EPOCH_NANOSECONDS..=MAX_EPOCH_NANOSECONDS).contains(&epoch_nanoseconds) {
            return Err(CivilError::range()
                .with_message("instant is outside the supported date range"));
        }
        Ok(Self { epoch_nanoseconds })
    }

    /// Creates an instant from a (floored) epoch second count plus a
    /// positive nanosecond adjustment, `0..=999999999`.
    pub fn from_epoch_seconds(seconds: i64, nanosecond: u32) -> CivilResult<Self> {
        if nanosecond > 999_999_999 {
            return Err(
                CivilError::range().with_message("nanosecond must be within 0..=999999999")
            );
        }
        Self::from_epoch_nanoseconds(
            i128::from(seconds) * i128::from(NS_PER_SECOND) + i128::from(nanosecond),
        )
    }

    /// Resolves an instant from parsed fields: a date-time interpreted
    /// at the parsed offset.
    pub fn from_parsed(parsed: &ParsedFields) -> CivilResult<Self> {
        let datetime = unresolved_as(DateTime::from_parsed(parsed), "instant")?;
        let offset = unresolved_as(UtcOffset::from_parsed(parsed), "instant")?;
        Self::from_epoch_seconds(
            datetime.epoch_seconds_at(offset),
            datetime.time().nanosecond(),
        )
    }

    /// Parses an instant with a caller-supplied grammar.
    pub fn parse_with(text: &str, parser: &Parser, settings: &ParserSettings) -> CivilResult<Self> {
        let parsed = parser.parse_with(text, settings)?;
        Self::from_parsed(&parsed)
    }

    pub const fn epoch_nanoseconds(&self) -> i128 {
        self.epoch_nanoseconds
    }

    /// The floored second of the Unix epoch.
    pub fn epoch_seconds(&self) -> i64 {
        self.second_and_nanosecond().0
    }

    /// The nanosecond within the current second, `0..=999999999`.
    pub fn nanosecond(&self) -> u32 {
        self.second_and_nanosecond().1
    }

    fn second_and_nanosecond(&self) -> (i64, u32) {
        let (seconds, nanosecond) = self
            .epoch_nanoseconds
            .div_rem_euclid(&i128::from(NS_PER_SECOND));
        (seconds as i64, nanosecond as u32)
    }

    /// The date-time this instant corresponds to in UTC. In range by
    /// construction.
    pub(crate) fn datetime_utc(&self) -> CivilResult<DateTime> {
        let (seconds, nanosecond) = self.second_and_nanosecond();
        DateTime::from_epoch_seconds(seconds, nanosecond, UtcOffset::ZERO)
    }
}

impl FromStr for Instant {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = iso::extended::instant().parse(s)?;
        Self::from_parsed(&parsed)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let datetime = self.datetime_utc().map_err(|_| fmt::Error)?;
        datetime.to_writeable(IsoFormat::Extended).write_to(f)?;
        UtcOffset::ZERO
            .to_writeable(IsoFormat::Extended)
            .write_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use crate::components::Time;
    use crate::error::ErrorKind;

    #[test]
    fn round_trips_through_text() {
        let instant = Instant::from_str("2001-05-10T00:24Z").unwrap();
        assert_eq!(instant.to_string(), "2001-05-10T00:24Z");
        assert_eq!(Instant::UNIX_EPOCH.to_string(), "1970-01-01T00:00Z");
    }

    #[test]
    fn requires_the_utc_designator() {
        assert!(Instant::from_str("2001-05-10T00:24").is_err());
        assert!(Instant::from_str("2001-05-10T00:24-04:00").is_err());
    }

    #[test]
    fn interprets_the_parsed_offset() {
        let at_offset = Instant::parse_with(
            "1970-01-01T01:00+01:00",
            &iso::extended::offset_date_time(),
            &ParserSettings::DEFAULT,
        )
        .unwrap();
        assert_eq!(at_offset, Instant::UNIX_EPOCH);
    }

    #[test]
    fn floors_negative_nanosecond_counts() {
        let instant = Instant::from_epoch_nanoseconds(-1).unwrap();
        assert_eq!(instant.epoch_seconds(), -1);
        assert_eq!(instant.nanosecond(), 999_999_999);
        assert_eq!(instant.to_string(), "1969-12-31T23:59:59.999999999Z");
    }

    #[test]
    fn bounds_follow_the_date_range() {
        assert_eq!(
            Instant::from_epoch_nanoseconds(MAX_EPOCH_NANOSECONDS + 1)
                .unwrap_err()
                .kind(),
            ErrorKind::Range
        );
        let max = Instant::from_epoch_nanoseconds(MAX_EPOCH_NANOSECONDS).unwrap();
        let datetime = max.datetime_utc().unwrap();
        assert_eq!(datetime.date(), Date::MAX);
        assert_eq!(datetime.time(), Time::MAX);
        let min = Instant::from_epoch_nanoseconds(MIN_EPOCH_NANOSECONDS).unwrap();
        assert_eq!(min.datetime_utc().unwrap().date(), Date::MIN);
    }
}
