//! This module implements `UtcOffset` and `OffsetDateTime`.

use core::fmt;
use core::str::FromStr;

use writeable::Writeable;

use crate::fields::{Field, ParsedFields};
use crate::options::ParserSettings;
use crate::parsers::{iso, FormattableOffsetDateTime, FormattableUtcOffset, IsoFormat, Parser};
use crate::utils::{SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::{CivilError, CivilResult};

use super::{narrow, unresolved, unresolved_as, DateTime, Instant, TimeZone};

/// An amount that a local time is shifted from UTC, within
/// `-18:00:00..=+18:00:00`.
///
/// ```rust
/// use civil_time::UtcOffset;
/// use core::str::FromStr;
///
/// let offset = UtcOffset::from_str("-04:00")?;
/// assert_eq!(offset.total_seconds(), -4 * 3600);
/// assert_eq!(UtcOffset::ZERO.to_string(), "Z");
/// # Ok::<(), civil_time::CivilError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffset {
    total_seconds: i32,
}

const MAX_OFFSET_SECONDS: i32 = 18 * SECONDS_PER_HOUR as i32;

impl UtcOffset {
    /// The offset of UTC itself, rendered as `Z`.
    pub const ZERO: Self = Self { total_seconds: 0 };

    /// Creates an offset from a total second count.
    pub fn from_total_seconds(total_seconds: i32) -> CivilResult<Self> {
        if total_seconds.unsigned_abs() > MAX_OFFSET_SECONDS as u32 {
            return Err(CivilError::range()
                .with_message("UTC offset must be within -18:00:00..=+18:00:00"));
        }
        Ok(Self { total_seconds })
    }

    /// Creates an offset from signed hour, minute, and second
    /// components, which must agree in sign.
    pub fn from_hms(hours: i32, minutes: i32, seconds: i32) -> CivilResult<Self> {
        if minutes.unsigned_abs() > 59 || seconds.unsigned_abs() > 59 {
            return Err(CivilError::range()
                .with_message("offset minutes and seconds must be within -59..=59"));
        }
        let positive = hours > 0 || minutes > 0 || seconds > 0;
        let negative = hours < 0 || minutes < 0 || seconds < 0;
        if positive && negative {
            return Err(CivilError::range().with_message("offset components have mixed signs"));
        }
        Self::from_total_seconds(
            hours * SECONDS_PER_HOUR as i32 + minutes * SECONDS_PER_MINUTE as i32 + seconds,
        )
    }

    /// Resolves an offset from parsed fields: a total second count if
    /// one was assigned, otherwise a sign with hour, minute, and second
    /// components.
    pub fn from_parsed(parsed: &ParsedFields) -> CivilResult<Self> {
        if let Some(total) = parsed.get_integer(Field::UtcOffsetTotalSeconds) {
            return Self::from_total_seconds(narrow(Field::UtcOffsetTotalSeconds, total)?);
        }
        let Some(sign) = parsed.get_integer(Field::UtcOffsetSign) else {
            return Err(unresolved("UTC offset"));
        };
        let hours: i32 = narrow(
            Field::UtcOffsetHours,
            parsed.get_integer(Field::UtcOffsetHours).unwrap_or(0),
        )?;
        let minutes: i32 = narrow(
            Field::UtcOffsetMinutes,
            parsed.get_integer(Field::UtcOffsetMinutes).unwrap_or(0),
        )?;
        let seconds: i32 = narrow(
            Field::UtcOffsetSeconds,
            parsed.get_integer(Field::UtcOffsetSeconds).unwrap_or(0),
        )?;
        if sign < 0 {
            Self::from_hms(-hours, -minutes, -seconds)
        } else {
            Self::from_hms(hours, minutes, seconds)
        }
    }

    /// Parses an offset with a caller-supplied grammar.
    pub fn parse_with(text: &str, parser: &Parser, settings: &ParserSettings) -> CivilResult<Self> {
        let parsed = parser.parse_with(text, settings)?;
        Self::from_parsed(&parsed)
    }

    pub const fn total_seconds(&self) -> i32 {
        self.total_seconds
    }

    pub const fn is_zero(&self) -> bool {
        self.total_seconds == 0
    }

    /// The hour component, `-18..=18`.
    pub const fn hours(&self) -> i32 {
        self.total_seconds / SECONDS_PER_HOUR as i32
    }

    /// The minute component, carrying the offset's sign.
    pub const fn minutes(&self) -> i32 {
        self.total_seconds % SECONDS_PER_HOUR as i32 / SECONDS_PER_MINUTE as i32
    }

    /// The second component, carrying the offset's sign.
    pub const fn seconds(&self) -> i32 {
        self.total_seconds % SECONDS_PER_MINUTE as i32
    }

    /// Reinterprets this offset as a fixed-offset time zone.
    #[must_use]
    pub fn as_time_zone(self) -> TimeZone {
        TimeZone::FixedOffset(self)
    }

    /// Returns a writer rendering this offset in the given format. A
    /// zero offset renders as `Z` in either format.
    pub fn to_writeable(&self, format: IsoFormat) -> FormattableUtcOffset {
        FormattableUtcOffset {
            total_seconds: self.total_seconds,
            format,
        }
    }
}

impl FromStr for UtcOffset {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = iso::extended::utc_offset().parse(s)?;
        Self::from_parsed(&parsed)
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_writeable(IsoFormat::Extended).write_to(f)
    }
}

/// A date-time pinned to a fixed offset from UTC.
///
/// Unlike [`ZonedDateTime`][super::ZonedDateTime], no rules are
/// attached: the offset is taken at face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetDateTime {
    datetime: DateTime,
    offset: UtcOffset,
}

impl OffsetDateTime {
    /// Combines a local date-time and the offset it is interpreted at.
    #[must_use]
    pub const fn new(datetime: DateTime, offset: UtcOffset) -> Self {
        Self { datetime, offset }
    }

    /// Resolves an offset date-time from parsed fields.
    pub fn from_parsed(parsed: &ParsedFields) -> CivilResult<Self> {
        let datetime = unresolved_as(DateTime::from_parsed(parsed), "offset date-time")?;
        let offset = unresolved_as(UtcOffset::from_parsed(parsed), "offset date-time")?;
        Ok(Self { datetime, offset })
    }

    /// Parses an offset date-time with a caller-supplied grammar.
    pub fn parse_with(text: &str, parser: &Parser, settings: &ParserSettings) -> CivilResult<Self> {
        let parsed = parser.parse_with(text, settings)?;
        Self::from_parsed(&parsed)
    }

    pub const fn datetime(&self) -> DateTime {
        self.datetime
    }

    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Seconds since the Unix epoch, ignoring the nanosecond.
    pub fn epoch_seconds(&self) -> i64 {
        self.datetime.epoch_seconds_at(self.offset)
    }

    /// The instant this value corresponds to.
    pub fn to_instant(&self) -> CivilResult<Instant> {
        Instant::from_epoch_seconds(self.epoch_seconds(), self.datetime.time().nanosecond())
    }

    /// Returns a writer rendering this value in the given format.
    pub fn to_writeable(&self, format: IsoFormat) -> FormattableOffsetDateTime {
        FormattableOffsetDateTime {
            datetime: self.datetime.to_writeable(format),
            offset: self.offset.to_writeable(format),
        }
    }
}

impl FromStr for OffsetDateTime {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = iso::extended::offset_date_time().parse(s)?;
        Self::from_parsed(&parsed)
    }
}

impl fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_writeable(IsoFormat::Extended).write_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use crate::components::{Date, Time};
    use crate::error::ErrorKind;

    #[test]
    fn resolves_sign_and_components() {
        assert_eq!(UtcOffset::from_str("Z").unwrap(), UtcOffset::ZERO);
        assert_eq!(UtcOffset::from_str("-04").unwrap().total_seconds(), -14_400);
        assert_eq!(
            UtcOffset::from_str("-04:00").unwrap().total_seconds(),
            -14_400
        );
        assert_eq!(
            UtcOffset::from_str("+01:02:03").unwrap().total_seconds(),
            3723
        );
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        assert_eq!(
            UtcOffset::from_total_seconds(MAX_OFFSET_SECONDS + 1)
                .unwrap_err()
                .kind(),
            ErrorKind::Range
        );
        assert!(UtcOffset::from_total_seconds(-MAX_OFFSET_SECONDS).is_ok());
        assert_eq!(
            UtcOffset::from_hms(1, -30, 0).unwrap_err().kind(),
            ErrorKind::Range
        );
        assert_eq!(
            UtcOffset::from_str("+19").unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn formats_zero_as_the_utc_designator() {
        assert_eq!(UtcOffset::ZERO.to_string(), "Z");
        assert_eq!(
            UtcOffset::ZERO.to_writeable(IsoFormat::Basic).to_string(),
            "Z"
        );
    }

    #[test]
    fn omits_zero_offset_seconds_when_formatting() {
        let offset = UtcOffset::from_total_seconds(-14_400).unwrap();
        assert_eq!(offset.to_string(), "-04:00");
        assert_eq!(offset.to_writeable(IsoFormat::Basic).to_string(), "-0400");
        let with_seconds = UtcOffset::from_hms(1, 2, 3).unwrap();
        assert_eq!(with_seconds.to_string(), "+01:02:03");
        assert_eq!(
            with_seconds.to_writeable(IsoFormat::Basic).to_string(),
            "+010203"
        );
    }

    #[test]
    fn signed_component_decomposition() {
        let offset = UtcOffset::from_total_seconds(-3723).unwrap();
        assert_eq!(
            (offset.hours(), offset.minutes(), offset.seconds()),
            (-1, -2, -3)
        );
    }

    #[test]
    fn offset_date_time_round_trips() {
        let value = OffsetDateTime::from_str("2008-09-01T18:30-04:00").unwrap();
        assert_eq!(value.offset().total_seconds(), -14_400);
        assert_eq!(value.to_string(), "2008-09-01T18:30-04:00");
        assert_eq!(
            value.to_writeable(IsoFormat::Basic).to_string(),
            "20080901T1830-0400"
        );
    }

    #[test]
    fn epoch_seconds_include_the_offset() {
        let value = OffsetDateTime::new(
            DateTime::new(
                Date::new(1970, 1, 1).unwrap(),
                Time::new(1, 0, 0, 0).unwrap(),
            ),
            UtcOffset::from_total_seconds(3600).unwrap(),
        );
        assert_eq!(value.epoch_seconds(), 0);
        assert_eq!(value.to_instant().unwrap(), Instant::UNIX_EPOCH);
    }
}
