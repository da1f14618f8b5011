//! This module implements `TimeZone`.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use crate::options::{ParserSettings, SignStyle};
use crate::parsers::Parser;
use crate::{CivilError, CivilResult};

use super::UtcOffset;

/// A time zone, either a named region or a fixed offset from UTC.
///
/// No zone rules are built in: a region's rules come from a
/// [`TimeZoneRulesProvider`][crate::provider::TimeZoneRulesProvider]
/// whenever the zone participates in resolving local times.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeZone {
    /// A named zone such as `Europe/Zurich`, understood by a rules
    /// provider.
    Region(String),
    /// A zone pinned to a single offset forever.
    FixedOffset(UtcOffset),
}

impl TimeZone {
    /// The fixed-offset zone for UTC, with the ID `Z`.
    pub const UTC: Self = Self::FixedOffset(UtcOffset::ZERO);

    /// Creates a zone from an identifier.
    ///
    /// `Z` and the `±hh:mm[:ss]` forms become fixed offsets; any other
    /// identifier of two or more characters names a region.
    pub fn from_id(id: &str) -> CivilResult<Self> {
        if id == "Z" {
            return Ok(Self::UTC);
        }
        if id.len() < 2 {
            return Err(
                CivilError::syntax().with_message(format!("{id:?} is not a valid time zone ID"))
            );
        }
        if id.starts_with('+') || id.starts_with('-') {
            let offset = UtcOffset::parse_with(id, &fixed_offset_id(), &ParserSettings::DEFAULT)?;
            return Ok(Self::FixedOffset(offset));
        }
        Ok(Self::Region(String::from(id)))
    }

    /// The zone's textual identifier. Fixed offsets use the canonical
    /// extended offset form, `Z` included.
    #[must_use]
    pub fn id(&self) -> Cow<'_, str> {
        match self {
            Self::Region(id) => Cow::Borrowed(id),
            Self::FixedOffset(offset) => Cow::Owned(offset.to_string()),
        }
    }

    #[must_use]
    pub const fn is_fixed_offset(&self) -> bool {
        matches!(self, Self::FixedOffset(_))
    }

    #[must_use]
    pub const fn is_region(&self) -> bool {
        matches!(self, Self::Region(_))
    }
}

/// A fixed-offset zone ID requires the minutes, unlike a UTC offset.
fn fixed_offset_id() -> Parser {
    Parser::build(|b| {
        b.utc_offset_sign()
            .utc_offset_hours(2..=2, Some(SignStyle::Never))
            .literal(':')
            .utc_offset_minutes(2..=2, Some(SignStyle::Never))
            .optional(|b| {
                b.literal(':')
                    .utc_offset_seconds(2..=2, Some(SignStyle::Never))
            })
    })
}

impl FromStr for TimeZone {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region(id) => f.write_str(id),
            Self::FixedOffset(offset) => offset.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_ids_to_the_right_variant() {
        assert_eq!(TimeZone::from_id("Z").unwrap(), TimeZone::UTC);
        assert_eq!(
            TimeZone::from_id("Europe/Zurich").unwrap(),
            TimeZone::Region("Europe/Zurich".into())
        );
        assert_eq!(
            TimeZone::from_id("+01:00").unwrap(),
            TimeZone::FixedOffset(UtcOffset::from_total_seconds(3600).unwrap())
        );
        assert_eq!(
            TimeZone::from_id("-05:30:15").unwrap(),
            TimeZone::FixedOffset(UtcOffset::from_hms(-5, -30, -15).unwrap())
        );
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(TimeZone::from_id("").is_err());
        assert!(TimeZone::from_id("X").is_err());
        // A fixed-offset ID requires the minutes.
        assert!(TimeZone::from_id("+01").is_err());
        assert!(TimeZone::from_id("+1:00").is_err());
    }

    #[test]
    fn ids_are_canonical() {
        assert_eq!(TimeZone::UTC.id(), "Z");
        assert_eq!(TimeZone::from_id("+01:00").unwrap().id(), "+01:00");
        assert_eq!(TimeZone::from_id("Europe/Zurich").unwrap().id(), "Europe/Zurich");
        assert_eq!(TimeZone::from_id("Europe/Zurich").unwrap().to_string(), "Europe/Zurich");
    }
}
