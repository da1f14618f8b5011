//! This module implements `ZonedDateTime` and the resolution of local
//! date-times against time zone rules.

use core::fmt;

use writeable::Writeable;

use crate::fields::{Field, ParsedFields};
use crate::options::ParserSettings;
use crate::parsers::{FormattableZoned, IsoFormat, Parser};
use crate::provider::{TimeZoneRulesProvider, ValidOffsets};
use crate::{civil_assert, CivilError, CivilResult, CivilUnwrap};

use super::{unresolved_as, Date, DateTime, Instant, Time, TimeZone, UtcOffset};

#[cfg(feature = "std")]
use core::str::FromStr;

#[cfg(feature = "std")]
use crate::parsers::iso;
#[cfg(feature = "std")]
use crate::provider::time_zone_rules;

/// A date-time anchored to a time zone.
///
/// A `ZonedDateTime` pins down all three views of one moment: the local
/// date-time, the UTC offset in effect, and the zone the offset was
/// derived from. Construction goes through a [`TimeZoneRulesProvider`],
/// so local times that fall inside a daylight saving gap or overlap
/// resolve deterministically. With the `std` feature the provider can be
/// registered once per process and the `_with_provider` suffix dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    datetime: DateTime,
    offset: UtcOffset,
    zone: TimeZone,
}

impl ZonedDateTime {
    /// Resolves a local date-time in a zone.
    ///
    /// A local time inside a gap is pushed forward by the transition
    /// duration and takes the offset after the transition. A local time
    /// inside an overlap takes `preferred_offset` when that is one of
    /// the two valid offsets, and the earlier offset otherwise.
    pub fn from_local_with_provider<P>(
        datetime: DateTime,
        zone: TimeZone,
        preferred_offset: Option<UtcOffset>,
        provider: &P,
    ) -> CivilResult<Self>
    where
        P: TimeZoneRulesProvider + ?Sized,
    {
        let region = match &zone {
            TimeZone::FixedOffset(offset) => {
                let offset = *offset;
                return Ok(Self {
                    datetime,
                    offset,
                    zone,
                });
            }
            TimeZone::Region(region) => region,
        };
        match provider.valid_offsets_at(region, datetime)? {
            ValidOffsets::One(offset) => Ok(Self {
                datetime,
                offset,
                zone,
            }),
            ValidOffsets::None => {
                let transition = provider.transition_at(region, datetime)?.civil_unwrap()?;
                civil_assert!(
                    transition.is_gap(),
                    "Assertion failed: {region} reports no valid offsets outside a gap at {datetime}"
                );
                let datetime = datetime
                    .checked_add_seconds(transition.duration_seconds())
                    .civil_unwrap()?;
                Ok(Self {
                    datetime,
                    offset: transition.offset_after(),
                    zone,
                })
            }
            ValidOffsets::Two(offsets) => {
                let offset = match preferred_offset {
                    Some(preferred) if offsets.contains(&preferred) => preferred,
                    _ => offsets[0],
                };
                Ok(Self {
                    datetime,
                    offset,
                    zone,
                })
            }
        }
    }

    /// Converts an instant to the local date-time in a zone. The offset
    /// at an instant is always unambiguous.
    pub fn from_instant_with_provider<P>(
        instant: Instant,
        zone: TimeZone,
        provider: &P,
    ) -> CivilResult<Self>
    where
        P: TimeZoneRulesProvider + ?Sized,
    {
        let offset = match &zone {
            TimeZone::FixedOffset(offset) => *offset,
            TimeZone::Region(region) => provider.offset_at(region, instant)?,
        };
        let datetime =
            DateTime::from_epoch_seconds(instant.epoch_seconds(), instant.nanosecond(), offset)?;
        Ok(Self {
            datetime,
            offset,
            zone,
        })
    }

    /// Resolves parsed fields into a zoned date-time.
    ///
    /// Without a `TimeZoneId` field the parsed offset doubles as a
    /// fixed-offset zone. When the parsed offset is not valid for the
    /// zone at the parsed local time, the value is rebuilt from the
    /// instant the pair describes, so the instant wins over the wall
    /// time.
    pub fn from_parsed_with_provider<P>(parsed: &ParsedFields, provider: &P) -> CivilResult<Self>
    where
        P: TimeZoneRulesProvider + ?Sized,
    {
        let datetime = unresolved_as(DateTime::from_parsed(parsed), "zoned date-time")?;
        let offset = unresolved_as(UtcOffset::from_parsed(parsed), "zoned date-time")?;
        let zone = match parsed.get_text(Field::TimeZoneId) {
            Some(id) => TimeZone::from_id(id)?,
            None => offset.as_time_zone(),
        };
        let valid = match &zone {
            TimeZone::FixedOffset(fixed) => *fixed == offset,
            TimeZone::Region(region) => {
                provider.valid_offsets_at(region, datetime)?.contains(offset)
            }
        };
        if valid {
            Ok(Self {
                datetime,
                offset,
                zone,
            })
        } else {
            let instant = Instant::from_epoch_seconds(
                datetime.epoch_seconds_at(offset),
                datetime.time().nanosecond(),
            )?;
            Self::from_instant_with_provider(instant, zone, provider)
        }
    }

    /// Parses a zoned date-time with a caller-supplied grammar.
    pub fn parse_with_provider<P>(
        text: &str,
        parser: &Parser,
        settings: &ParserSettings,
        provider: &P,
    ) -> CivilResult<Self>
    where
        P: TimeZoneRulesProvider + ?Sized,
    {
        let parsed = parser.parse_with(text, settings)?;
        Self::from_parsed_with_provider(&parsed, provider)
    }

    /// Switches to the earlier of the two instants sharing this local
    /// time, when it falls inside an overlap. No-op everywhere else.
    pub fn with_earlier_offset_at_overlap_with_provider<P>(
        &self,
        provider: &P,
    ) -> CivilResult<Self>
    where
        P: TimeZoneRulesProvider + ?Sized,
    {
        if let TimeZone::Region(region) = &self.zone {
            if let Some(transition) = provider.transition_at(region, self.datetime)? {
                let earlier = transition.offset_before();
                if transition.is_overlap() && earlier != self.offset {
                    return Ok(Self {
                        offset: earlier,
                        ..self.clone()
                    });
                }
            }
        }
        Ok(self.clone())
    }

    /// Switches to the later of the two instants sharing this local
    /// time, when it falls inside an overlap. No-op everywhere else.
    pub fn with_later_offset_at_overlap_with_provider<P>(&self, provider: &P) -> CivilResult<Self>
    where
        P: TimeZoneRulesProvider + ?Sized,
    {
        if let TimeZone::Region(region) = &self.zone {
            if let Some(transition) = provider.transition_at(region, self.datetime)? {
                let later = transition.offset_after();
                if transition.is_overlap() && later != self.offset {
                    return Ok(Self {
                        offset: later,
                        ..self.clone()
                    });
                }
            }
        }
        Ok(self.clone())
    }

    /// The first instant of a date in a zone.
    ///
    /// When midnight falls inside a gap, the day starts at the end of
    /// the transition instead.
    pub fn start_of_day_with_provider<P>(
        date: Date,
        zone: TimeZone,
        provider: &P,
    ) -> CivilResult<Self>
    where
        P: TimeZoneRulesProvider + ?Sized,
    {
        let mut datetime = DateTime::new(date, Time::MIDNIGHT);
        if let TimeZone::Region(region) = &zone {
            if let Some(transition) = provider.transition_at(region, datetime)? {
                if transition.is_gap() {
                    datetime = transition.datetime_after().civil_unwrap()?;
                }
            }
        }
        Self::from_local_with_provider(datetime, zone, None, provider)
    }

    /// The last representable instant of a date in a zone.
    ///
    /// Inside an overlap the later of the two instants is the end of the
    /// day; inside a gap the end of the day collapses onto the moment
    /// the transition starts.
    pub fn end_of_day_with_provider<P>(date: Date, zone: TimeZone, provider: &P) -> CivilResult<Self>
    where
        P: TimeZoneRulesProvider + ?Sized,
    {
        let datetime = DateTime::new(date, Time::MAX);
        let region = match &zone {
            TimeZone::FixedOffset(offset) => {
                let offset = *offset;
                return Ok(Self {
                    datetime,
                    offset,
                    zone,
                });
            }
            TimeZone::Region(region) => region,
        };
        match provider.valid_offsets_at(region, datetime)? {
            ValidOffsets::One(offset) => Ok(Self {
                datetime,
                offset,
                zone,
            }),
            ValidOffsets::None => {
                let transition = provider.transition_at(region, datetime)?.civil_unwrap()?;
                Ok(Self {
                    datetime: transition.datetime_before(),
                    offset: transition.offset_before(),
                    zone,
                })
            }
            ValidOffsets::Two(_) => {
                let transition = provider.transition_at(region, datetime)?.civil_unwrap()?;
                Ok(Self {
                    datetime,
                    offset: transition.offset_after(),
                    zone,
                })
            }
        }
    }

    pub const fn datetime(&self) -> DateTime {
        self.datetime
    }

    pub const fn date(&self) -> Date {
        self.datetime.date()
    }

    pub const fn time(&self) -> Time {
        self.datetime.time()
    }

    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn zone(&self) -> &TimeZone {
        &self.zone
    }

    /// Seconds since `1970-01-01T00:00Z`, ignoring the nanosecond.
    pub fn epoch_seconds(&self) -> i64 {
        self.datetime.epoch_seconds_at(self.offset)
    }

    pub fn to_instant(&self) -> CivilResult<Instant> {
        Instant::from_epoch_seconds(self.epoch_seconds(), self.datetime.time().nanosecond())
    }

    /// Returns a writer rendering this value in the given format. Region
    /// zones append their bracketed identifier; fixed offsets do not.
    pub fn to_writeable(&self, format: IsoFormat) -> FormattableZoned<'_> {
        FormattableZoned {
            datetime: self.datetime.to_writeable(format),
            offset: self.offset.to_writeable(format),
            region: match &self.zone {
                TimeZone::Region(region) => Some(region.as_str()),
                TimeZone::FixedOffset(_) => None,
            },
        }
    }
}

#[cfg(feature = "std")]
impl ZonedDateTime {
    /// [`Self::from_local_with_provider`] with the registered rules.
    pub fn from_local(
        datetime: DateTime,
        zone: TimeZone,
        preferred_offset: Option<UtcOffset>,
    ) -> CivilResult<Self> {
        Self::from_local_with_provider(datetime, zone, preferred_offset, time_zone_rules()?)
    }

    /// [`Self::from_instant_with_provider`] with the registered rules.
    pub fn from_instant(instant: Instant, zone: TimeZone) -> CivilResult<Self> {
        Self::from_instant_with_provider(instant, zone, time_zone_rules()?)
    }

    /// [`Self::start_of_day_with_provider`] with the registered rules.
    pub fn start_of_day(date: Date, zone: TimeZone) -> CivilResult<Self> {
        Self::start_of_day_with_provider(date, zone, time_zone_rules()?)
    }

    /// [`Self::end_of_day_with_provider`] with the registered rules.
    pub fn end_of_day(date: Date, zone: TimeZone) -> CivilResult<Self> {
        Self::end_of_day_with_provider(date, zone, time_zone_rules()?)
    }
}

#[cfg(feature = "std")]
impl FromStr for ZonedDateTime {
    type Err = CivilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = iso::extended::zoned_date_time().parse(s)?;
        Self::from_parsed_with_provider(&parsed, time_zone_rules()?)
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_writeable(IsoFormat::Extended).write_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use crate::parsers::iso;
    use crate::provider::testing::{
        daylight, local, offset, standard, Rules2007, MIDNIGHT_GAP_REGION, REGION,
    };
    use crate::provider::NeverProvider;

    fn zurich() -> TimeZone {
        TimeZone::from_id(REGION).unwrap()
    }

    fn sao_paulo() -> TimeZone {
        TimeZone::from_id(MIDNIGHT_GAP_REGION).unwrap()
    }

    #[test]
    fn resolves_unambiguous_local_times() {
        let summer =
            ZonedDateTime::from_local_with_provider(local(7, 1, 12, 0), zurich(), None, &Rules2007)
                .unwrap();
        assert_eq!(summer.offset(), daylight());
        assert_eq!(summer.datetime(), local(7, 1, 12, 0));
        assert_eq!(summer.to_string(), "2007-07-01T12:00+02:00[Europe/Zurich]");
        assert_eq!(
            summer.epoch_seconds(),
            local(7, 1, 12, 0).epoch_seconds_at(daylight())
        );

        let winter =
            ZonedDateTime::from_local_with_provider(local(1, 15, 9, 30), zurich(), None, &Rules2007)
                .unwrap();
        assert_eq!(winter.offset(), standard());
        assert_eq!(winter.to_string(), "2007-01-15T09:30+01:00[Europe/Zurich]");
    }

    #[test]
    fn pushes_gap_times_forward() {
        let value =
            ZonedDateTime::from_local_with_provider(local(3, 25, 2, 30), zurich(), None, &Rules2007)
                .unwrap();
        assert_eq!(value.datetime(), local(3, 25, 3, 30));
        assert_eq!(value.offset(), daylight());
        // The shifted wall time names the same instant the skipped one
        // would have at the pre-transition offset.
        assert_eq!(
            value.epoch_seconds(),
            local(3, 25, 2, 30).epoch_seconds_at(standard())
        );
    }

    #[test]
    fn overlaps_prefer_the_earlier_offset() {
        let default =
            ZonedDateTime::from_local_with_provider(local(10, 28, 2, 30), zurich(), None, &Rules2007)
                .unwrap();
        assert_eq!(default.offset(), daylight());

        let kept = ZonedDateTime::from_local_with_provider(
            local(10, 28, 2, 30),
            zurich(),
            Some(standard()),
            &Rules2007,
        )
        .unwrap();
        assert_eq!(kept.offset(), standard());
        assert_eq!(kept.datetime(), local(10, 28, 2, 30));

        let ignored = ZonedDateTime::from_local_with_provider(
            local(10, 28, 2, 30),
            zurich(),
            Some(offset(0)),
            &Rules2007,
        )
        .unwrap();
        assert_eq!(ignored.offset(), daylight());
    }

    #[test]
    fn overlap_switchers_are_idempotent() {
        let earlier =
            ZonedDateTime::from_local_with_provider(local(10, 28, 2, 30), zurich(), None, &Rules2007)
                .unwrap();
        let later = earlier
            .with_later_offset_at_overlap_with_provider(&Rules2007)
            .unwrap();
        assert_eq!(later.offset(), standard());
        assert_eq!(later.datetime(), earlier.datetime());
        assert_eq!(later.epoch_seconds(), earlier.epoch_seconds() + 3600);
        assert_eq!(
            later
                .with_later_offset_at_overlap_with_provider(&Rules2007)
                .unwrap(),
            later
        );
        assert_eq!(
            later
                .with_earlier_offset_at_overlap_with_provider(&Rules2007)
                .unwrap(),
            earlier
        );

        let summer =
            ZonedDateTime::from_local_with_provider(local(7, 1, 12, 0), zurich(), None, &Rules2007)
                .unwrap();
        assert_eq!(
            summer
                .with_later_offset_at_overlap_with_provider(&Rules2007)
                .unwrap(),
            summer
        );
    }

    #[test]
    fn converts_instants_in_both_directions() {
        let transition =
            Instant::from_epoch_seconds(local(3, 25, 2, 0).epoch_seconds_at(standard()), 0)
                .unwrap();
        let at = ZonedDateTime::from_instant_with_provider(transition, zurich(), &Rules2007)
            .unwrap();
        assert_eq!(at.datetime(), local(3, 25, 3, 0));
        assert_eq!(at.offset(), daylight());
        assert_eq!(at.to_instant().unwrap(), transition);

        let before = Instant::from_epoch_seconds(transition.epoch_seconds() - 1, 0).unwrap();
        let last = ZonedDateTime::from_instant_with_provider(before, zurich(), &Rules2007)
            .unwrap();
        assert_eq!(last.offset(), standard());
        assert_eq!(last.to_string(), "2007-03-25T01:59:59+01:00[Europe/Zurich]");
    }

    #[test]
    fn fixed_offset_zones_bypass_the_rules() {
        let zone = TimeZone::from_id("+04:00").unwrap();
        let value = ZonedDateTime::from_local_with_provider(
            local(7, 1, 12, 0),
            zone.clone(),
            None,
            &NeverProvider,
        )
        .unwrap();
        assert_eq!(value.offset().total_seconds(), 4 * 3600);
        assert_eq!(value.to_string(), "2007-07-01T12:00+04:00");
        assert_eq!(
            value
                .with_earlier_offset_at_overlap_with_provider(&NeverProvider)
                .unwrap(),
            value
        );

        let instant = value.to_instant().unwrap();
        let back = ZonedDateTime::from_instant_with_provider(instant, zone, &NeverProvider)
            .unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn starts_days_after_midnight_gaps() {
        let plain =
            ZonedDateTime::start_of_day_with_provider(local(7, 1, 0, 0).date(), zurich(), &Rules2007)
                .unwrap();
        assert_eq!(plain.datetime(), local(7, 1, 0, 0));
        assert_eq!(plain.offset(), daylight());

        let skipped = ZonedDateTime::start_of_day_with_provider(
            local(10, 14, 0, 0).date(),
            sao_paulo(),
            &Rules2007,
        )
        .unwrap();
        assert_eq!(skipped.datetime(), local(10, 14, 1, 0));
        assert_eq!(skipped.offset(), offset(-7200));
    }

    #[test]
    fn ends_days_inside_overlaps() {
        let plain =
            ZonedDateTime::end_of_day_with_provider(local(7, 1, 0, 0).date(), zurich(), &Rules2007)
                .unwrap();
        assert_eq!(plain.time(), Time::MAX);
        assert_eq!(plain.offset(), daylight());

        let repeated = ZonedDateTime::end_of_day_with_provider(
            local(2, 24, 0, 0).date(),
            sao_paulo(),
            &Rules2007,
        )
        .unwrap();
        assert_eq!(repeated.time(), Time::MAX);
        assert_eq!(repeated.offset(), offset(-10800));
    }

    #[test]
    fn parsing_reconciles_invalid_offsets() {
        let settings = ParserSettings::DEFAULT;
        let grammar = iso::extended::zoned_date_time();

        let earlier = ZonedDateTime::parse_with_provider(
            "2007-10-28T02:30+02:00[Europe/Zurich]",
            &grammar,
            &settings,
            &Rules2007,
        )
        .unwrap();
        assert_eq!(earlier.offset(), daylight());
        let later = ZonedDateTime::parse_with_provider(
            "2007-10-28T02:30+01:00[Europe/Zurich]",
            &grammar,
            &settings,
            &Rules2007,
        )
        .unwrap();
        assert_eq!(later.offset(), standard());
        assert_eq!(later.datetime(), earlier.datetime());

        // A stale offset keeps the instant, not the wall time.
        let rebuilt = ZonedDateTime::parse_with_provider(
            "2007-07-01T12:00+01:00[Europe/Zurich]",
            &grammar,
            &settings,
            &Rules2007,
        )
        .unwrap();
        assert_eq!(rebuilt.datetime(), local(7, 1, 13, 0));
        assert_eq!(rebuilt.offset(), daylight());
        assert_eq!(
            rebuilt.epoch_seconds(),
            local(7, 1, 12, 0).epoch_seconds_at(standard())
        );

        let fixed = ZonedDateTime::parse_with_provider(
            "2007-07-01T12:00+05:00",
            &grammar,
            &settings,
            &Rules2007,
        )
        .unwrap();
        assert!(fixed.zone().is_fixed_offset());
        assert_eq!(fixed.to_string(), "2007-07-01T12:00+05:00");
    }

    #[cfg(feature = "std")]
    #[test]
    fn ambient_rules_registry() {
        use crate::provider::{register_time_zone_rules, time_zone_rules};

        // The registry is process-global, so every ordering-sensitive
        // observation lives in this one test.
        assert!(time_zone_rules().is_err());
        assert!("2007-07-01T12:00+02:00[Europe/Zurich]"
            .parse::<ZonedDateTime>()
            .is_err());

        register_time_zone_rules(Rules2007).unwrap();
        assert!(register_time_zone_rules(Rules2007).is_err());

        let parsed: ZonedDateTime = "2007-07-01T12:00+02:00[Europe/Zurich]".parse().unwrap();
        assert_eq!(parsed.offset(), daylight());
        let built = ZonedDateTime::from_local(local(7, 1, 12, 0), zurich(), None).unwrap();
        assert_eq!(built, parsed);
        assert!(time_zone_rules().unwrap().is_valid_region(REGION));
    }
}
