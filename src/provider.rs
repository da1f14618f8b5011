//! The `TimeZoneRulesProvider` trait.
//!
//! Zone rules are never compiled into this crate. Anything that turns a
//! local date-time into an instant asks a provider which offsets apply,
//! either passed explicitly or, on `std`, registered once per process.

use crate::components::{DateTime, Instant, UtcOffset};
use crate::CivilResult;

#[cfg(feature = "std")]
use crate::CivilError;
#[cfg(feature = "std")]
use alloc::boxed::Box;
#[cfg(feature = "std")]
use std::sync::OnceLock;

/// The source of time zone rules for named regions.
///
/// Implementations typically wrap a compiled copy of the IANA Time Zone
/// Database; this crate only consumes the answers.
pub trait TimeZoneRulesProvider {
    /// The offset in effect at an instant. Always unambiguous.
    fn offset_at(&self, region: &str, instant: Instant) -> CivilResult<UtcOffset>;

    /// The offsets a local date-time can map to: one normally, none
    /// inside a gap, two inside an overlap.
    fn valid_offsets_at(&self, region: &str, datetime: DateTime) -> CivilResult<ValidOffsets>;

    /// The transition active at a local date-time, if it falls inside a
    /// gap or overlap.
    fn transition_at(&self, region: &str, datetime: DateTime)
        -> CivilResult<Option<OffsetTransition>>;

    /// Whether this provider has rules for the region.
    fn is_valid_region(&self, region: &str) -> bool;
}

/// The offsets valid for one local date-time in one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidOffsets {
    /// The local time falls in a gap and never occurs.
    None,
    /// The unambiguous case.
    One(UtcOffset),
    /// The local time falls in an overlap and occurs twice; the offset
    /// in effect before the transition leads.
    Two([UtcOffset; 2]),
}

impl ValidOffsets {
    #[must_use]
    pub fn as_slice(&self) -> &[UtcOffset] {
        match self {
            Self::None => &[],
            Self::One(offset) => core::slice::from_ref(offset),
            Self::Two(offsets) => offsets,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn contains(&self, offset: UtcOffset) -> bool {
        self.as_slice().contains(&offset)
    }
}

/// One daylight saving (or standard time) transition in a zone.
///
/// The transition is described from the local side: the first local
/// date-time no longer covered by the old offset, plus the offsets on
/// either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTransition {
    datetime_before: DateTime,
    offset_before: UtcOffset,
    offset_after: UtcOffset,
}

impl OffsetTransition {
    #[must_use]
    pub const fn new(
        datetime_before: DateTime,
        offset_before: UtcOffset,
        offset_after: UtcOffset,
    ) -> Self {
        Self {
            datetime_before,
            offset_before,
            offset_after,
        }
    }

    pub const fn datetime_before(&self) -> DateTime {
        self.datetime_before
    }

    pub const fn offset_before(&self) -> UtcOffset {
        self.offset_before
    }

    pub const fn offset_after(&self) -> UtcOffset {
        self.offset_after
    }

    /// The local date-time where the new offset picks up. `None` only
    /// when the shift leaves the supported date range.
    #[must_use]
    pub fn datetime_after(&self) -> Option<DateTime> {
        self.datetime_before.checked_add_seconds(self.duration_seconds())
    }

    /// The length of the transition: positive for a gap, negative for
    /// an overlap.
    #[must_use]
    pub const fn duration_seconds(&self) -> i64 {
        self.offset_after.total_seconds() as i64 - self.offset_before.total_seconds() as i64
    }

    #[must_use]
    pub const fn is_gap(&self) -> bool {
        self.duration_seconds() > 0
    }

    #[must_use]
    pub const fn is_overlap(&self) -> bool {
        self.duration_seconds() < 0
    }
}

/// A provider for contexts that never resolve zoned values.
pub struct NeverProvider;

impl TimeZoneRulesProvider for NeverProvider {
    fn offset_at(&self, _: &str, _: Instant) -> CivilResult<UtcOffset> {
        unimplemented!()
    }

    fn valid_offsets_at(&self, _: &str, _: DateTime) -> CivilResult<ValidOffsets> {
        unimplemented!()
    }

    fn transition_at(&self, _: &str, _: DateTime) -> CivilResult<Option<OffsetTransition>> {
        unimplemented!()
    }

    fn is_valid_region(&self, _: &str) -> bool {
        unimplemented!()
    }
}

#[cfg(feature = "std")]
static GLOBAL_RULES: OnceLock<Box<dyn TimeZoneRulesProvider + Send + Sync>> = OnceLock::new();

/// Registers the process-wide time zone rules provider.
///
/// Registration is first-wins: a second call fails rather than
/// replacing the rules other code may already have resolved against.
#[cfg(feature = "std")]
pub fn register_time_zone_rules<P>(provider: P) -> CivilResult<()>
where
    P: TimeZoneRulesProvider + Send + Sync + 'static,
{
    GLOBAL_RULES
        .set(Box::new(provider))
        .map_err(|_| CivilError::general("time zone rules are already registered"))
}

/// The process-wide time zone rules provider, if one was registered.
#[cfg(feature = "std")]
pub fn time_zone_rules() -> CivilResult<&'static (dyn TimeZoneRulesProvider + Send + Sync)> {
    GLOBAL_RULES
        .get()
        .map(|rules| &**rules)
        .ok_or_else(|| CivilError::general("no time zone rules have been registered"))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixed rule sets for two zones over 2007. Central Europe has the
    //! spring-forward gap on March 25th (02:00 becomes 03:00 local) and
    //! the fall-back overlap on October 28th (03:00 becomes 02:00).
    //! Brazil runs daylight saving over the year boundary and its
    //! October 14th spring-forward gap starts at midnight.

    use super::{OffsetTransition, TimeZoneRulesProvider, ValidOffsets};
    use crate::components::{Date, DateTime, Instant, Time, UtcOffset};
    use crate::{CivilError, CivilResult};

    pub(crate) const REGION: &str = "Europe/Zurich";
    pub(crate) const MIDNIGHT_GAP_REGION: &str = "America/Sao_Paulo";

    pub(crate) fn offset(seconds: i32) -> UtcOffset {
        UtcOffset::from_total_seconds(seconds).unwrap()
    }

    pub(crate) fn standard() -> UtcOffset {
        offset(3600)
    }

    pub(crate) fn daylight() -> UtcOffset {
        offset(7200)
    }

    pub(crate) fn local(month: u8, day: u8, hour: u8, minute: u8) -> DateTime {
        DateTime::new(
            Date::new(2007, month, day).unwrap(),
            Time::new(hour, minute, 0, 0).unwrap(),
        )
    }

    fn transitions(region: &str) -> CivilResult<[OffsetTransition; 2]> {
        match region {
            REGION => Ok([
                OffsetTransition::new(local(3, 25, 2, 0), standard(), daylight()),
                OffsetTransition::new(local(10, 28, 3, 0), daylight(), standard()),
            ]),
            MIDNIGHT_GAP_REGION => Ok([
                OffsetTransition::new(local(2, 25, 0, 0), offset(-7200), offset(-10800)),
                OffsetTransition::new(local(10, 14, 0, 0), offset(-10800), offset(-7200)),
            ]),
            _ => Err(CivilError::general("unknown time zone region")),
        }
    }

    /// The local window a transition makes ambiguous, low bound first.
    fn window(transition: &OffsetTransition) -> (DateTime, DateTime) {
        let before = transition.datetime_before();
        let after = transition.datetime_after().unwrap();
        if after < before {
            (after, before)
        } else {
            (before, after)
        }
    }

    pub(crate) struct Rules2007;

    impl TimeZoneRulesProvider for Rules2007 {
        fn offset_at(&self, region: &str, instant: Instant) -> CivilResult<UtcOffset> {
            let transitions = transitions(region)?;
            let mut offset = transitions[0].offset_before();
            for transition in &transitions {
                let at = transition
                    .datetime_before()
                    .epoch_seconds_at(transition.offset_before());
                if instant.epoch_seconds() >= at {
                    offset = transition.offset_after();
                }
            }
            Ok(offset)
        }

        fn valid_offsets_at(&self, region: &str, datetime: DateTime) -> CivilResult<ValidOffsets> {
            let transitions = transitions(region)?;
            let mut offset = transitions[0].offset_before();
            for transition in &transitions {
                let (start, end) = window(transition);
                if datetime >= start && datetime < end {
                    return Ok(if transition.is_gap() {
                        ValidOffsets::None
                    } else {
                        ValidOffsets::Two([transition.offset_before(), transition.offset_after()])
                    });
                }
                if datetime >= end {
                    offset = transition.offset_after();
                }
            }
            Ok(ValidOffsets::One(offset))
        }

        fn transition_at(
            &self,
            region: &str,
            datetime: DateTime,
        ) -> CivilResult<Option<OffsetTransition>> {
            let transitions = transitions(region)?;
            Ok(transitions.into_iter().find(|transition| {
                let (start, end) = window(transition);
                datetime >= start && datetime < end
            }))
        }

        fn is_valid_region(&self, region: &str) -> bool {
            transitions(region).is_ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{
        daylight, local, offset, standard, Rules2007, MIDNIGHT_GAP_REGION, REGION,
    };
    use super::*;

    #[test]
    fn transition_shapes() {
        let provider = Rules2007;
        let spring = provider
            .transition_at(REGION, local(3, 25, 2, 30))
            .unwrap()
            .unwrap();
        assert!(spring.is_gap());
        assert_eq!(spring.duration_seconds(), 3600);
        assert_eq!(spring.datetime_after().unwrap(), local(3, 25, 3, 0));

        let fall = provider
            .transition_at(REGION, local(10, 28, 2, 30))
            .unwrap()
            .unwrap();
        assert!(fall.is_overlap());
        assert_eq!(fall.duration_seconds(), -3600);
        assert_eq!(fall.datetime_after().unwrap(), local(10, 28, 2, 0));

        assert!(provider
            .transition_at(REGION, local(7, 1, 12, 0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn valid_offsets_around_the_transitions() {
        let provider = Rules2007;
        let gap = provider.valid_offsets_at(REGION, local(3, 25, 2, 30)).unwrap();
        assert!(gap.is_empty());
        assert_eq!(gap.as_slice(), &[]);

        let overlap = provider
            .valid_offsets_at(REGION, local(10, 28, 2, 30))
            .unwrap();
        assert_eq!(overlap.len(), 2);
        assert_eq!(overlap.as_slice(), &[daylight(), standard()]);
        assert!(overlap.contains(standard()));

        let summer = provider.valid_offsets_at(REGION, local(7, 1, 12, 0)).unwrap();
        assert_eq!(summer, ValidOffsets::One(daylight()));
        let winter = provider.valid_offsets_at(REGION, local(1, 1, 12, 0)).unwrap();
        assert_eq!(winter, ValidOffsets::One(standard()));
    }

    #[test]
    fn midnight_gap_region() {
        let provider = Rules2007;
        let gap = provider
            .valid_offsets_at(MIDNIGHT_GAP_REGION, local(10, 14, 0, 30))
            .unwrap();
        assert!(gap.is_empty());

        let overlap = provider
            .valid_offsets_at(MIDNIGHT_GAP_REGION, local(2, 24, 23, 30))
            .unwrap();
        assert_eq!(overlap.as_slice(), &[offset(-7200), offset(-10800)]);

        let january = provider
            .valid_offsets_at(MIDNIGHT_GAP_REGION, local(1, 10, 12, 0))
            .unwrap();
        assert_eq!(january, ValidOffsets::One(offset(-7200)));
        let june = provider
            .valid_offsets_at(MIDNIGHT_GAP_REGION, local(6, 10, 12, 0))
            .unwrap();
        assert_eq!(june, ValidOffsets::One(offset(-10800)));
    }

    #[test]
    fn unknown_regions_are_errors() {
        let provider = Rules2007;
        assert!(provider
            .valid_offsets_at("Mars/Olympus", local(1, 1, 0, 0))
            .is_err());
        assert!(!provider.is_valid_region("Mars/Olympus"));
        assert!(provider.is_valid_region(REGION));
        assert!(provider.is_valid_region(MIDNIGHT_GAP_REGION));
    }
}
