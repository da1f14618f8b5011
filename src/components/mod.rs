//! The calendar and clock value types.
//!
//! Each component resolves from the field map produced by a grammar in
//! [`crate::parsers::iso`] (or a user-built one) and renders back to
//! ISO-8601 text through the writers in [`crate::parsers`].

mod date;
mod datetime;
mod duration;
mod instant;
mod offset;
mod time;
mod timezone;
mod zoned;

pub use date::Date;
pub use datetime::DateTime;
pub use duration::{Duration, Period};
pub use instant::Instant;
pub use offset::{OffsetDateTime, UtcOffset};
pub use time::Time;
pub use timezone::TimeZone;
pub use zoned::ZonedDateTime;

use alloc::format;

use crate::error::ErrorKind;
use crate::fields::Field;
use crate::{CivilError, CivilResult};

/// Narrows a parsed `i64` field value, erroring when it does not fit
/// the component's integer type.
pub(crate) fn narrow<T: TryFrom<i64>>(field: Field, value: i64) -> CivilResult<T> {
    T::try_from(value).map_err(|_| {
        CivilError::range().with_message(format!("{field} value {value} is out of range"))
    })
}

/// The error reported when a grammar matched but did not supply the
/// fields a component needs.
pub(crate) fn unresolved(target: &str) -> CivilError {
    CivilError::general(format!(
        "the parsed fields do not resolve to a complete {target}"
    ))
}

/// Renames the unresolved-fields error of a constituent part after its
/// enclosing component, leaving range errors intact.
pub(crate) fn unresolved_as<T>(result: CivilResult<T>, target: &str) -> CivilResult<T> {
    result.map_err(|err| {
        if err.kind() == ErrorKind::Generic {
            unresolved(target)
        } else {
            err
        }
    })
}
