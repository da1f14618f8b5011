//! ISO-8601 writers built on [`writeable::Writeable`].
//!
//! Each writer holds plain component values and renders one grammar's
//! canonical text. The value types build these for their `Display`
//! impls; tests use them directly to produce the basic forms.

use core::fmt;

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

/// Selects between the ISO-8601 basic and extended forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsoFormat {
    /// No separators, like `20080901` and `183000`.
    Basic,
    /// Separators, like `2008-09-01` and `18:30:00`.
    #[default]
    Extended,
}

impl IsoFormat {
    fn is_extended(self) -> bool {
        matches!(self, Self::Extended)
    }
}

/// Controls how much of a time's tail is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Omit zero seconds; write the fraction to millisecond,
    /// microsecond, or nanosecond precision as needed.
    #[default]
    Auto,
    /// Stop after the minute.
    Minute,
    /// Write the seconds and exactly this many fraction digits; zero
    /// omits the fraction entirely.
    Digit(u8),
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub format: IsoFormat,
}

impl Writeable for FormattableDate {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        write_year(self.year, sink)?;
        if self.format.is_extended() {
            sink.write_char('-')?;
        }
        write_padded_u8(self.month, sink)?;
        if self.format.is_extended() {
            sink.write_char('-')?;
        }
        write_padded_u8(self.day, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let sep = 2 * self.format.is_extended() as usize;
        LengthHint::exact(year_length(self.year) + 4 + sep)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableOrdinalDate {
    pub year: i32,
    pub day_of_year: u16,
    pub format: IsoFormat,
}

impl Writeable for FormattableOrdinalDate {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        write_year(self.year, sink)?;
        if self.format.is_extended() {
            sink.write_char('-')?;
        }
        let (digits, _) = u32_to_digits(u32::from(self.day_of_year));
        write_digit_slice_to_precision(digits, 6, 9, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let sep = self.format.is_extended() as usize;
        LengthHint::exact(year_length(self.year) + 3 + sep)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableYearMonth {
    pub year: i32,
    pub month: u8,
}

impl Writeable for FormattableYearMonth {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        write_year(self.year, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.month, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(year_length(self.year) + 3)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    pub precision: Precision,
    pub format: IsoFormat,
}

impl Writeable for FormattableTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let extended = self.format.is_extended();
        write_padded_u8(self.hour, sink)?;
        if extended {
            sink.write_char(':')?;
        }
        write_padded_u8(self.minute, sink)?;
        if self.precision == Precision::Minute
            || (self.precision == Precision::Auto && self.second == 0 && self.nanosecond == 0)
        {
            return Ok(());
        }
        if extended {
            sink.write_char(':')?;
        }
        write_padded_u8(self.second, sink)?;
        if (self.nanosecond == 0 && self.precision == Precision::Auto)
            || self.precision == Precision::Digit(0)
        {
            return Ok(());
        }
        sink.write_char('.')?;
        write_time_fraction(self.nanosecond, self.precision, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let sep = self.format.is_extended() as usize;
        if self.precision == Precision::Minute
            || (self.precision == Precision::Auto && self.second == 0 && self.nanosecond == 0)
        {
            return LengthHint::exact(4 + sep);
        }
        let base = 6 + 2 * sep;
        if (self.nanosecond == 0 && self.precision == Precision::Auto)
            || self.precision == Precision::Digit(0)
        {
            return LengthHint::exact(base);
        }
        if let Precision::Digit(digits) = self.precision {
            return LengthHint::exact(base + 1 + digits.min(9) as usize);
        }
        LengthHint::exact(base + 1 + fraction_group_length(self.nanosecond))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableUtcOffset {
    pub total_seconds: i32,
    pub format: IsoFormat,
}

impl Writeable for FormattableUtcOffset {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        if self.total_seconds == 0 {
            return sink.write_char('Z');
        }
        let sign = if self.total_seconds < 0 { '-' } else { '+' };
        sink.write_char(sign)?;
        let magnitude = self.total_seconds.unsigned_abs();
        write_padded_u8((magnitude / 3600) as u8, sink)?;
        if self.format.is_extended() {
            sink.write_char(':')?;
        }
        write_padded_u8((magnitude % 3600 / 60) as u8, sink)?;
        if magnitude % 60 != 0 {
            if self.format.is_extended() {
                sink.write_char(':')?;
            }
            write_padded_u8((magnitude % 60) as u8, sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        if self.total_seconds == 0 {
            return LengthHint::exact(1);
        }
        let sep = self.format.is_extended() as usize;
        let seconds = if self.total_seconds.unsigned_abs() % 60 != 0 {
            2 + sep
        } else {
            0
        };
        LengthHint::exact(5 + sep + seconds)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableDateTime {
    pub date: FormattableDate,
    pub time: FormattableTime,
}

impl Writeable for FormattableDateTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.date.write_to(sink)?;
        sink.write_char('T')?;
        self.time.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.date.writeable_length_hint() + self.time.writeable_length_hint() + 1
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableOffsetDateTime {
    pub datetime: FormattableDateTime,
    pub offset: FormattableUtcOffset,
}

impl Writeable for FormattableOffsetDateTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.datetime.write_to(sink)?;
        self.offset.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.datetime.writeable_length_hint() + self.offset.writeable_length_hint()
    }
}

/// An offset date-time with an optional bracketed region suffix.
#[derive(Debug, Clone, Copy)]
pub struct FormattableZoned<'a> {
    pub datetime: FormattableDateTime,
    pub offset: FormattableUtcOffset,
    pub region: Option<&'a str>,
}

impl Writeable for FormattableZoned<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.datetime.write_to(sink)?;
        self.offset.write_to(sink)?;
        if let Some(region) = self.region {
            sink.write_char('[')?;
            sink.write_str(region)?;
            sink.write_char(']')?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let region = self.region.map_or(0, |region| region.len() + 2);
        self.datetime.writeable_length_hint()
            + self.offset.writeable_length_hint()
            + region
    }
}

/// Years, months, and days, each written with its own sign; zero
/// renders as `P0D`.
#[derive(Debug, Clone, Copy)]
pub struct FormattablePeriod {
    pub years: i64,
    pub months: i64,
    pub days: i64,
}

impl Writeable for FormattablePeriod {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        if self.years == 0 && self.months == 0 && self.days == 0 {
            return sink.write_str("P0D");
        }
        sink.write_char('P')?;
        if self.years != 0 {
            self.years.write_to(sink)?;
            sink.write_char('Y')?;
        }
        if self.months != 0 {
            self.months.write_to(sink)?;
            sink.write_char('M')?;
        }
        if self.days != 0 {
            self.days.write_to(sink)?;
            sink.write_char('D')?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        if self.years == 0 && self.months == 0 && self.days == 0 {
            return LengthHint::exact(3);
        }
        LengthHint::between(3, 64)
    }
}

/// A clock-time duration decomposed into hours, minutes, and seconds,
/// each component carrying the total's sign; zero renders as `PT0S`.
#[derive(Debug, Clone, Copy)]
pub struct FormattableDuration {
    pub seconds: i64,
    pub nanoseconds: i32,
}

impl Writeable for FormattableDuration {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        if self.seconds == 0 && self.nanoseconds == 0 {
            return sink.write_str("PT0S");
        }
        sink.write_str("PT")?;
        let hours = self.seconds / 3600;
        let minutes = self.seconds % 3600 / 60;
        let seconds = self.seconds % 60;
        if hours != 0 {
            hours.write_to(sink)?;
            sink.write_char('H')?;
        }
        if minutes != 0 {
            minutes.write_to(sink)?;
            sink.write_char('M')?;
        }
        if seconds != 0 || self.nanoseconds != 0 {
            if seconds == 0 && self.nanoseconds < 0 {
                sink.write_char('-')?;
            }
            seconds.write_to(sink)?;
            if self.nanoseconds != 0 {
                sink.write_char('.')?;
                let (digits, precision) = u32_to_digits(self.nanoseconds.unsigned_abs());
                write_digit_slice_to_precision(digits, 0, precision, sink)?;
            }
            sink.write_char('S')?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        if self.seconds == 0 && self.nanoseconds == 0 {
            return LengthHint::exact(4);
        }
        LengthHint::between(4, 44)
    }
}

impl_display_with_writeable!(FormattableDate);
impl_display_with_writeable!(FormattableOrdinalDate);
impl_display_with_writeable!(FormattableYearMonth);
impl_display_with_writeable!(FormattableTime);
impl_display_with_writeable!(FormattableUtcOffset);
impl_display_with_writeable!(FormattableDateTime);
impl_display_with_writeable!(FormattableOffsetDateTime);
impl_display_with_writeable!(FormattableZoned<'_>);
impl_display_with_writeable!(FormattablePeriod);
impl_display_with_writeable!(FormattableDuration);

fn write_padded_u8<W: fmt::Write + ?Sized>(num: u8, sink: &mut W) -> fmt::Result {
    if num < 10 {
        sink.write_char('0')?;
    }
    num.write_to(sink)
}

/// Writes the fraction to its configured digit count, or to the
/// smallest of millisecond, microsecond, or nanosecond precision that
/// loses nothing.
fn write_time_fraction<W: fmt::Write + ?Sized>(
    nanoseconds: u32,
    precision: Precision,
    sink: &mut W,
) -> fmt::Result {
    let (digits, _) = u32_to_digits(nanoseconds);
    let precision = match precision {
        Precision::Digit(digit) if digit <= 9 => digit as usize,
        _ => fraction_group_length(nanoseconds),
    };
    write_digit_slice_to_precision(digits, 0, precision, sink)
}

fn fraction_group_length(nanoseconds: u32) -> usize {
    if nanoseconds % 1_000_000 == 0 {
        3
    } else if nanoseconds % 1_000 == 0 {
        6
    } else {
        9
    }
}

/// Decomposes a value into nine decimal digits, returning the count of
/// digits before the trailing zeros begin.
fn u32_to_digits(mut value: u32) -> ([u8; 9], usize) {
    let mut output = [0; 9];
    let mut precision = 0;
    let mut i = 9;
    while i != 0 {
        let digit = (value % 10) as u8;
        value /= 10;
        if precision == 0 && digit != 0 {
            precision = i;
        }
        output[i - 1] = digit;
        i -= 1;
    }
    (output, precision)
}

fn write_digit_slice_to_precision<W: fmt::Write + ?Sized>(
    digits: [u8; 9],
    base: usize,
    precision: usize,
    sink: &mut W,
) -> fmt::Result {
    for digit in digits.iter().take(precision).skip(base) {
        digit.write_to(sink)?;
    }
    Ok(())
}

fn year_length(year: i32) -> usize {
    if (0..=9999).contains(&year) {
        4
    } else {
        7
    }
}

fn write_year<W: fmt::Write + ?Sized>(year: i32, sink: &mut W) -> fmt::Result {
    if (0..=9999).contains(&year) {
        write_four_digit_year(year, sink)
    } else {
        write_extended_year(year, sink)
    }
}

fn write_four_digit_year<W: fmt::Write + ?Sized>(mut year: i32, sink: &mut W) -> fmt::Result {
    (year / 1_000).write_to(sink)?;
    year %= 1_000;
    (year / 100).write_to(sink)?;
    year %= 100;
    (year / 10).write_to(sink)?;
    year %= 10;
    year.write_to(sink)
}

fn write_extended_year<W: fmt::Write + ?Sized>(year: i32, sink: &mut W) -> fmt::Result {
    let sign = if year < 0 { '-' } else { '+' };
    sink.write_char(sign)?;
    let (digits, _) = u32_to_digits(year.unsigned_abs());
    write_digit_slice_to_precision(digits, 3, 9, sink)
}
