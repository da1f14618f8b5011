//! A backtracking combinator parser for ISO-8601-style text.
//!
//! A [`Parser`] is an immutable tree of nodes built with
//! [`ParserBuilder`]. Parsing walks the tree over the input with an
//! integer cursor: a non-negative cursor is the index of the next
//! unconsumed byte, while a negative cursor encodes failure as the
//! bitwise complement of the position where matching stopped. The
//! branching combinators snapshot the accumulated [`ParsedFields`] and
//! restore it when a branch fails, so no partial writes leak out of an
//! abandoned alternative.
//!
//! Two conditions are hard errors rather than backtrackable failures:
//! writing conflicting values into one field and overflowing `i64`
//! during digit accumulation. Both indicate a defective grammar or
//! hostile input and surface as a [`ParseError`] no matter how deeply
//! nested the node that hit them.

mod builder;
mod format;
mod grouped;
pub mod iso;


pub use builder::{GroupedParserBuilder, ParserBuilder};
pub use format::{
    FormattableDate, FormattableDateTime, FormattableDuration, FormattableOffsetDateTime,
    FormattableOrdinalDate, FormattablePeriod, FormattableTime, FormattableUtcOffset,
    FormattableYearMonth, FormattableZoned, IsoFormat, Precision,
};
pub use grouped::GroupedParser;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::error::CivilError;
use crate::fields::{Field, ParsedFields, ParsedValue};
use crate::options::{ParserSettings, SignStyle};

/// Digit counts above this cannot fit in an `i64`.
pub(crate) const MAX_I64_DIGITS: u8 = 19;

// FACTOR[i] is 10^(i - 1), so the digit with `i` digits remaining after
// it (itself included) scales by the right power of ten. Index 0 pads
// the table for fraction truncation.
const FACTOR: [i64; 20] = [
    0,
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
];

/// The outcome of a text node's per-character filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// Accept the character and keep reading.
    Accept,
    /// Stop before this character.
    Reject,
}

/// Per-character filter for text nodes. Receives the character and its
/// 0-based ordinal within the run.
pub type TextFilter = fn(ch: char, index: usize) -> TextMatch;

/// A constant field assignment attached to a literal node, used by
/// designators such as `Z` and `..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralAction {
    None,
    Assign(Field, i64),
}

#[derive(Debug, Clone)]
pub(crate) enum ParseNode {
    Empty,
    CharLiteral {
        ch: char,
        action: LiteralAction,
    },
    StringLiteral {
        text: alloc::boxed::Box<str>,
        action: LiteralAction,
    },
    Sign {
        field: Option<Field>,
    },
    WholeNumber {
        field: Option<Field>,
        min_digits: u8,
        max_digits: u8,
        sign_style: Option<SignStyle>,
    },
    DecimalNumber {
        whole_field: Option<Field>,
        fraction_field: Option<Field>,
        min_whole: u8,
        max_whole: u8,
        min_fraction: u8,
        max_fraction: u8,
        fraction_scale: u8,
        sign_style: Option<SignStyle>,
    },
    Text {
        field: Option<Field>,
        min_chars: usize,
        max_chars: usize,
        filter: TextFilter,
    },
    Sequence(Vec<ParseNode>),
    Optional(alloc::boxed::Box<ParseNode>),
    AnyOf(Vec<ParseNode>),
    Shared(Arc<ParseNode>),
}

impl ParseNode {
    /// Literal nodes are excluded from grouped output.
    pub(crate) fn is_literal(&self) -> bool {
        match self {
            Self::CharLiteral { .. } | Self::StringLiteral { .. } => true,
            Self::Shared(inner) => inner.is_literal(),
            _ => false,
        }
    }

    /// A const subtree can never write a field, which lets the
    /// branching combinators skip their snapshot.
    fn is_const(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::CharLiteral { action, .. } | Self::StringLiteral { action, .. } => {
                matches!(action, LiteralAction::None)
            }
            Self::Sign { field } => field.is_none(),
            Self::WholeNumber { field, .. } => field.is_none(),
            Self::DecimalNumber {
                whole_field,
                fraction_field,
                ..
            } => whole_field.is_none() && fraction_field.is_none(),
            Self::Text { field, .. } => field.is_none(),
            Self::Sequence(children) | Self::AnyOf(children) => {
                children.iter().all(Self::is_const)
            }
            Self::Optional(child) => child.is_const(),
            Self::Shared(inner) => inner.is_const(),
        }
    }

    fn parse(
        &self,
        ctx: &mut ParseContext<'_>,
        text: &str,
        position: isize,
    ) -> Result<isize, ParseError> {
        match self {
            Self::Empty => Ok(position),
            Self::CharLiteral { ch, action } => {
                let Some(found) = char_at(text, position) else {
                    return Ok(!position);
                };
                if !chars_match(found, *ch, ctx.case_sensitive()) {
                    return Ok(!position);
                }
                apply_literal_action(ctx, text, position, *action)?;
                Ok(position + found.len_utf8() as isize)
            }
            Self::StringLiteral { text: literal, action } => {
                let mut current = position;
                for expected in literal.chars() {
                    let Some(found) = char_at(text, current) else {
                        return Ok(!position);
                    };
                    if !chars_match(found, expected, ctx.case_sensitive()) {
                        return Ok(!position);
                    }
                    current += found.len_utf8() as isize;
                }
                apply_literal_action(ctx, text, position, *action)?;
                Ok(current)
            }
            Self::Sign { field } => {
                let Some(found) = char_at(text, position) else {
                    return Ok(!position);
                };
                let style = &ctx.settings.number_style;
                let parsed = if style.is_plus_sign(found) {
                    1i64
                } else if style.is_minus_sign(found) {
                    -1i64
                } else {
                    return Ok(!position);
                };
                if let Some(field) = field {
                    ctx.store(text, position, *field, parsed)?;
                }
                Ok(position + found.len_utf8() as isize)
            }
            Self::WholeNumber {
                field,
                min_digits,
                max_digits,
                sign_style,
            } => {
                let settings = ctx.settings;
                let mut current = position;
                if char_at(text, current).is_none() {
                    return Ok(!current);
                }

                let (sign, consumed) = parse_sign(settings, text, current, *sign_style);
                if sign == SignParse::Invalid {
                    return Ok(!current);
                }
                current += consumed;

                let value;
                if min_digits == max_digits {
                    // Fixed length: take exactly N digits as they come,
                    // leaving anything after them for the next node.
                    let mut acc = 0i64;
                    for exponent in (1..=*min_digits).rev() {
                        let Some(found) = char_at(text, current) else {
                            return Ok(!current);
                        };
                        let Some(digit) = settings.number_style.digit_value(found) else {
                            return Ok(!current);
                        };
                        acc = add_scaled_digit(acc, digit, exponent, text, position)?;
                        current += found.len_utf8() as isize;
                    }
                    value = acc;
                } else {
                    let (count, run_bytes) = digit_run(settings, text, current);
                    if count < *min_digits as usize {
                        return Ok(!(current + run_bytes));
                    }
                    if count > *max_digits as usize {
                        let consumed =
                            digit_run_bytes(text, current, *max_digits as usize);
                        return Ok(!(current + consumed));
                    }
                    let (acc, end) =
                        accumulate_digits(settings, text, position, current, count)?;
                    value = acc;
                    current = end;
                }

                let value = apply_parsed_sign(value, sign, text, position)?;
                if let Some(field) = field {
                    ctx.store(text, position, *field, value)?;
                }
                Ok(current)
            }
            Self::DecimalNumber {
                whole_field,
                fraction_field,
                min_whole,
                max_whole,
                min_fraction,
                max_fraction,
                fraction_scale,
                sign_style,
            } => {
                let settings = ctx.settings;
                let mut current = position;
                if char_at(text, current).is_none() {
                    return Ok(!current);
                }

                let (sign, consumed) = parse_sign(settings, text, current, *sign_style);
                if sign == SignParse::Invalid {
                    return Ok(!current);
                }
                current += consumed;

                let (whole_count, whole_bytes) = digit_run(settings, text, current);
                if whole_count < *min_whole as usize {
                    return Ok(!(current + whole_bytes));
                }
                if whole_count > *max_whole as usize {
                    let consumed = digit_run_bytes(text, current, *max_whole as usize);
                    return Ok(!(current + consumed));
                }
                let (whole, end) =
                    accumulate_digits(settings, text, position, current, whole_count)?;
                current = end;
                let whole = apply_parsed_sign(whole, sign, text, position)?;

                let separator = char_at(text, current)
                    .filter(|found| {
                        *max_fraction > 0 && settings.number_style.is_decimal_separator(*found)
                    });
                if let Some(separator) = separator {
                    current += separator.len_utf8() as isize;
                    if char_at(text, current).is_none() {
                        return Ok(!current);
                    }

                    let (fraction_count, fraction_bytes) = digit_run(settings, text, current);
                    if fraction_count < *min_fraction as usize {
                        return Ok(!(current + fraction_bytes));
                    }
                    if fraction_count > *max_fraction as usize {
                        let consumed =
                            digit_run_bytes(text, current, *max_fraction as usize);
                        return Ok(!(current + consumed));
                    }
                    if fraction_count == 0 && whole_count == 0 {
                        return Ok(!current);
                    }

                    let (fraction, end) = accumulate_fraction(
                        settings,
                        text,
                        current,
                        fraction_count,
                        *fraction_scale,
                    );
                    current = end;
                    let fraction = if sign == SignParse::Negative {
                        -fraction
                    } else {
                        fraction
                    };

                    if let Some(field) = whole_field {
                        ctx.store(text, position, *field, whole)?;
                    }
                    if let Some(field) = fraction_field {
                        ctx.store(text, position, *field, fraction)?;
                    }
                    return Ok(current);
                }

                if *min_fraction > 0 || whole_count == 0 {
                    return Ok(!current);
                }
                if let Some(field) = whole_field {
                    ctx.store(text, position, *field, whole)?;
                }
                if let Some(field) = fraction_field {
                    ctx.store(text, position, *field, 0i64)?;
                }
                Ok(current)
            }
            Self::Text {
                field,
                min_chars,
                max_chars,
                filter,
            } => {
                if char_at(text, position).is_none() {
                    return Ok(!position);
                }
                let mut current = position;
                let mut consumed = 0usize;
                while consumed <= *max_chars {
                    let Some(found) = char_at(text, current) else {
                        break;
                    };
                    if filter(found, consumed) == TextMatch::Reject {
                        break;
                    }
                    consumed += 1;
                    current += found.len_utf8() as isize;
                }
                if consumed < *min_chars || consumed > *max_chars {
                    return Ok(!position);
                }
                if let Some(field) = field {
                    let run = text
                        .get(position as usize..current as usize)
                        .unwrap_or_default();
                    ctx.store(text, position, *field, String::from(run))?;
                }
                Ok(current)
            }
            Self::Sequence(children) => {
                let mut current = position;
                for child in children {
                    current = child.parse(ctx, text, current)?;
                    if current < 0 {
                        break;
                    }
                }
                Ok(current)
            }
            Self::Optional(child) => {
                if position >= text.len() as isize {
                    return Ok(position);
                }
                let snapshot = if child.is_const() {
                    None
                } else {
                    Some(ctx.fields.clone())
                };
                let current = child.parse(ctx, text, position)?;
                if current < 0 {
                    if let Some(snapshot) = snapshot {
                        ctx.fields = snapshot;
                    }
                    return Ok(position);
                }
                Ok(current)
            }
            Self::AnyOf(children) => {
                let restore_needed = !self.is_const();
                for child in children {
                    let snapshot = if restore_needed {
                        Some(ctx.fields.clone())
                    } else {
                        None
                    };
                    let current = child.parse(ctx, text, position)?;
                    if current < 0 {
                        if let Some(snapshot) = snapshot {
                            ctx.fields = snapshot;
                        }
                    } else {
                        return Ok(current);
                    }
                }
                Ok(!position)
            }
            Self::Shared(inner) => inner.parse(ctx, text, position),
        }
    }
}

pub(crate) struct ParseContext<'a> {
    settings: &'a ParserSettings,
    fields: ParsedFields,
}

impl<'a> ParseContext<'a> {
    fn new(settings: &'a ParserSettings) -> Self {
        Self {
            settings,
            fields: ParsedFields::new(),
        }
    }

    fn case_sensitive(&self) -> bool {
        self.settings.case_sensitive
    }

    fn store(
        &mut self,
        text: &str,
        position: isize,
        field: Field,
        value: impl Into<ParsedValue>,
    ) -> Result<(), ParseError> {
        self.fields
            .insert(field, value)
            .map_err(|conflict| ParseError {
                input: String::from(text),
                index: position.max(0) as usize,
                kind: ParseErrorKind::FieldConflict {
                    field: conflict.field,
                },
            })
    }
}

fn apply_literal_action(
    ctx: &mut ParseContext<'_>,
    text: &str,
    position: isize,
    action: LiteralAction,
) -> Result<(), ParseError> {
    match action {
        LiteralAction::None => Ok(()),
        LiteralAction::Assign(field, value) => ctx.store(text, position, field, value),
    }
}

fn char_at(text: &str, position: isize) -> Option<char> {
    if position < 0 {
        return None;
    }
    text.get(position as usize..)?.chars().next()
}

fn chars_match(found: char, expected: char, case_sensitive: bool) -> bool {
    found == expected
        || (!case_sensitive && found.to_ascii_lowercase() == expected.to_ascii_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignParse {
    Positive,
    Negative,
    Absent,
    Invalid,
}

fn parse_sign(
    settings: &ParserSettings,
    text: &str,
    position: isize,
    sign_style: Option<SignStyle>,
) -> (SignParse, isize) {
    let Some(found) = char_at(text, position) else {
        return (SignParse::Absent, 0);
    };
    let style = &settings.number_style;
    if style.is_plus_sign(found) {
        match sign_style {
            Some(SignStyle::Never | SignStyle::NegativeOnly) => (SignParse::Invalid, 0),
            _ => (SignParse::Positive, found.len_utf8() as isize),
        }
    } else if style.is_minus_sign(found) {
        match sign_style {
            Some(SignStyle::Never) => (SignParse::Invalid, 0),
            _ => (SignParse::Negative, found.len_utf8() as isize),
        }
    } else {
        match sign_style {
            Some(SignStyle::Always) => (SignParse::Invalid, 0),
            _ => (SignParse::Absent, 0),
        }
    }
}

/// Counts the digits starting at `from`, returning the count and the
/// byte length of the run.
fn digit_run(settings: &ParserSettings, text: &str, from: isize) -> (usize, isize) {
    let mut chars = 0usize;
    let mut bytes = 0isize;
    if from >= 0 {
        if let Some(rest) = text.get(from as usize..) {
            for found in rest.chars() {
                if settings.number_style.digit_value(found).is_none() {
                    break;
                }
                chars += 1;
                bytes += found.len_utf8() as isize;
            }
        }
    }
    (chars, bytes)
}

/// Byte length of the first `count` characters starting at `from`.
fn digit_run_bytes(text: &str, from: isize, count: usize) -> isize {
    if from < 0 {
        return 0;
    }
    text.get(from as usize..).map_or(0, |rest| {
        rest.chars()
            .take(count)
            .map(|found| found.len_utf8() as isize)
            .sum()
    })
}

fn add_scaled_digit(
    value: i64,
    digit: i64,
    exponent: u8,
    text: &str,
    start: isize,
) -> Result<i64, ParseError> {
    digit
        .checked_mul(FACTOR[exponent as usize])
        .and_then(|scaled| value.checked_add(scaled))
        .ok_or_else(|| ParseError {
            input: String::from(text),
            index: start.max(0) as usize,
            kind: ParseErrorKind::NumberOverflow,
        })
}

fn apply_parsed_sign(
    value: i64,
    sign: SignParse,
    text: &str,
    start: isize,
) -> Result<i64, ParseError> {
    if sign != SignParse::Negative {
        return Ok(value);
    }
    value.checked_neg().ok_or_else(|| ParseError {
        input: String::from(text),
        index: start.max(0) as usize,
        kind: ParseErrorKind::NumberOverflow,
    })
}

/// Accumulates `count` pre-scanned digits into an `i64`, scaling each
/// by its power of ten.
fn accumulate_digits(
    settings: &ParserSettings,
    text: &str,
    start: isize,
    from: isize,
    count: usize,
) -> Result<(i64, isize), ParseError> {
    let mut value = 0i64;
    let mut current = from;
    let mut exponent = count;
    let rest = text.get(from as usize..).unwrap_or_default();
    for found in rest.chars().take(count) {
        let Some(digit) = settings.number_style.digit_value(found) else {
            break;
        };
        value = add_scaled_digit(value, digit, exponent as u8, text, start)?;
        exponent -= 1;
        current += found.len_utf8() as isize;
    }
    Ok((value, current))
}

/// Accumulates a fraction run scaled to `scale` digits; digits beyond
/// the scale are consumed but contribute nothing.
fn accumulate_fraction(
    settings: &ParserSettings,
    text: &str,
    from: isize,
    count: usize,
    scale: u8,
) -> (i64, isize) {
    let mut value = 0i64;
    let mut current = from;
    let rest = text.get(from as usize..).unwrap_or_default();
    for (index, found) in rest.chars().take(count).enumerate() {
        let Some(digit) = settings.number_style.digit_value(found) else {
            break;
        };
        let exponent = scale as i32 - index as i32;
        if exponent > 0 {
            value += digit * FACTOR[exponent as usize];
        }
        current += found.len_utf8() as isize;
    }
    (value, current)
}

/// The error kind of a failed parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The grammar did not match.
    NoMatch,
    /// The grammar matched but input remained.
    UnexpectedCharacter,
    /// Two different values were written into one field.
    FieldConflict {
        field: Field,
    },
    /// A digit run exceeded the representable range.
    NumberOverflow,
}

/// The error produced when text cannot be parsed against a grammar.
///
/// Carries the original input and the 0-based byte index at which the
/// failure was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    input: String,
    index: usize,
    kind: ParseErrorKind,
}

impl ParseError {
    /// The input that failed to parse.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The byte index at which the failure was detected.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseErrorKind::NoMatch => {
                write!(f, "parsing failed at index {} of {:?}", self.index, self.input)
            }
            ParseErrorKind::UnexpectedCharacter => write!(
                f,
                "unexpected character at index {} of {:?}",
                self.index, self.input
            ),
            ParseErrorKind::FieldConflict { field } => write!(
                f,
                "conflicting values for {} while parsing {:?}",
                field, self.input
            ),
            ParseErrorKind::NumberOverflow => write!(
                f,
                "number starting at index {} of {:?} exceeds the representable range",
                self.index, self.input
            ),
        }
    }
}

impl core::error::Error for ParseError {}

impl From<ParseError> for CivilError {
    fn from(err: ParseError) -> Self {
        CivilError::syntax().with_message(alloc::format!("{err}"))
    }
}

/// An immutable, reusable grammar.
///
/// Parsers are cheap to clone and safe to share across threads; each
/// parse call owns all of its mutable state.
///
/// ```rust
/// use civil_time::fields::Field;
/// use civil_time::options::SignStyle;
/// use civil_time::parsers::Parser;
///
/// let parser = Parser::build(|b| {
///     b.whole_number(Field::Year, 4..=4, Some(SignStyle::Never))
///         .literal('-')
///         .whole_number(Field::MonthOfYear, 2..=2, Some(SignStyle::Never))
/// });
///
/// let fields = parser.parse("2008-09").unwrap();
/// assert_eq!(fields.get_integer(Field::Year), Some(2008));
/// assert_eq!(fields.get_integer(Field::MonthOfYear), Some(9));
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    root: Arc<ParseNode>,
}

impl Parser {
    pub(crate) fn from_node(node: ParseNode) -> Self {
        Self {
            root: Arc::new(node),
        }
    }

    pub(crate) fn root(&self) -> Arc<ParseNode> {
        self.root.clone()
    }

    /// Builds a parser in one expression.
    pub fn build(f: impl FnOnce(ParserBuilder) -> ParserBuilder) -> Self {
        f(ParserBuilder::new()).build()
    }

    /// Whether this grammar is a bare literal. Grouped parsing excludes
    /// literal parsers from its output.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.root.is_literal()
    }

    /// Parses `text` with the default settings, requiring the grammar
    /// to consume all of it.
    pub fn parse(&self, text: &str) -> Result<ParsedFields, ParseError> {
        self.parse_with(text, &ParserSettings::DEFAULT)
    }

    /// Parses `text`, requiring the grammar to consume all of it.
    pub fn parse_with(
        &self,
        text: &str,
        settings: &ParserSettings,
    ) -> Result<ParsedFields, ParseError> {
        let mut ctx = ParseContext::new(settings);
        let end = self.root.parse(&mut ctx, text, 0)?;
        if end < 0 {
            return Err(ParseError {
                input: String::from(text),
                index: (!end) as usize,
                kind: ParseErrorKind::NoMatch,
            });
        }
        if (end as usize) < text.len() {
            return Err(ParseError {
                input: String::from(text),
                index: end as usize,
                kind: ParseErrorKind::UnexpectedCharacter,
            });
        }
        Ok(ctx.fields)
    }

    /// Runs this grammar from `position` with a fresh field map,
    /// without the trailing-input check. Used by grouped parsing.
    pub(crate) fn parse_fragment(
        &self,
        settings: &ParserSettings,
        text: &str,
        position: isize,
    ) -> Result<(isize, ParsedFields), ParseError> {
        let mut ctx = ParseContext::new(settings);
        let end = self.root.parse(&mut ctx, text, position)?;
        Ok((end, ctx.fields))
    }
}
