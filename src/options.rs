//! Options controlling how text is matched against a grammar.
//!
//! Parsing behavior that is not part of a grammar itself lives here: the
//! characters recognized as digits, signs, and separators, together with
//! the per-node sign policy.

use alloc::borrow::Cow;
use core::{fmt, str::FromStr};

/// The sign policy of a numeric parser node.
///
/// A node with no explicit style accepts a plus sign, a minus sign, or no
/// sign at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignStyle {
    /// A minus sign is accepted, a plus sign is rejected.
    NegativeOnly,
    /// Any sign is rejected.
    Never,
    /// A sign is required.
    Always,
}

/// A parsing error for [`SignStyle`].
#[derive(Debug, Clone, Copy)]
pub struct ParseSignStyleError;

impl fmt::Display for ParseSignStyleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("provided string was not a valid sign style value")
    }
}

impl FromStr for SignStyle {
    type Err = ParseSignStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "negative-only" => Ok(Self::NegativeOnly),
            "never" => Ok(Self::Never),
            "always" => Ok(Self::Always),
            _ => Err(ParseSignStyleError),
        }
    }
}

impl fmt::Display for SignStyle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NegativeOnly => "negative-only",
            Self::Never => "never",
            Self::Always => "always",
        }
        .fmt(f)
    }
}

/// The characters numeric nodes recognize as digits, signs, and decimal
/// separators.
///
/// Digits are interpreted relative to [`zero_digit`][Self::zero_digit]:
/// a character `c` is the digit `c - zero_digit` when that difference is
/// within `0..=9`. The first listed sign and separator characters are the
/// canonical ones used when formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberStyle {
    pub zero_digit: char,
    pub plus_sign: Cow<'static, [char]>,
    pub minus_sign: Cow<'static, [char]>,
    pub decimal_separator: Cow<'static, [char]>,
}

impl NumberStyle {
    /// ASCII digits, `+`, `-` or U+2212 (minus sign), and `.` or `,`.
    pub const DEFAULT: Self = Self {
        zero_digit: '0',
        plus_sign: Cow::Borrowed(&['+']),
        minus_sign: Cow::Borrowed(&['-', '\u{2212}']),
        decimal_separator: Cow::Borrowed(&['.', ',']),
    };

    /// Maps `ch` to its digit value under this style, if it is a digit.
    #[inline]
    #[must_use]
    pub fn digit_value(&self, ch: char) -> Option<i64> {
        let delta = (ch as i64) - (self.zero_digit as i64);
        (0..=9).contains(&delta).then_some(delta)
    }

    #[inline]
    #[must_use]
    pub fn is_plus_sign(&self, ch: char) -> bool {
        self.plus_sign.contains(&ch)
    }

    #[inline]
    #[must_use]
    pub fn is_minus_sign(&self, ch: char) -> bool {
        self.minus_sign.contains(&ch)
    }

    #[inline]
    #[must_use]
    pub fn is_decimal_separator(&self, ch: char) -> bool {
        self.decimal_separator.contains(&ch)
    }
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings applied over a whole parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    pub number_style: NumberStyle,
    /// Whether literal characters match case-sensitively. Defaults to
    /// `true`.
    pub case_sensitive: bool,
}

impl ParserSettings {
    pub const DEFAULT: Self = Self {
        number_style: NumberStyle::DEFAULT,
        case_sensitive: true,
    };
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::{NumberStyle, SignStyle};
    use alloc::string::ToString;
    use core::str::FromStr;

    #[test]
    fn sign_style_round_trips_through_strings() {
        for style in [SignStyle::NegativeOnly, SignStyle::Never, SignStyle::Always] {
            assert_eq!(SignStyle::from_str(&style.to_string()).unwrap(), style);
        }
        assert!(SignStyle::from_str("sometimes").is_err());
    }

    #[test]
    fn default_number_style_classifies_characters() {
        let style = NumberStyle::DEFAULT;
        assert_eq!(style.digit_value('0'), Some(0));
        assert_eq!(style.digit_value('9'), Some(9));
        assert_eq!(style.digit_value('a'), None);
        assert!(style.is_minus_sign('-'));
        assert!(style.is_minus_sign('\u{2212}'));
        assert!(!style.is_minus_sign('+'));
        assert!(style.is_plus_sign('+'));
        assert!(style.is_decimal_separator('.'));
        assert!(style.is_decimal_separator(','));
    }
}
