//! This module implements [`CivilError`].

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

/// `ErrorKind` distinguishes the broad classes of failure that the
/// library reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A general error, the catch-all kind.
    #[default]
    Generic,
    /// A value was outside its valid range.
    Range,
    /// Text could not be parsed against a grammar.
    Syntax,
    /// An internal invariant did not hold.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => "generic",
            Self::Range => "range",
            Self::Syntax => "syntax",
            Self::Assert => "implementation error",
        }
        .fmt(f)
    }
}

/// The error type of `civil_time`.
///
/// Errors are built from a kind constructor and an optional message:
///
/// ```rust
/// use civil_time::CivilError;
///
/// let err = CivilError::range().with_message("month must be within 1..=12");
/// assert_eq!(err.to_string(), "range: month must be within 1..=12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CivilError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl fmt::Display for CivilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)?;
        if !self.msg.is_empty() {
            write!(f, ": {}", self.msg)?;
        }
        Ok(())
    }
}

impl core::error::Error for CivilError {}

impl CivilError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Create a generic error with a message.
    #[inline]
    #[must_use]
    pub fn general<S>(msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        Self::new(ErrorKind::Generic).with_message(msg)
    }

    /// Create a range error.
    #[inline]
    #[must_use]
    pub const fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Create a syntax error.
    #[inline]
    #[must_use]
    pub const fn syntax() -> Self {
        Self::new(ErrorKind::Syntax)
    }

    /// Create an assertion error for an internal invariant violation.
    #[inline]
    #[must_use]
    pub const fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }

    /// Attach a message to this error, replacing any previous one.
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns this error's message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Consumes the error, returning an owned message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> String {
        self.msg.into_owned()
    }
}
