//! Grouped parsing: one field map per result group.

use alloc::string::String;
use alloc::vec::Vec;

use crate::fields::ParsedFields;
use crate::options::ParserSettings;

use super::{GroupedParserBuilder, ParseError, ParseErrorKind, Parser};

#[derive(Debug, Clone)]
pub(crate) enum GroupItem {
    Plain(Parser),
    Nested(GroupedParser),
}

/// A parser that collects its output into one field map per group,
/// letting the same field appear once per group. Interval text uses
/// this to parse two date-times out of one string.
///
/// Literal children consume input without producing a group. In
/// alternation mode the children are alternatives instead: the first
/// to succeed contributes all of its groups.
///
/// ```rust
/// use civil_time::fields::Field;
/// use civil_time::options::SignStyle;
/// use civil_time::parsers::GroupedParser;
///
/// let parser = GroupedParser::build(|b| {
///     b.group(|g| g.year(4..=4, Some(SignStyle::Never)))
///         .literal('/')
///         .group(|g| g.year(4..=4, Some(SignStyle::Never)))
/// });
///
/// let groups = parser.parse("2008/2009").unwrap();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].get_integer(Field::Year), Some(2008));
/// assert_eq!(groups[1].get_integer(Field::Year), Some(2009));
/// ```
#[derive(Debug, Clone)]
pub struct GroupedParser {
    children: Vec<GroupItem>,
    is_any_of: bool,
}

impl GroupedParser {
    pub(crate) fn from_items(children: Vec<GroupItem>, is_any_of: bool) -> Self {
        Self {
            children,
            is_any_of,
        }
    }

    /// Builds a grouped parser in one expression.
    pub fn build(f: impl FnOnce(GroupedParserBuilder) -> GroupedParserBuilder) -> Self {
        f(GroupedParserBuilder::new()).build()
    }

    /// Parses `text` with the default settings, requiring the grammar
    /// to consume all of it.
    pub fn parse(&self, text: &str) -> Result<Vec<ParsedFields>, ParseError> {
        self.parse_with(text, &ParserSettings::DEFAULT)
    }

    /// Parses `text`, requiring the grammar to consume all of it.
    pub fn parse_with(
        &self,
        text: &str,
        settings: &ParserSettings,
    ) -> Result<Vec<ParsedFields>, ParseError> {
        let (end, results) = self.parse_at(settings, text, 0)?;
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
        Ok(results)
    }

    fn parse_at(
        &self,
        settings: &ParserSettings,
        text: &str,
        position: isize,
    ) -> Result<(isize, Vec<ParsedFields>), ParseError> {
        let mut current = position;
        let mut results = Vec::new();

        for child in &self.children {
            let end = match child {
                GroupItem::Plain(parser) => {
                    let (end, fields) = parser.parse_fragment(settings, text, current)?;
                    if end >= 0 && !parser.is_literal() {
                        results.push(fields);
                    }
                    end
                }
                GroupItem::Nested(nested) => {
                    let (end, sub_results) = nested.parse_at(settings, text, current)?;
                    if end >= 0 {
                        results.extend(sub_results);
                    }
                    end
                }
            };

            // Alternatives retry from the original position; a
            // sequence propagates the failure.
            if !self.is_any_of || end >= 0 {
                current = end;
            }
            let done = if self.is_any_of { end >= 0 } else { end < 0 };
            if done {
                break;
            }
        }

        Ok((current, results))
    }
}
