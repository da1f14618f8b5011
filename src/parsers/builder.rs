//! Builder DSL for assembling [`Parser`] and [`GroupedParser`] trees.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

use crate::fields::Field;
use crate::options::SignStyle;

use super::grouped::{GroupItem, GroupedParser};
use super::{LiteralAction, ParseNode, Parser, TextFilter, TextMatch, MAX_I64_DIGITS};

/// Chainable builder for [`Parser`] trees.
///
/// Methods append nodes in order and [`build`](Self::build) collapses
/// the list: no nodes parse as the empty grammar, a single node stands
/// alone, and two or more become a sequence.
///
/// Length arguments are validated up front and panic on misuse; a
/// grammar with inverted or unrepresentable bounds is a defect in the
/// caller, not a runtime condition.
#[derive(Debug, Default)]
pub struct ParserBuilder {
    nodes: Vec<ParseNode>,
}

impl ParserBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Matches a single character exactly.
    #[must_use]
    pub fn literal(mut self, ch: char) -> Self {
        self.nodes.push(ParseNode::CharLiteral {
            ch,
            action: LiteralAction::None,
        });
        self
    }

    /// Matches a string exactly.
    #[must_use]
    pub fn literal_str(mut self, text: &str) -> Self {
        self.nodes.push(ParseNode::StringLiteral {
            text: Box::from(text),
            action: LiteralAction::None,
        });
        self
    }

    fn literal_assigning(mut self, ch: char, field: Field, value: i64) -> Self {
        self.nodes.push(ParseNode::CharLiteral {
            ch,
            action: LiteralAction::Assign(field, value),
        });
        self
    }

    fn literal_str_assigning(mut self, text: &str, field: Field, value: i64) -> Self {
        self.nodes.push(ParseNode::StringLiteral {
            text: Box::from(text),
            action: LiteralAction::Assign(field, value),
        });
        self
    }

    /// Matches one plus or minus character from the number style,
    /// storing `1` or `-1` into `field`.
    #[must_use]
    pub fn sign(mut self, field: Field) -> Self {
        self.nodes.push(ParseNode::Sign { field: Some(field) });
        self
    }

    /// Matches a whole number with the given digit count, storing the
    /// value into `field`. The count is fixed when the range has one
    /// element and greedy up to the maximum otherwise.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or outside `1..=19`.
    #[must_use]
    pub fn whole_number(
        mut self,
        field: Field,
        digits: RangeInclusive<u8>,
        sign_style: Option<SignStyle>,
    ) -> Self {
        let (min, max) = (*digits.start(), *digits.end());
        assert!(min <= max, "digit range must not be inverted");
        assert!(
            min >= 1 && max <= MAX_I64_DIGITS,
            "digit counts must be within 1..=19"
        );
        self.nodes.push(ParseNode::WholeNumber {
            field: Some(field),
            min_digits: min,
            max_digits: max,
            sign_style,
        });
        self
    }

    /// Matches a whole number followed by an optional decimal
    /// separator and fraction. The fraction is normalized to
    /// `fraction_scale` digits and stored into `fraction_field`; a
    /// missing fraction stores zero.
    ///
    /// # Panics
    ///
    /// Panics if a range is inverted, the whole digit count is outside
    /// `1..=19`, the fraction digit count is outside `0..=9`, or the
    /// scale is outside `1..=9`.
    #[must_use]
    pub fn decimal_number(
        mut self,
        whole_field: Field,
        fraction_field: Field,
        whole_digits: RangeInclusive<u8>,
        fraction_digits: RangeInclusive<u8>,
        fraction_scale: u8,
        sign_style: Option<SignStyle>,
    ) -> Self {
        let (min_whole, max_whole) = (*whole_digits.start(), *whole_digits.end());
        let (min_fraction, max_fraction) = (*fraction_digits.start(), *fraction_digits.end());
        assert!(min_whole <= max_whole, "whole digit range must not be inverted");
        assert!(
            max_whole >= 1 && max_whole <= MAX_I64_DIGITS,
            "whole digit counts must be within 1..=19"
        );
        assert!(
            min_fraction <= max_fraction,
            "fraction digit range must not be inverted"
        );
        assert!(max_fraction <= 9, "fraction digit counts must be within 0..=9");
        assert!(
            (1..=9).contains(&fraction_scale),
            "fraction scale must be within 1..=9"
        );
        self.nodes.push(ParseNode::DecimalNumber {
            whole_field: Some(whole_field),
            fraction_field: Some(fraction_field),
            min_whole,
            max_whole,
            min_fraction,
            max_fraction,
            fraction_scale,
            sign_style,
        });
        self
    }

    /// Matches a run of characters accepted by `filter`, storing the
    /// run into `field`.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted.
    #[must_use]
    pub fn text(mut self, field: Field, chars: RangeInclusive<usize>, filter: TextFilter) -> Self {
        let (min, max) = (*chars.start(), *chars.end());
        assert!(min <= max, "character range must not be inverted");
        self.nodes.push(ParseNode::Text {
            field: Some(field),
            min_chars: min,
            max_chars: max,
            filter,
        });
        self
    }

    /// Makes the nodes appended by `f` optional as a unit. An empty
    /// child is elided entirely.
    #[must_use]
    pub fn optional(mut self, f: impl FnOnce(ParserBuilder) -> ParserBuilder) -> Self {
        let child = f(ParserBuilder::new());
        if !child.nodes.is_empty() {
            self.nodes
                .push(ParseNode::Optional(Box::new(collapse(child.nodes))));
        }
        self
    }

    /// Tries `alternatives` in order, committing to the first that
    /// succeeds.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two alternatives are supplied.
    #[must_use]
    pub fn any_of<I>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = Parser>,
    {
        let children: Vec<ParseNode> = alternatives
            .into_iter()
            .map(|parser| ParseNode::Shared(parser.root()))
            .collect();
        assert!(children.len() >= 2, "any_of requires at least two alternatives");
        self.nodes.push(ParseNode::AnyOf(children));
        self
    }

    /// Embeds an existing parser as a subtree.
    #[must_use]
    pub fn parser(mut self, parser: &Parser) -> Self {
        self.nodes.push(ParseNode::Shared(parser.root()));
        self
    }

    #[must_use]
    pub fn build(self) -> Parser {
        Parser::from_node(collapse(self.nodes))
    }
}

fn collapse(mut nodes: Vec<ParseNode>) -> ParseNode {
    match nodes.len() {
        0 => ParseNode::Empty,
        1 => nodes.remove(0),
        _ => ParseNode::Sequence(nodes),
    }
}

/// Field vocabulary shared by the ISO grammars and custom grammars.
impl ParserBuilder {
    #[must_use]
    pub fn year(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::Year, digits, sign_style)
    }

    #[must_use]
    pub fn month_of_year(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::MonthOfYear, digits, sign_style)
    }

    #[must_use]
    pub fn day_of_year(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::DayOfYear, digits, sign_style)
    }

    #[must_use]
    pub fn day_of_month(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::DayOfMonth, digits, sign_style)
    }

    #[must_use]
    pub fn hour_of_day(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::HourOfDay, digits, sign_style)
    }

    #[must_use]
    pub fn minute_of_hour(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::MinuteOfHour, digits, sign_style)
    }

    #[must_use]
    pub fn second_of_minute(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::SecondOfMinute, digits, sign_style)
    }

    /// Seconds with an optional fraction, stored as whole seconds plus
    /// nanoseconds.
    #[must_use]
    pub fn fractional_second_of_minute(
        self,
        whole_digits: RangeInclusive<u8>,
        sign_style: Option<SignStyle>,
    ) -> Self {
        self.decimal_number(
            Field::SecondOfMinute,
            Field::NanosecondOfSecond,
            whole_digits,
            0..=9,
            9,
            sign_style,
        )
    }

    #[must_use]
    pub fn utc_offset_sign(self) -> Self {
        self.sign(Field::UtcOffsetSign)
    }

    #[must_use]
    pub fn utc_offset_hours(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::UtcOffsetHours, digits, sign_style)
    }

    #[must_use]
    pub fn utc_offset_minutes(
        self,
        digits: RangeInclusive<u8>,
        sign_style: Option<SignStyle>,
    ) -> Self {
        self.whole_number(Field::UtcOffsetMinutes, digits, sign_style)
    }

    #[must_use]
    pub fn utc_offset_seconds(
        self,
        digits: RangeInclusive<u8>,
        sign_style: Option<SignStyle>,
    ) -> Self {
        self.whole_number(Field::UtcOffsetSeconds, digits, sign_style)
    }

    /// The `Z` designator: stores a zero total offset.
    #[must_use]
    pub fn utc_designator(self) -> Self {
        self.literal_assigning('Z', Field::UtcOffsetTotalSeconds, 0)
    }

    /// A time zone identifier: one ASCII letter, then up to 49 further
    /// characters from the letter, `-`..`9`, `~`, `_`, and `+` sets.
    #[must_use]
    pub fn time_zone_id(self) -> Self {
        self.text(Field::TimeZoneId, 1..=50, time_zone_id_char)
    }

    /// The `..` designator marking an unbounded interval side.
    #[must_use]
    pub fn unbounded_designator(self) -> Self {
        self.literal_str_assigning("..", Field::IsUnbounded, 1)
    }

    #[must_use]
    pub fn period_sign(self) -> Self {
        self.sign(Field::PeriodSign)
    }

    #[must_use]
    pub fn period_of_years(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::PeriodOfYears, digits, sign_style)
    }

    #[must_use]
    pub fn period_of_months(
        self,
        digits: RangeInclusive<u8>,
        sign_style: Option<SignStyle>,
    ) -> Self {
        self.whole_number(Field::PeriodOfMonths, digits, sign_style)
    }

    #[must_use]
    pub fn period_of_weeks(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::PeriodOfWeeks, digits, sign_style)
    }

    #[must_use]
    pub fn period_of_days(self, digits: RangeInclusive<u8>, sign_style: Option<SignStyle>) -> Self {
        self.whole_number(Field::PeriodOfDays, digits, sign_style)
    }

    #[must_use]
    pub fn duration_of_hours(
        self,
        digits: RangeInclusive<u8>,
        sign_style: Option<SignStyle>,
    ) -> Self {
        self.whole_number(Field::DurationOfHours, digits, sign_style)
    }

    #[must_use]
    pub fn duration_of_minutes(
        self,
        digits: RangeInclusive<u8>,
        sign_style: Option<SignStyle>,
    ) -> Self {
        self.whole_number(Field::DurationOfMinutes, digits, sign_style)
    }

    /// Seconds with an optional fraction, stored as whole seconds plus
    /// nanoseconds.
    #[must_use]
    pub fn duration_of_fractional_seconds(
        self,
        whole_digits: RangeInclusive<u8>,
        sign_style: Option<SignStyle>,
    ) -> Self {
        self.decimal_number(
            Field::DurationOfSeconds,
            Field::NanosecondOfSecond,
            whole_digits,
            0..=9,
            9,
            sign_style,
        )
    }
}

fn time_zone_id_char(ch: char, index: usize) -> TextMatch {
    let accepted = if index == 0 {
        ch.is_ascii_alphabetic()
    } else {
        ch.is_ascii_alphabetic() || ('-'..='9').contains(&ch) || matches!(ch, '~' | '_' | '+')
    };
    if accepted {
        TextMatch::Accept
    } else {
        TextMatch::Reject
    }
}

/// Chainable builder for [`GroupedParser`] trees.
///
/// Each [`group`](Self::group) produces one field map in the parse
/// output. Literals appended between groups consume input without
/// producing a map. [`any_of`](Self::any_of) embeds alternative
/// grouped parsers, committing to the first that succeeds and
/// forwarding all of its groups.
#[derive(Debug, Default)]
pub struct GroupedParserBuilder {
    items: Vec<GroupItem>,
}

impl GroupedParserBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Starts a fresh result group parsed by the nodes `f` appends. An
    /// empty group parses nothing and produces an empty field map.
    #[must_use]
    pub fn group(mut self, f: impl FnOnce(ParserBuilder) -> ParserBuilder) -> Self {
        self.items
            .push(GroupItem::Plain(f(ParserBuilder::new()).build()));
        self
    }

    /// Appends `count` empty groups.
    #[must_use]
    pub fn groups(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.items
                .push(GroupItem::Plain(Parser::from_node(ParseNode::Empty)));
        }
        self
    }

    /// Matches a single character without producing a group.
    #[must_use]
    pub fn literal(mut self, ch: char) -> Self {
        self.items
            .push(GroupItem::Plain(Parser::from_node(ParseNode::CharLiteral {
                ch,
                action: LiteralAction::None,
            })));
        self
    }

    /// Matches a string without producing a group.
    #[must_use]
    pub fn literal_str(mut self, text: &str) -> Self {
        self.items
            .push(GroupItem::Plain(Parser::from_node(ParseNode::StringLiteral {
                text: Box::from(text),
                action: LiteralAction::None,
            })));
        self
    }

    /// Tries `alternatives` in order, committing to the first that
    /// succeeds and forwarding its groups.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two alternatives are supplied.
    #[must_use]
    pub fn any_of<I>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = GroupedParser>,
    {
        let children: Vec<GroupItem> = alternatives.into_iter().map(GroupItem::Nested).collect();
        assert!(children.len() >= 2, "any_of requires at least two alternatives");
        self.items
            .push(GroupItem::Nested(GroupedParser::from_items(children, true)));
        self
    }

    #[must_use]
    pub fn build(self) -> GroupedParser {
        GroupedParser::from_items(self.items, false)
    }
}
