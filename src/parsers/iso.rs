//! The ISO-8601 grammar library.
//!
//! Grammars come in three forms: [`basic`] (no separators, `20080901`),
//! [`extended`] (separators, `2008-09-01`), and the combined
//! constructors in this module, which try the extended form first and
//! fall back to basic. Each constructor builds a fresh [`Parser`];
//! they are cheap to build and to clone.

use crate::options::SignStyle;

use super::{GroupedParser, Parser};

/// Grammars without separators, like `20080901` and `183000`.
pub mod basic {
    use super::*;

    /// `YYYYMMDD`
    pub fn calendar_date() -> Parser {
        Parser::build(|b| {
            b.year(4..=4, Some(SignStyle::Never))
                .month_of_year(2..=2, Some(SignStyle::Never))
                .day_of_month(2..=2, Some(SignStyle::Never))
        })
    }

    /// `YYYYDDD`
    pub fn ordinal_date() -> Parser {
        Parser::build(|b| {
            b.year(4..=4, Some(SignStyle::Never))
                .day_of_year(3..=3, Some(SignStyle::Never))
        })
    }

    /// A calendar date or an ordinal date.
    pub fn date() -> Parser {
        Parser::build(|b| b.any_of([calendar_date(), ordinal_date()]))
    }

    /// `HH`, `HHMM`, or `HHMMSS` with an optional fraction.
    pub fn time() -> Parser {
        Parser::build(|b| {
            b.hour_of_day(2..=2, Some(SignStyle::Never)).optional(|b| {
                b.minute_of_hour(2..=2, Some(SignStyle::Never))
                    .optional(|b| b.fractional_second_of_minute(2..=2, Some(SignStyle::Never)))
            })
        })
    }

    /// `Z`, `±HH`, `±HHMM`, or `±HHMMSS`.
    pub fn utc_offset() -> Parser {
        Parser::build(|b| {
            b.any_of([
                Parser::build(|b| b.utc_designator()),
                Parser::build(|b| {
                    b.utc_offset_sign()
                        .utc_offset_hours(2..=2, Some(SignStyle::Never))
                        .optional(|b| {
                            b.utc_offset_minutes(2..=2, Some(SignStyle::Never)).optional(|b| {
                                b.utc_offset_seconds(2..=2, Some(SignStyle::Never))
                            })
                        })
                }),
            ])
        })
    }

    /// A calendar date and a time, joined by `T` or a space.
    pub fn date_time() -> Parser {
        Parser::build(|b| {
            b.parser(&calendar_date())
                .any_of([
                    Parser::build(|b| b.literal('T')),
                    Parser::build(|b| b.literal(' ')),
                ])
                .parser(&time())
        })
    }

    /// A time with a UTC offset.
    pub fn offset_time() -> Parser {
        Parser::build(|b| b.parser(&time()).parser(&utc_offset()))
    }

    /// A date-time with a UTC offset.
    pub fn offset_date_time() -> Parser {
        Parser::build(|b| b.parser(&date_time()).parser(&utc_offset()))
    }

    /// A date-time with a UTC offset and an optional bracketed region,
    /// like `20080901T1830-0400[America/New_York]`.
    pub fn zoned_date_time() -> Parser {
        Parser::build(|b| {
            b.parser(&date_time())
                .parser(&utc_offset())
                .optional(|b| b.literal('[').time_zone_id().literal(']'))
        })
    }

    /// A date-time with the zero UTC offset designator.
    pub fn instant() -> Parser {
        Parser::build(|b| b.parser(&date_time()).utc_designator())
    }

    pub fn date_range() -> GroupedParser {
        super::interval_of(calendar_date())
    }

    pub fn date_time_interval() -> GroupedParser {
        super::interval_of(date_time())
    }

    pub fn offset_date_time_interval() -> GroupedParser {
        super::interval_of(offset_date_time())
    }

    pub fn zoned_date_time_interval() -> GroupedParser {
        super::interval_of(zoned_date_time())
    }

    pub fn instant_interval() -> GroupedParser {
        super::interval_of(instant())
    }
}

/// Grammars with separators, like `2008-09-01` and `18:30:00`.
pub mod extended {
    use super::*;

    /// `YYYY-MM-DD`
    pub fn calendar_date() -> Parser {
        Parser::build(|b| {
            b.year(4..=4, Some(SignStyle::Never))
                .literal('-')
                .month_of_year(2..=2, Some(SignStyle::Never))
                .literal('-')
                .day_of_month(2..=2, Some(SignStyle::Never))
        })
    }

    /// `YYYY-DDD`
    pub fn ordinal_date() -> Parser {
        Parser::build(|b| {
            b.year(4..=4, Some(SignStyle::Never))
                .literal('-')
                .day_of_year(3..=3, Some(SignStyle::Never))
        })
    }

    /// A calendar date or an ordinal date.
    pub fn date() -> Parser {
        Parser::build(|b| b.any_of([calendar_date(), ordinal_date()]))
    }

    /// `HH`, `HH:MM`, or `HH:MM:SS` with an optional fraction.
    pub fn time() -> Parser {
        Parser::build(|b| {
            b.hour_of_day(2..=2, Some(SignStyle::Never)).optional(|b| {
                b.literal(':')
                    .minute_of_hour(2..=2, Some(SignStyle::Never))
                    .optional(|b| {
                        b.literal(':')
                            .fractional_second_of_minute(2..=2, Some(SignStyle::Never))
                    })
            })
        })
    }

    /// `Z`, `±HH`, `±HH:MM`, or `±HH:MM:SS`.
    pub fn utc_offset() -> Parser {
        Parser::build(|b| {
            b.any_of([
                Parser::build(|b| b.utc_designator()),
                Parser::build(|b| {
                    b.utc_offset_sign()
                        .utc_offset_hours(2..=2, Some(SignStyle::Never))
                        .optional(|b| {
                            b.literal(':')
                                .utc_offset_minutes(2..=2, Some(SignStyle::Never))
                                .optional(|b| {
                                    b.literal(':')
                                        .utc_offset_seconds(2..=2, Some(SignStyle::Never))
                                })
                        })
                }),
            ])
        })
    }

    /// A calendar date and a time, joined by `T` or a space.
    pub fn date_time() -> Parser {
        Parser::build(|b| {
            b.parser(&calendar_date())
                .any_of([
                    Parser::build(|b| b.literal('T')),
                    Parser::build(|b| b.literal(' ')),
                ])
                .parser(&time())
        })
    }

    /// A time with a UTC offset.
    pub fn offset_time() -> Parser {
        Parser::build(|b| b.parser(&time()).parser(&utc_offset()))
    }

    /// A date-time with a UTC offset.
    pub fn offset_date_time() -> Parser {
        Parser::build(|b| b.parser(&date_time()).parser(&utc_offset()))
    }

    /// A date-time with a UTC offset and an optional bracketed region,
    /// like `2008-09-01T18:30-04:00[America/New_York]`.
    pub fn zoned_date_time() -> Parser {
        Parser::build(|b| {
            b.parser(&date_time())
                .parser(&utc_offset())
                .optional(|b| b.literal('[').time_zone_id().literal(']'))
        })
    }

    /// A date-time with the zero UTC offset designator.
    pub fn instant() -> Parser {
        Parser::build(|b| b.parser(&date_time()).utc_designator())
    }

    /// `YYYY-MM`
    pub fn year_month() -> Parser {
        Parser::build(|b| {
            b.year(4..=4, Some(SignStyle::Never))
                .literal('-')
                .month_of_year(2..=2, Some(SignStyle::Never))
        })
    }

    pub fn date_range() -> GroupedParser {
        super::interval_of(calendar_date())
    }

    pub fn date_time_interval() -> GroupedParser {
        super::interval_of(date_time())
    }

    pub fn offset_date_time_interval() -> GroupedParser {
        super::interval_of(offset_date_time())
    }

    pub fn zoned_date_time_interval() -> GroupedParser {
        super::interval_of(zoned_date_time())
    }

    pub fn instant_interval() -> GroupedParser {
        super::interval_of(instant())
    }
}

/// A calendar date in either form.
pub fn calendar_date() -> Parser {
    Parser::build(|b| b.any_of([extended::calendar_date(), basic::calendar_date()]))
}

/// An ordinal date in either form.
pub fn ordinal_date() -> Parser {
    Parser::build(|b| b.any_of([extended::ordinal_date(), basic::ordinal_date()]))
}

/// A calendar or ordinal date in either form.
pub fn date() -> Parser {
    Parser::build(|b| b.any_of([calendar_date(), ordinal_date()]))
}

/// A time of day in either form.
pub fn time() -> Parser {
    Parser::build(|b| b.any_of([extended::time(), basic::time()]))
}

/// A UTC offset in either form.
pub fn utc_offset() -> Parser {
    Parser::build(|b| {
        b.any_of([
            Parser::build(|b| b.utc_designator()),
            Parser::build(|b| {
                b.utc_offset_sign()
                    .utc_offset_hours(2..=2, Some(SignStyle::Never))
                    .optional(|b| {
                        b.any_of([
                            Parser::build(|b| {
                                b.literal(':')
                                    .utc_offset_minutes(2..=2, Some(SignStyle::Never))
                                    .optional(|b| {
                                        b.literal(':')
                                            .utc_offset_seconds(2..=2, Some(SignStyle::Never))
                                    })
                            }),
                            Parser::build(|b| {
                                b.utc_offset_minutes(2..=2, Some(SignStyle::Never)).optional(
                                    |b| b.utc_offset_seconds(2..=2, Some(SignStyle::Never)),
                                )
                            }),
                        ])
                    })
            }),
        ])
    })
}

/// A date-time in either form.
pub fn date_time() -> Parser {
    Parser::build(|b| b.any_of([extended::date_time(), basic::date_time()]))
}

/// A time with a UTC offset in either form.
pub fn offset_time() -> Parser {
    Parser::build(|b| b.any_of([extended::offset_time(), basic::offset_time()]))
}

/// A date-time with a UTC offset in either form.
pub fn offset_date_time() -> Parser {
    Parser::build(|b| b.any_of([extended::offset_date_time(), basic::offset_date_time()]))
}

/// A date-time with a UTC offset and an optional bracketed region, in
/// either form.
pub fn zoned_date_time() -> Parser {
    Parser::build(|b| b.any_of([extended::zoned_date_time(), basic::zoned_date_time()]))
}

/// A date-time with the zero UTC offset designator, in either form.
///
/// Examples:
/// - `2001-05-10T00:24:00.00000Z`
/// - `2001-05-10T00:24Z`
/// - `20010510 0024Z`
pub fn instant() -> Parser {
    Parser::build(|b| b.any_of([extended::instant(), basic::instant()]))
}

/// A year-month. The standard supports only the extended form.
pub fn year_month() -> Parser {
    extended::year_month()
}

/// A four-digit year.
pub fn year() -> Parser {
    Parser::build(|b| b.year(4..=4, Some(SignStyle::Never)))
}

/// A period of years, months, and days, like `P1Y2M3D`.
pub fn period() -> Parser {
    Parser::build(|b| {
        b.literal('P')
            .optional(|b| b.period_of_years(1..=10, None).literal('Y'))
            .optional(|b| b.period_of_months(1..=10, None).literal('M'))
            .optional(|b| b.period_of_days(1..=10, None).literal('D'))
    })
}

/// A duration of days and time components, like `P1DT2H3M4.5S`.
pub fn duration() -> Parser {
    Parser::build(|b| {
        b.literal('P')
            .optional(|b| b.period_of_days(1..=10, None).literal('D'))
            .optional(|b| {
                b.literal('T')
                    .optional(|b| b.duration_of_hours(1..=19, None).literal('H'))
                    .optional(|b| b.duration_of_minutes(1..=19, None).literal('M'))
                    .optional(|b| {
                        b.duration_of_fractional_seconds(1..=19, None).literal('S')
                    })
            })
    })
}

/// A `/`-separated pair of calendar dates, either of which may be the
/// `..` unbounded designator. The empty string parses as two empty
/// groups.
pub fn date_range() -> GroupedParser {
    interval_of(calendar_date())
}

/// A `/`-separated pair of date-times.
pub fn date_time_interval() -> GroupedParser {
    interval_of(date_time())
}

/// A `/`-separated pair of offset date-times.
pub fn offset_date_time_interval() -> GroupedParser {
    interval_of(offset_date_time())
}

/// A `/`-separated pair of zoned date-times.
pub fn zoned_date_time_interval() -> GroupedParser {
    interval_of(zoned_date_time())
}

/// A `/`-separated pair of instants.
pub fn instant_interval() -> GroupedParser {
    interval_of(instant())
}

fn interval_side(element: &Parser) -> Parser {
    Parser::build(|b| {
        b.any_of([
            Parser::build(|b| b.unbounded_designator()),
            element.clone(),
        ])
    })
}

fn interval_of(element: Parser) -> GroupedParser {
    let first = interval_side(&element);
    let second = first.clone();
    let bounded = GroupedParser::build(move |b| {
        b.group(move |g| g.parser(&first))
            .literal('/')
            .group(move |g| g.parser(&second))
    });
    let empty = GroupedParser::build(|b| b.groups(2));
    GroupedParser::build(move |b| b.any_of([bounded, empty]))
}
