//! Integer Gregorian calendar equations.
//!
//! Conversions between (year, month, day) and days relative to the Unix
//! epoch use Cassio Neri and Lorenz Schneider's Euclidean affine
//! functions, computed over a rata die shifted so that every supported
//! year (−9999 through 9999) maps to a non-negative value.

/// Nanoseconds per second: 1e9
pub(crate) const NS_PER_SECOND: i64 = 1_000_000_000;
/// Seconds per minute
pub(crate) const SECONDS_PER_MINUTE: i64 = 60;
/// Seconds per hour
pub(crate) const SECONDS_PER_HOUR: i64 = 3600;
/// Seconds per day: 86,400
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;
/// Nanoseconds per day: 8.64e13
pub(crate) const NS_PER_DAY: i128 = SECONDS_PER_DAY as i128 * NS_PER_SECOND as i128;

const DAYS_IN_A_400Y_CYCLE: u32 = 146_097;
const EPOCH_COMPUTATIONAL_RATA_DIE: i64 = 719_468;
const TWO_POWER_THIRTY_NINE: u64 = 549_755_813_888;
const TWO_POWER_SIXTEEN: u32 = 65_536;

// 30 whole 400-year cycles keep the computational year non-negative for
// years down to -9999.
const CYCLE_SHIFT: i64 = 30;
const YEAR_SHIFT: i64 = 400 * CYCLE_SHIFT;
const RATA_DIE_SHIFT: i64 = EPOCH_COMPUTATIONAL_RATA_DIE + CYCLE_SHIFT * DAYS_IN_A_400Y_CYCLE as i64;

pub(crate) const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub(crate) const fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

pub(crate) const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

// Days preceding the first of each month in a common year.
const MONTH_OFFSETS: [u16; 13] = [
    0, 0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334,
];

/// Ordinal day within the year, 1-based.
pub(crate) const fn day_of_year(year: i32, month: u8, day: u8) -> u16 {
    let leap = (month > 2 && is_leap_year(year)) as u16;
    MONTH_OFFSETS[month as usize] + leap + day as u16
}

/// Inverse of [`day_of_year`]: the month and day-of-month for an ordinal
/// day. `ordinal` must be within `1..=days_in_year(year)`.
pub(crate) const fn month_day_from_day_of_year(year: i32, ordinal: u16) -> (u8, u8) {
    let leap = is_leap_year(year) as u16;
    let mut month = 12u8;
    while month > 1 {
        let offset = MONTH_OFFSETS[month as usize] + if month > 2 { leap } else { 0 };
        if ordinal > offset {
            return (month, (ordinal - offset) as u8);
        }
        month -= 1;
    }
    (1, ordinal as u8)
}

/// Days since 1970-01-01 for a Gregorian date.
pub(crate) const fn epoch_days_from_gregorian(year: i32, month: u8, day: u8) -> i64 {
    let j = (month <= 2) as i64;
    let comp_year = year as i64 + YEAR_SHIFT - j;
    let comp_month = month as i64 + 12 * j;
    let comp_day = day as i64 - 1;
    let century = comp_year / 100;
    let y_star = 1461 * comp_year / 4 - century + century / 4;
    let m_star = (979 * comp_month - 2919) / 32;
    y_star + m_star + comp_day - RATA_DIE_SHIFT
}

/// Gregorian (year, month, day) for days since 1970-01-01.
pub(crate) const fn gregorian_from_epoch_days(epoch_days: i64) -> (i32, u8, u8) {
    let rata_die = (epoch_days + RATA_DIE_SHIFT) as u32;
    let n_one = 4 * rata_die + 3;
    let century = n_one.div_euclid(DAYS_IN_A_400Y_CYCLE);
    let n_two = n_one.rem_euclid(DAYS_IN_A_400Y_CYCLE) | 3;
    let year_of_century = ((376_287_347 * n_two as u64).div_euclid(TWO_POWER_THIRTY_NINE)) as u32;
    let day_of_year = (n_two - 1461 * year_of_century).div_euclid(4);
    let n_three = 2141 * day_of_year + 197_913;
    let month = n_three.div_euclid(TWO_POWER_SIXTEEN);
    let day = n_three.rem_euclid(TWO_POWER_SIXTEEN).div_euclid(2141);
    // The computational year begins in March; day 306 is January 1st.
    let j = (day_of_year >= 306) as u32;
    let year = (100 * century + year_of_century + j) as i64 - YEAR_SHIFT;
    (year as i32, (month - 12 * j) as u8, (day + 1) as u8)
}

/// ISO day of week, Monday = 1 through Sunday = 7.
pub(crate) const fn iso_day_of_week(epoch_days: i64) -> u8 {
    // 1970-01-01 was a Thursday.
    ((epoch_days + 3).rem_euclid(7) + 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_round_trips() {
        let cases = [
            (1970, 1, 1, 0),
            (1970, 1, 2, 1),
            (1969, 12, 31, -1),
            (2008, 9, 1, 14_123),
            (2000, 2, 29, 11_016),
            (1600, 2, 29, -135_081),
        ];
        for (year, month, day, days) in cases {
            assert_eq!(epoch_days_from_gregorian(year, month, day), days);
            assert_eq!(gregorian_from_epoch_days(days), (year, month, day));
        }
    }

    #[test]
    fn extreme_years_round_trip() {
        for (year, month, day) in [(-9999, 1, 1), (9999, 12, 31), (-4, 2, 29), (0, 12, 31)] {
            let days = epoch_days_from_gregorian(year, month, day);
            assert_eq!(gregorian_from_epoch_days(days), (year, month, day));
        }
    }

    #[test]
    fn leap_year_rules() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2008));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2007));
        assert_eq!(days_in_month(2008, 2), 29);
        assert_eq!(days_in_month(2007, 2), 28);
        assert_eq!(days_in_year(2008), 366);
    }

    #[test]
    fn ordinal_conversions() {
        assert_eq!(day_of_year(2008, 9, 1), 245);
        assert_eq!(day_of_year(2008, 1, 1), 1);
        assert_eq!(day_of_year(2008, 12, 31), 366);
        assert_eq!(month_day_from_day_of_year(2008, 245), (9, 1));
        assert_eq!(month_day_from_day_of_year(2008, 244), (8, 31));
        assert_eq!(month_day_from_day_of_year(2007, 244), (9, 1));
        assert_eq!(month_day_from_day_of_year(2008, 1), (1, 1));
        assert_eq!(month_day_from_day_of_year(2008, 366), (12, 31));
    }

    #[test]
    fn day_of_week_is_iso_numbered() {
        // 2008-09-01 was a Monday.
        assert_eq!(iso_day_of_week(epoch_days_from_gregorian(2008, 9, 1)), 1);
        // 1970-01-01 was a Thursday.
        assert_eq!(iso_day_of_week(0), 4);
        // 2007-10-28 was a Sunday.
        assert_eq!(iso_day_of_week(epoch_days_from_gregorian(2007, 10, 28)), 7);
    }
}
