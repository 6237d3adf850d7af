//! Past/future checks used when validating scheduling input.
//!
//! Callers pass "now" explicitly so the checks stay deterministic under test.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Years that format as four plain digits, so stored text sorts by date.
pub const MIN_STORABLE_YEAR: i32 = 0;
pub const MAX_STORABLE_YEAR: i32 = 9999;

/// Strictly after `now`.
pub fn datetime_in_future(value: NaiveDateTime, now: NaiveDateTime) -> bool {
    value > now
}

/// A calendar day after `today`; today itself is not in the future.
pub fn date_in_future(value: NaiveDate, today: NaiveDate) -> bool {
    value > today
}

/// A calendar day before `today`; today itself is not in the past.
pub fn date_in_past(value: NaiveDate, today: NaiveDate) -> bool {
    value < today
}

/// Year within `MIN_STORABLE_YEAR..=MAX_STORABLE_YEAR`.
pub fn date_storable(value: NaiveDate) -> bool {
    (MIN_STORABLE_YEAR..=MAX_STORABLE_YEAR).contains(&value.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_is_neither_past_nor_future() {
        let today = day(2024, 6, 1);
        assert!(!date_in_future(today, today));
        assert!(!date_in_past(today, today));
    }

    #[test]
    fn adjacent_days() {
        let today = day(2024, 6, 1);
        assert!(date_in_future(day(2024, 6, 2), today));
        assert!(date_in_past(day(2024, 5, 31), today));
    }

    #[test]
    fn datetime_same_instant_is_not_future() {
        let now = day(2024, 6, 1).and_hms_opt(9, 30, 0).unwrap();
        assert!(!datetime_in_future(now, now));
        assert!(datetime_in_future(now + chrono::Duration::minutes(1), now));
    }

    #[test]
    fn storable_years_are_four_digits() {
        assert!(date_storable(day(9999, 12, 31)));
        assert!(date_storable(day(0, 1, 1)));
        assert!(!date_storable(day(10000, 1, 1)));
        assert!(!date_storable(day(-1, 12, 31)));
    }
}
