//! Candidate birth-date enumeration

use chrono::{Datelike, NaiveDate};

use crate::models::Candidate;

/// Enumerate every calendar date of `year` in ascending order
///
/// Pure function of the year; leap-year handling (including the century
/// rules) comes from the calendar arithmetic, not a fixed day count.
/// Years outside chrono's representable range yield an empty set.
#[must_use]
pub fn candidates_for_year(year: i32) -> Vec<Candidate> {
    let Some(start) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };

    start
        .iter_days()
        .take_while(|day| day.year() == year)
        .map(Candidate::new)
        .collect()
}
