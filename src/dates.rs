use chrono::{Datelike, Duration, NaiveDate};

use crate::common::QueryWindow;

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => if is_leap_year(year) { 29 } else { 28 },
        _ => 31
    }
}

/// The whole calendar month containing `today`, used when no dates are given.
pub fn default_window(today: NaiveDate) -> QueryWindow {
    let first = today - Duration::days(i64::from(today.day0()));
    let length = days_in_month(today.year(), today.month());
    let last = first + Duration::days(i64::from(length - 1));

    QueryWindow::new(first, last)
}
