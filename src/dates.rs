use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{DateWindow, WindowKind};

/// ISO week convention: Monday is day 0.
pub fn monday_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

pub fn sunday_of_week(day: NaiveDate) -> NaiveDate {
    monday_of_week(day) + Duration::days(6)
}

/// Resolves a symbolic week keyword against a reference date into an
/// inclusive [start, end] calendar window.
pub fn compute_range(kind: WindowKind, now: NaiveDate) -> DateWindow {
    match kind {
        WindowKind::ThisWeek => DateWindow {
            kind: Some(kind),
            start: Some(monday_of_week(now)),
            end: Some(sunday_of_week(now)),
        },
        WindowKind::LastWeek => {
            let end = sunday_of_week(now - Duration::days(7));
            DateWindow {
                kind: Some(kind),
                start: Some(end - Duration::days(6)),
                end: Some(end),
            }
        }
        WindowKind::NextWeek => {
            let start = monday_of_week(now + Duration::days(7));
            DateWindow {
                kind: Some(kind),
                start: Some(start),
                end: Some(start + Duration::days(6)),
            }
        }
        // Bounds for a custom window come from the caller, not the calendar.
        WindowKind::Custom => DateWindow {
            kind: Some(kind),
            start: None,
            end: None,
        },
    }
}
