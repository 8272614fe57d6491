//! Maps a parsed question onto concrete row selection over scoped data.
//!
//! Stage order is fixed: grade, classes, region, then the intent-dependent
//! date/status stage. The first three are conjunctive and commute; the date
//! stage must run after the submission-status filter because the target
//! column depends on it.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{DateWindow, Intent, ParsedQuery, QueryFilters, StudentRecord, SubmissionStatus};

pub fn apply_filters(records: &[StudentRecord], parsed: &ParsedQuery) -> Vec<StudentRecord> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut rows: Vec<StudentRecord> = records.to_vec();
    let filters = &parsed.filters;

    if let Some(grade) = &filters.grade {
        rows.retain(|r| r.grade == *grade);
    }

    if !filters.classes.is_empty() {
        let classes: Vec<String> = filters.classes.iter().map(|c| c.to_uppercase()).collect();
        rows.retain(|r| classes.contains(&r.class));
    }

    if let Some(region) = &filters.region {
        rows.retain(|r| r.region == *region);
    }

    match parsed.intent {
        Intent::Homework => {
            if let Some(status) = filters.homework_submitted {
                rows.retain(|r| r.homework_submitted == status.as_str());
            }
            // Only submitted homework has a submission date to range over;
            // otherwise the window is ignored entirely.
            if filters.homework_submitted == Some(SubmissionStatus::Yes) {
                rows = apply_window(rows, &parsed.window, |r| r.submission_date);
            }
        }
        Intent::Quizzes | Intent::Performance => {
            rows = apply_window(rows, &parsed.window, |r| r.quiz_date);
        }
    }

    rows
}

/// Inclusive bound checks on the picked date column. Rows with a null
/// date are excluded by any active bound.
fn apply_window(
    mut rows: Vec<StudentRecord>,
    window: &DateWindow,
    pick: fn(&StudentRecord) -> Option<NaiveDate>,
) -> Vec<StudentRecord> {
    if window.kind.is_none() {
        return rows;
    }
    if let Some(start) = window.start {
        rows.retain(|r| pick(r).is_some_and(|d| d >= start));
    }
    if let Some(end) = window.end {
        rows.retain(|r| pick(r).is_some_and(|d| d <= end));
    }
    rows
}

/// Human-readable trace of how the question was interpreted. Shown to the
/// operator, never parsed by another component.
pub fn build_summary(parsed: &ParsedQuery) -> String {
    let mut out = String::new();
    let _ = write!(out, "intent={}", parsed.intent.as_str());

    if !parsed.filters.is_empty() {
        let _ = write!(out, "; filters={}", render_filters(&parsed.filters));
    }

    if let Some(kind) = parsed.window.kind {
        let _ = write!(
            out,
            "; date_range={}({}→{})",
            kind.as_str(),
            render_date(parsed.window.start),
            render_date(parsed.window.end)
        );
    }

    out
}

fn render_filters(filters: &QueryFilters) -> String {
    let mut parts = Vec::new();
    if let Some(grade) = &filters.grade {
        parts.push(format!("grade: {grade}"));
    }
    if !filters.classes.is_empty() {
        parts.push(format!("classes: [{}]", filters.classes.join(", ")));
    }
    if let Some(region) = &filters.region {
        parts.push(format!("region: {region}"));
    }
    if let Some(status) = filters.homework_submitted {
        parts.push(format!("homework_submitted: {}", status.as_str()));
    }
    format!("{{{}}}", parts.join(", "))
}

fn render_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.to_string(),
        None => "None".to_string(),
    }
}
