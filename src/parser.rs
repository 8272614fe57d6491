//! Rule-based parsing of plain-English questions into a [`ParsedQuery`].
//!
//! Deterministic and total: an unmatched pattern omits its filter rather
//! than erroring, and an empty question falls back to the quizzes intent
//! with no filters.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::dates;
use crate::models::{DateWindow, Intent, ParsedQuery, QueryFilters, SubmissionStatus, WindowKind};

const HOMEWORK_KEYWORDS: &[&str] = &[
    "homework",
    "submit",
    "submission",
    "submitted",
    "haven't submitted",
    "didn't submit",
];

const QUIZ_KEYWORDS: &[&str] = &["quiz", "quizzes", "score", "performance"];

const NEGATION_PHRASES: &[&str] = &[
    "not submitted",
    "didn't submit",
    "didnt submit",
    "haven't submitted",
    "havent submitted",
    "no submission",
];

static GRADE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"grade\s*(\d+)").expect("grade pattern is valid"));
static CLASS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}[a-z])\b").expect("class pattern is valid"));
static REGION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(north|south|east|west)\b").expect("region pattern is valid"));

/// Parse a question against today's date.
pub fn parse(text: &str) -> ParsedQuery {
    parse_at(text, Local::now().date_naive())
}

/// Parse a question against an explicit reference date. The date only
/// matters when the question names a week keyword.
pub fn parse_at(text: &str, today: NaiveDate) -> ParsedQuery {
    let t = text.trim().to_lowercase();

    let intent = classify_intent(&t);
    let mut filters = QueryFilters::default();

    // Submission status is only meaningful for homework questions.
    if intent == Intent::Homework {
        if NEGATION_PHRASES.iter().any(|neg| t.contains(neg)) {
            filters.homework_submitted = Some(SubmissionStatus::No);
        } else if t.contains("submitted") {
            filters.homework_submitted = Some(SubmissionStatus::Yes);
        }
    }

    if let Some(caps) = GRADE_PATTERN.captures(&t) {
        filters.grade = Some(format!("Grade {}", &caps[1]));
    }

    // Only the first class code is captured; "8A or 8B" keeps 8A.
    if let Some(caps) = CLASS_PATTERN.captures(&t) {
        filters.classes.push(caps[1].to_uppercase());
    }

    if let Some(caps) = REGION_PATTERN.captures(&t) {
        filters.region = Some(capitalize(&caps[1]));
    }

    let window = if t.contains("last week") {
        dates::compute_range(WindowKind::LastWeek, today)
    } else if t.contains("this week") {
        dates::compute_range(WindowKind::ThisWeek, today)
    } else if t.contains("next week") {
        dates::compute_range(WindowKind::NextWeek, today)
    } else {
        DateWindow::none()
    };

    ParsedQuery {
        intent,
        filters,
        window,
    }
}

fn classify_intent(t: &str) -> Intent {
    if HOMEWORK_KEYWORDS.iter().any(|k| t.contains(k)) {
        Intent::Homework
    } else if QUIZ_KEYWORDS.iter().any(|k| t.contains(k)) {
        if t.contains("performance") {
            Intent::Performance
        } else {
            Intent::Quizzes
        }
    } else {
        Intent::Quizzes
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
