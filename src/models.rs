use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the student dataset. Dates and scores are already normalized
/// by the loader; `None` means the source value was absent or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_name: String,
    pub grade: String,
    pub class: String,
    pub region: String,
    pub homework_submitted: String,
    pub quiz_score: Option<f64>,
    pub quiz_date: Option<NaiveDate>,
    pub submission_date: Option<NaiveDate>,
}

/// What an admin is allowed to see. All three dimensions are ANDed;
/// an empty allow-list matches nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminScope {
    pub name: String,
    pub allowed_grades: Vec<String>,
    pub allowed_classes: Vec<String>,
    pub region: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Homework,
    Quizzes,
    Performance,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Homework => "homework",
            Intent::Quizzes => "quizzes",
            Intent::Performance => "performance",
        }
    }

    pub fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "homework" => Some(Intent::Homework),
            "quizzes" => Some(Intent::Quizzes),
            "performance" => Some(Intent::Performance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Yes,
    No,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Yes => "yes",
            SubmissionStatus::No => "no",
        }
    }

    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yes" => Some(SubmissionStatus::Yes),
            "no" => Some(SubmissionStatus::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    LastWeek,
    ThisWeek,
    NextWeek,
    Custom,
}

impl WindowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WindowKind::LastWeek => "last_week",
            WindowKind::ThisWeek => "this_week",
            WindowKind::NextWeek => "next_week",
            WindowKind::Custom => "custom",
        }
    }

    /// Recognizes only the three symbolic keywords a question can name.
    /// Custom windows carry explicit bounds and are never requested by keyword.
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "last_week" => Some(WindowKind::LastWeek),
            "this_week" => Some(WindowKind::ThisWeek),
            "next_week" => Some(WindowKind::NextWeek),
            _ => None,
        }
    }
}

/// Inclusive calendar-day window. `kind == None` means no temporal
/// constraint; start and end must then be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    pub kind: Option<WindowKind>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Attribute filters extracted from a question. A `None` (or an empty
/// `classes` list) means the question did not mention that attribute,
/// which is different from filtering for its absence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryFilters {
    pub grade: Option<String>,
    pub classes: Vec<String>,
    pub region: Option<String>,
    pub homework_submitted: Option<SubmissionStatus>,
}

impl QueryFilters {
    pub fn is_empty(&self) -> bool {
        self.grade.is_none()
            && self.classes.is_empty()
            && self.region.is_none()
            && self.homework_submitted.is_none()
    }
}

/// Structured form of a plain-English question: built by the rule-based
/// parser, optionally refined by the LLM, then read-only in the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub intent: Intent,
    pub filters: QueryFilters,
    pub window: DateWindow,
}
