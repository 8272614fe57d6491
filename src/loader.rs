//! Loads the student dataset from a JSON array or a CSV file and
//! normalizes it into [`StudentRecord`] rows: submission status is
//! lower-cased, scores are coerced to numeric-or-null, and the two date
//! columns to date-or-null. Structural problems are fatal; value-level
//! problems coerce to null.

use std::path::Path;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde_json::Value;

use crate::models::StudentRecord;

pub const EXPECTED_COLUMNS: [&str; 8] = [
    "student_name",
    "grade",
    "class",
    "region",
    "homework_submitted",
    "quiz_score",
    "quiz_date",
    "submission_date",
];

pub fn load_students(path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("dataset not found at {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => parse_students_csv(&raw),
        _ => parse_students_json(&raw),
    }
    .with_context(|| format!("failed to load dataset {}", path.display()))
}

pub fn parse_students_json(raw: &str) -> anyhow::Result<Vec<StudentRecord>> {
    let rows: Vec<serde_json::Map<String, Value>> =
        serde_json::from_str(raw).context("dataset is not a JSON array of records")?;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| normalize_row(row).with_context(|| format!("record {idx} is invalid")))
        .collect()
}

pub fn parse_students_csv(raw: &str) -> anyhow::Result<Vec<StudentRecord>> {
    let mut reader = csv::Reader::from_reader(raw.as_bytes());
    let headers = reader.headers().context("dataset CSV has no header row")?.clone();

    let missing: Vec<&str> = EXPECTED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!("dataset missing columns: {missing:?}");
    }

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .unwrap_or(usize::MAX)
    };

    let mut students = Vec::new();
    for result in reader.records() {
        let record = result.context("invalid CSV record")?;
        let field = |name: &str| record.get(column(name)).unwrap_or("").to_string();

        students.push(StudentRecord {
            student_name: field("student_name"),
            grade: field("grade"),
            class: field("class"),
            region: field("region"),
            homework_submitted: field("homework_submitted").trim().to_lowercase(),
            quiz_score: field("quiz_score").trim().parse().ok(),
            quiz_date: parse_date(&field("quiz_date")),
            submission_date: parse_date(&field("submission_date")),
        });
    }

    Ok(students)
}

fn normalize_row(row: &serde_json::Map<String, Value>) -> anyhow::Result<StudentRecord> {
    let missing: Vec<&str> = EXPECTED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !row.contains_key(*col))
        .collect();
    if !missing.is_empty() {
        bail!("dataset missing columns: {missing:?}");
    }

    Ok(StudentRecord {
        student_name: string_of(&row["student_name"]),
        grade: string_of(&row["grade"]),
        class: string_of(&row["class"]),
        region: string_of(&row["region"]),
        homework_submitted: string_of(&row["homework_submitted"]).trim().to_lowercase(),
        quiz_score: numeric_of(&row["quiz_score"]),
        quiz_date: date_of(&row["quiz_date"]),
        submission_date: date_of(&row["submission_date"]),
    })
}

fn string_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn date_of(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_json_rows() {
        let raw = r#"[
            {
                "student_name": "Asha",
                "grade": "Grade 8",
                "class": "8A",
                "region": "East",
                "homework_submitted": " YES ",
                "quiz_score": "85",
                "quiz_date": "2026-08-19",
                "submission_date": "2026-08-18"
            },
            {
                "student_name": "Bilal",
                "grade": "Grade 8",
                "class": "8B",
                "region": "East",
                "homework_submitted": "no",
                "quiz_score": "n/a",
                "quiz_date": "not a date",
                "submission_date": null
            }
        ]"#;

        let rows = parse_students_json(raw).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].homework_submitted, "yes");
        assert_eq!(rows[0].quiz_score, Some(85.0));
        assert_eq!(
            rows[0].quiz_date,
            NaiveDate::from_ymd_opt(2026, 8, 19)
        );
        assert_eq!(rows[1].quiz_score, None);
        assert_eq!(rows[1].quiz_date, None);
        assert_eq!(rows[1].submission_date, None);
    }

    #[test]
    fn missing_columns_are_fatal() {
        let raw = r#"[{"student_name": "Asha", "grade": "Grade 8"}]"#;
        let err = parse_students_json(raw).unwrap_err();
        assert!(format!("{err:#}").contains("missing columns"));
    }

    #[test]
    fn non_array_dataset_is_fatal() {
        assert!(parse_students_json(r#"{"student_name": "Asha"}"#).is_err());
    }

    #[test]
    fn parses_csv_rows() {
        let raw = "\
student_name,grade,class,region,homework_submitted,quiz_score,quiz_date,submission_date
Asha,Grade 8,8A,East,Yes,85,2026-08-19,2026-08-18
Bilal,Grade 8,8B,East,no,,2026-08-20,
";
        let rows = parse_students_csv(raw).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].homework_submitted, "yes");
        assert_eq!(rows[1].quiz_score, None);
        assert_eq!(rows[1].submission_date, None);
    }

    #[test]
    fn csv_missing_columns_are_fatal() {
        let raw = "student_name,grade\nAsha,Grade 8\n";
        let err = parse_students_csv(raw).unwrap_err();
        assert!(err.to_string().contains("missing columns"));
    }
}
