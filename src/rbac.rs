use crate::models::{AdminScope, StudentRecord};

/// Narrow the dataset to what the admin is allowed to see. This runs
/// before any question-driven filtering; the engine never sees unscoped
/// rows.
pub fn scope_records(records: &[StudentRecord], admin: &AdminScope) -> Vec<StudentRecord> {
    if records.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| {
            admin.allowed_grades.iter().any(|g| *g == record.grade)
                && admin.allowed_classes.iter().any(|c| *c == record.class)
                && record.region == admin.region
        })
        .cloned()
        .collect()
}
