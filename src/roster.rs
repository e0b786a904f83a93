use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::models::{StudentProfile, StudentRecord};

#[derive(serde::Deserialize)]
struct CsvRow {
    name: String,
    attendance: f64,
    gpa: f64,
    internal_marks: f64,
    study_hours: f64,
    stress_level: f64,
    financial_issue: f64,
}

/// Reads students from a CSV file, validating every row against the profile schema.
pub fn load_students(csv_path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    let reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    read_students(reader)
}

pub fn read_students<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> anyhow::Result<Vec<StudentRecord>> {
    let mut students = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = result.with_context(|| format!("malformed row on line {line}"))?;
        let profile = StudentProfile::from_features(&[
            row.attendance,
            row.gpa,
            row.internal_marks,
            row.study_hours,
            row.stress_level,
            row.financial_issue,
        ])
        .with_context(|| format!("invalid profile for {} on line {line}", row.name))?;

        debug!(line, name = %row.name, "student row loaded");
        students.push(StudentRecord {
            name: row.name,
            profile,
        });
    }

    Ok(students)
}
