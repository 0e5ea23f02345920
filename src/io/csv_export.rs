use std::path::Path;

use crate::error::Result;
use crate::model::Milestone;

/// Export placed milestones to a semicolon-delimited CSV file.
///
/// Columns: Milestone ; Category ; Expected (months) ; Actual (months) ; Status
/// Unreferenced milestones have an empty expected column.
/// Returns the number of milestones written.
pub fn export_csv(milestones: &[Milestone], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    write_csv(milestones, file)
}

pub fn write_csv<W: std::io::Write>(milestones: &[Milestone], writer: W) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record([
        "Milestone",
        "Category",
        "Expected (months)",
        "Actual (months)",
        "Status",
    ])?;

    let mut count = 0;
    for m in milestones {
        let Some(actual) = m.actual_age else {
            continue;
        };
        let expected = if m.is_age_referenced() {
            m.expected_age.to_string()
        } else {
            String::new()
        };
        wtr.write_record([
            m.title.as_str(),
            m.category.label(),
            expected.as_str(),
            actual.to_string().as_str(),
            m.status.label(),
        ])?;
        count += 1;
    }

    wtr.flush()?;
    tracing::info!(count, "exported milestones to CSV");
    Ok(count)
}
