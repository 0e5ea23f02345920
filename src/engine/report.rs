//! Flattened text summary embedded into the generated report.
//!
//! One record per placed milestone, fields separated by `|`, records by
//! `||`: `title|description|expected|actual|status`.

use crate::model::Milestone;

pub const FIELD_SEPARATOR: &str = "|";
pub const RECORD_SEPARATOR: &str = "||";
/// Expected-age placeholder for custom entries.
pub const NOT_APPLICABLE: &str = "N/A";

/// One summary row, before flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecord {
    pub title: String,
    pub description: String,
    pub expected: String,
    pub actual: u32,
    pub status: String,
}

impl SummaryRecord {
    pub fn from_milestone(m: &Milestone) -> Option<Self> {
        let actual = m.actual_age?;
        Some(Self {
            title: m.title.replace(FIELD_SEPARATOR, "/"),
            description: m.description(),
            expected: if m.is_custom {
                NOT_APPLICABLE.to_string()
            } else {
                m.expected_age.to_string()
            },
            actual,
            status: m.status.as_str().to_string(),
        })
    }

    fn flatten(&self) -> String {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.expected.as_str(),
            &self.actual.to_string(),
            self.status.as_str(),
        ]
        .join(FIELD_SEPARATOR)
    }
}

/// Summary rows for every placed milestone, in collection order.
pub fn summary_records(milestones: &[Milestone]) -> Vec<SummaryRecord> {
    milestones
        .iter()
        .filter_map(SummaryRecord::from_milestone)
        .collect()
}

/// Flatten the placed milestones into the report interchange string.
pub fn timeline_summary(milestones: &[Milestone]) -> String {
    summary_records(milestones)
        .iter()
        .map(SummaryRecord::flatten)
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR)
}
