use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of the fixed "add new concern" entry in the concerns category.
pub const ADD_CONCERN_ID: &str = "add_concern";
/// Title shown on the add-concern sentinel.
pub const ADD_CONCERN_TITLE: &str = "+";

/// Grouping for milestones; drives tooltip and marker colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Communication,
    Motor,
    Social,
    Concerns,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Communication,
            Category::Motor,
            Category::Social,
            Category::Concerns,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Communication => "Communication",
            Category::Motor => "Motor",
            Category::Social => "Social",
            Category::Concerns => "Concerns",
        }
    }
}

/// Clinical classification of actual vs. expected age.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    Typical,
    Monitor,
    Delayed,
    #[default]
    Pending,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Typical => "typical",
            MilestoneStatus::Monitor => "monitor",
            MilestoneStatus::Delayed => "delayed",
            MilestoneStatus::Pending => "pending",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MilestoneStatus::Typical => "Typical",
            MilestoneStatus::Monitor => "Monitor",
            MilestoneStatus::Delayed => "Delayed",
            MilestoneStatus::Pending => "Pending",
        }
    }
}

impl std::fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single trackable developmental item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub category: Category,
    /// Normative age in months; `0` means the item is not age-referenced.
    pub expected_age: u32,
    /// Age in months at which the skill was observed. `None` until placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_age: Option<u32>,
    /// Render row on the timeline (0 = topmost). Derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_position: Option<u32>,
    #[serde(default)]
    pub status: MilestoneStatus,
    #[serde(default)]
    pub is_custom: bool,
}

impl Milestone {
    /// Create an unplaced catalog milestone.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        expected_age: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            expected_age,
            actual_age: None,
            stack_position: None,
            status: MilestoneStatus::Pending,
            is_custom: false,
        }
    }

    /// Create a clinician-entered concern with a fresh time-ordered id.
    pub fn new_custom_concern(title: impl Into<String>) -> Self {
        Self {
            id: format!("custom_{}", Uuid::now_v7().simple()),
            is_custom: true,
            ..Self::new("", title, Category::Concerns, 0)
        }
    }

    /// The fixed "+" entry that opens the add-concern dialog.
    pub fn add_concern_sentinel() -> Self {
        Self::new(ADD_CONCERN_ID, ADD_CONCERN_TITLE, Category::Concerns, 0)
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == ADD_CONCERN_ID
    }

    pub fn is_placed(&self) -> bool {
        self.actual_age.is_some()
    }

    /// Whether the milestone carries a normative age.
    pub fn is_age_referenced(&self) -> bool {
        self.expected_age > 0
    }

    /// Human-readable description used in tooltips and the report summary.
    pub fn description(&self) -> String {
        if self.is_custom {
            "Custom milestone".to_string()
        } else {
            format!("Expected at {} months", self.expected_age)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_concerns_get_distinct_ids() {
        let a = Milestone::new_custom_concern("Echolalia");
        let b = Milestone::new_custom_concern("Echolalia");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("custom_"));
        assert!(a.is_custom);
        assert_eq!(a.category, Category::Concerns);
        assert_eq!(a.expected_age, 0);
    }

    #[test]
    fn serializes_with_camel_case_and_lowercase_enums() {
        let mut m = Milestone::new("head_control", "Head control", Category::Motor, 3);
        m.actual_age = Some(4);
        m.stack_position = Some(0);
        m.status = MilestoneStatus::Typical;

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["expectedAge"], 3);
        assert_eq!(json["actualAge"], 4);
        assert_eq!(json["stackPosition"], 0);
        assert_eq!(json["category"], "motor");
        assert_eq!(json["status"], "typical");
        assert_eq!(json["isCustom"], false);
    }

    #[test]
    fn unplaced_milestone_omits_optional_fields() {
        let m = Milestone::new("walking", "Walking", Category::Motor, 12);
        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("actualAge").is_none());
        assert!(json.get("stackPosition").is_none());
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn description_depends_on_custom_flag() {
        let m = Milestone::new("walking", "Walking", Category::Motor, 12);
        assert_eq!(m.description(), "Expected at 12 months");
        let c = Milestone::new_custom_concern("Toe walking");
        assert_eq!(c.description(), "Custom milestone");
    }
}
