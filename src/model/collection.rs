use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::default_milestones;
use super::milestone::Milestone;

/// The serializable snapshot exchanged with the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneCollectionState {
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub history: String,
    #[serde(default)]
    pub include_timeline_in_report: bool,
    /// PNG snapshot as a `data:image/png;base64,` URL.
    #[serde(default)]
    pub timeline_image: Option<String>,
    /// Flattened `||`-separated summary of placed milestones.
    #[serde(default)]
    pub milestone_timeline_data: Option<String>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Default for MilestoneCollectionState {
    fn default() -> Self {
        Self {
            milestones: default_milestones(),
            history: String::new(),
            include_timeline_in_report: false,
            timeline_image: None,
            milestone_timeline_data: None,
            last_updated: Utc::now(),
        }
    }
}

impl MilestoneCollectionState {
    /// Touch the last-updated timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = now;
    }

    pub fn find(&self, id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Placed milestones in collection order.
    pub fn placed(&self) -> impl Iterator<Item = &Milestone> {
        self.milestones.iter().filter(|m| m.is_placed())
    }

    pub fn sentinel_index(&self) -> Option<usize> {
        self.milestones.iter().position(|m| m.is_sentinel())
    }

    /// Drop the derived report artifacts.
    pub fn clear_artifacts(&mut self) {
        self.timeline_image = None;
        self.milestone_timeline_data = None;
    }
}
