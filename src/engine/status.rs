use serde::{Deserialize, Serialize};

use crate::model::MilestoneStatus;

/// Upper bounds (in months past the expected age) of the typical and
/// monitor bands. Anything beyond `monitor_max` is delayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    pub typical_max: i64,
    pub monitor_max: i64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl StatusThresholds {
    /// `<= 2` typical, `<= 6` monitor.
    pub const STANDARD: StatusThresholds = StatusThresholds {
        typical_max: 2,
        monitor_max: 6,
    };

    /// Stricter variant: `<= 1` typical, `<= 3` monitor.
    pub const STRICT: StatusThresholds = StatusThresholds {
        typical_max: 1,
        monitor_max: 3,
    };
}

/// Classify a milestone from its ages. Unreferenced milestones
/// (`expected_age == 0`) are never flagged once placed.
pub fn derive_status(
    actual_age: Option<u32>,
    expected_age: u32,
    thresholds: &StatusThresholds,
) -> MilestoneStatus {
    let Some(actual) = actual_age else {
        return MilestoneStatus::Pending;
    };
    if expected_age == 0 {
        return MilestoneStatus::Typical;
    }

    let difference = i64::from(actual) - i64::from(expected_age);
    if difference <= thresholds.typical_max {
        MilestoneStatus::Typical
    } else if difference <= thresholds.monitor_max {
        MilestoneStatus::Monitor
    } else {
        MilestoneStatus::Delayed
    }
}
