use serde::{Deserialize, Serialize};

use crate::model::Milestone;

/// Layout rules for stacking markers that land at similar ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackLayout {
    /// Markers closer than this many months may collide visually.
    pub overlap_months: u32,
    /// Hard cap on the number of rows.
    pub max_rows: u32,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            overlap_months: 3,
            max_rows: 7,
        }
    }
}

impl StackLayout {
    pub fn overlaps(&self, a: u32, b: u32) -> bool {
        a.abs_diff(b) < self.overlap_months
    }

    /// Pick a row for a milestone placed at `age`, given the rows already
    /// held by the other placed milestones.
    ///
    /// The lowest free row wins. When every row is taken by a nearby marker
    /// the row with the fewest nearby markers is reused, lowest index first.
    pub fn assign_row(&self, age: u32, occupants: impl IntoIterator<Item = (u32, u32)>) -> u32 {
        let rows = self.max_rows.max(1) as usize;
        let mut load = vec![0usize; rows];
        for (other_age, row) in occupants {
            if self.overlaps(age, other_age) {
                let row = (row as usize).min(rows - 1);
                load[row] += 1;
            }
        }

        if let Some(free) = load.iter().position(|&n| n == 0) {
            return free as u32;
        }

        let mut best = 0;
        for (row, &n) in load.iter().enumerate() {
            if n < load[best] {
                best = row;
            }
        }
        best as u32
    }

    /// Row for `milestones[index]` at `age`, considering every other placed
    /// milestone in collection order.
    pub fn assign_row_for(&self, milestones: &[Milestone], index: usize, age: u32) -> u32 {
        let occupants = milestones.iter().enumerate().filter_map(|(i, m)| {
            if i == index {
                return None;
            }
            match (m.actual_age, m.stack_position) {
                (Some(a), Some(row)) => Some((a, row)),
                _ => None,
            }
        });
        self.assign_row(age, occupants)
    }
}
