use egui::{Pos2, Rect};

use crate::model::TimelineAxis;

/// Where a drag began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Palette,
    Timeline,
}

/// Screen areas that accept a drop this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropTargets {
    /// Axis area; its left edge is month 0.
    pub timeline: Option<Rect>,
    /// Unplaced-milestone palette.
    pub palette: Option<Rect>,
}

/// What a finished drag commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Place { id: String, month: u32 },
    Unplace { id: String },
    Cancel,
}

/// Transient state of one drag from start to release.
///
/// Moves only update the hover indicator; nothing is committed until
/// [`DragGesture::finish`].
#[derive(Debug, Clone)]
pub struct DragGesture {
    milestone_id: String,
    source: DragSource,
    pointer: Pos2,
    hovered_month: Option<u32>,
}

impl DragGesture {
    pub fn start(milestone_id: impl Into<String>, source: DragSource, origin: Pos2) -> Self {
        let milestone_id = milestone_id.into();
        tracing::debug!(id = %milestone_id, ?source, "drag started");
        Self {
            milestone_id,
            source,
            pointer: origin,
            hovered_month: None,
        }
    }

    pub fn milestone_id(&self) -> &str {
        &self.milestone_id
    }

    pub fn pointer(&self) -> Pos2 {
        self.pointer
    }

    /// Month under the pointer while it is over the timeline.
    pub fn hovered_month(&self) -> Option<u32> {
        self.hovered_month
    }

    pub fn move_to(&mut self, pos: Pos2, axis: &TimelineAxis, targets: &DropTargets) {
        self.pointer = pos;
        self.hovered_month = month_at(pos, axis, targets);
    }

    pub fn finish(self, pos: Pos2, axis: &TimelineAxis, targets: &DropTargets) -> DropOutcome {
        let over_palette = targets.over_palette(pos);
        let outcome = if over_palette && self.source == DragSource::Timeline {
            DropOutcome::Unplace {
                id: self.milestone_id,
            }
        } else if let Some(month) = month_at(pos, axis, targets) {
            DropOutcome::Place {
                id: self.milestone_id,
                month,
            }
        } else {
            DropOutcome::Cancel
        };
        tracing::debug!(?outcome, "drag finished");
        outcome
    }
}

impl DropTargets {
    fn over_palette(&self, pos: Pos2) -> bool {
        self.palette.is_some_and(|rect| rect.contains(pos))
    }
}

/// Month under `pos`. The palette sits above a scrolled timeline, so a
/// pointer over it never maps to a month.
fn month_at(pos: Pos2, axis: &TimelineAxis, targets: &DropTargets) -> Option<u32> {
    let rect = targets.timeline?;
    if !rect.contains(pos) || targets.over_palette(pos) {
        return None;
    }
    Some(axis.x_to_month(pos.x - rect.left()))
}
