//! The milestone timeline engine.
//!
//! [`MilestoneEngine`] owns the collection snapshot. Every mutation goes
//! through its operations, which re-derive status and stack rows, stamp
//! `lastUpdated` and hand the new snapshot to the `on_change` callback
//! through a [`DebouncedWriter`].

pub mod clock;
pub mod gesture;
pub mod report;
pub mod snapshot;
pub mod stacking;
pub mod status;
pub mod writer;

use std::collections::HashSet;
use std::time::Duration;

use crate::model::catalog::default_milestones;
use crate::model::milestone::ADD_CONCERN_ID;
use crate::model::timeline::DEFAULT_MAX_AGE;
use crate::model::{Milestone, MilestoneCollectionState, MilestoneStatus};

pub use clock::{Clock, SystemClock};
pub use gesture::{DragGesture, DragSource, DropOutcome, DropTargets};
pub use snapshot::{SnapshotError, SnapshotRenderer, TimelineImage};
pub use stacking::StackLayout;
pub use status::{derive_status, StatusThresholds};
pub use writer::DebouncedWriter;

/// Longest accepted custom-concern title, in characters.
pub const MAX_CONCERN_CHARS: usize = 50;

/// Callback receiving every emitted snapshot.
pub type ChangeListener = Box<dyn FnMut(&MilestoneCollectionState)>;

/// Tunables for an engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub thresholds: StatusThresholds,
    pub layout: StackLayout,
    pub max_age: u32,
    pub min_write_interval: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            thresholds: StatusThresholds::default(),
            layout: StackLayout::default(),
            max_age: DEFAULT_MAX_AGE,
            min_write_interval: Duration::from_secs(1),
        }
    }
}

pub struct MilestoneEngine {
    state: MilestoneCollectionState,
    settings: EngineSettings,
    writer: DebouncedWriter,
    clock: Box<dyn Clock>,
    on_change: ChangeListener,
    snapshot_stale: bool,
    /// Bumped whenever the rendered timeline changes.
    timeline_revision: u64,
}

impl MilestoneEngine {
    /// Build an engine from persisted data, falling back to the default
    /// catalog when there is none.
    pub fn new(
        data: Option<MilestoneCollectionState>,
        settings: EngineSettings,
        on_change: ChangeListener,
    ) -> Self {
        Self::with_clock(data, settings, on_change, Box::new(SystemClock))
    }

    pub fn with_clock(
        data: Option<MilestoneCollectionState>,
        settings: EngineSettings,
        on_change: ChangeListener,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut state = match data {
            Some(state) if !state.milestones.is_empty() => state,
            _ => {
                tracing::info!("starting from the default milestone catalog");
                MilestoneCollectionState {
                    last_updated: clock.utc_now(),
                    ..MilestoneCollectionState::default()
                }
            }
        };
        normalize(&mut state, &settings);
        let snapshot_stale = state.include_timeline_in_report && state.timeline_image.is_none();

        Self {
            state,
            writer: DebouncedWriter::new(settings.min_write_interval),
            settings,
            clock,
            on_change,
            snapshot_stale,
            timeline_revision: 0,
        }
    }

    /// Read-only view of the current snapshot.
    pub fn state(&self) -> &MilestoneCollectionState {
        &self.state
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn milestone(&self, id: &str) -> Option<&Milestone> {
        self.state.find(id)
    }

    // --- Operations ---

    /// Record that `id` was achieved at `month`. Unknown ids and the
    /// add-concern sentinel are ignored. Returns whether anything changed.
    pub fn place_milestone(&mut self, id: &str, month: u32) -> bool {
        let Some(index) = self.placeable_index(id) else {
            return false;
        };
        let month = if month > self.settings.max_age {
            tracing::debug!(id, month, max_age = self.settings.max_age, "clamping placement");
            self.settings.max_age
        } else {
            month
        };

        let row = self
            .settings
            .layout
            .assign_row_for(&self.state.milestones, index, month);
        let thresholds = self.settings.thresholds;
        let milestone = &mut self.state.milestones[index];
        milestone.actual_age = Some(month);
        milestone.stack_position = Some(row);
        milestone.status = derive_status(Some(month), milestone.expected_age, &thresholds);
        tracing::debug!(
            id,
            month,
            row,
            status = %milestone.status,
            "milestone placed"
        );

        self.milestones_changed();
        true
    }

    /// Take a milestone off the timeline.
    pub fn unplace_milestone(&mut self, id: &str) -> bool {
        let Some(index) = self.placeable_index(id) else {
            return false;
        };
        let milestone = &mut self.state.milestones[index];
        if !milestone.is_placed() {
            return false;
        }
        milestone.actual_age = None;
        milestone.stack_position = None;
        milestone.status = MilestoneStatus::Pending;
        tracing::debug!(id, "milestone unplaced");

        self.milestones_changed();
        true
    }

    /// Add a clinician-entered concern just before the sentinel. Returns the
    /// new id, or `None` for blank text.
    pub fn add_custom_concern(&mut self, text: &str) -> Option<String> {
        let title: String = text.trim().chars().take(MAX_CONCERN_CHARS).collect();
        let title = title.trim_end().to_string();
        if title.is_empty() {
            tracing::debug!("ignoring blank custom concern");
            return None;
        }

        let milestone = Milestone::new_custom_concern(title);
        let id = milestone.id.clone();
        let at = self
            .state
            .sentinel_index()
            .unwrap_or(self.state.milestones.len());
        self.state.milestones.insert(at, milestone);
        tracing::info!(id = %id, "custom concern added");

        self.milestones_changed();
        Some(id)
    }

    pub fn set_history(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.state.history == text {
            return;
        }
        self.state.history = text;
        self.commit();
    }

    /// Toggle embedding of the timeline in the generated report. Turning it
    /// off clears both artifacts; turning it on refreshes the summary and
    /// marks the image for capture.
    pub fn set_include_timeline_in_report(&mut self, include: bool) {
        if self.state.include_timeline_in_report == include {
            return;
        }
        self.state.include_timeline_in_report = include;
        if include {
            self.refresh_summary();
            self.mark_snapshot_stale();
        } else {
            self.state.clear_artifacts();
            self.snapshot_stale = false;
        }
        self.commit();
    }

    /// Whether the host should capture a fresh timeline image.
    pub fn needs_snapshot(&self) -> bool {
        self.state.include_timeline_in_report && self.snapshot_stale
    }

    /// Identifies the timeline as currently drawn. Hosts that capture
    /// asynchronously record it when the capture is requested.
    pub fn timeline_revision(&self) -> u64 {
        self.timeline_revision
    }

    /// Capture the timeline through `renderer` and store both report
    /// artifacts. Render and encode failures leave the image empty but the
    /// summary is still written.
    pub fn export_snapshot(&mut self, renderer: &mut dyn SnapshotRenderer) {
        let revision = self.timeline_revision;
        self.export_captured_snapshot(renderer, revision);
    }

    /// Like [`export_snapshot`](Self::export_snapshot) for pixels captured
    /// at `captured_at`. If the timeline changed since then the image is
    /// stored but a fresh capture is still requested.
    pub fn export_captured_snapshot(
        &mut self,
        renderer: &mut dyn SnapshotRenderer,
        captured_at: u64,
    ) {
        self.snapshot_stale = false;
        if !self.state.include_timeline_in_report {
            self.state.clear_artifacts();
            self.commit();
            return;
        }

        self.refresh_summary();
        self.state.timeline_image = match renderer.capture_timeline_snapshot() {
            Ok(image) => match image.to_png_data_url() {
                Ok(url) => {
                    tracing::info!(
                        width = image.width,
                        height = image.height,
                        "timeline snapshot captured"
                    );
                    Some(url)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode timeline snapshot");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to capture timeline snapshot");
                None
            }
        };
        if captured_at != self.timeline_revision {
            tracing::debug!(captured_at, current = self.timeline_revision, "snapshot outdated");
            self.snapshot_stale = true;
        }
        self.commit();
    }

    /// Replace the session with a fresh default catalog.
    pub fn reset(&mut self) {
        self.state = MilestoneCollectionState {
            milestones: default_milestones(),
            last_updated: self.clock.utc_now(),
            ..MilestoneCollectionState::default()
        };
        self.snapshot_stale = false;
        self.timeline_revision += 1;
        tracing::info!("milestone session reset");
        self.commit();
    }

    // --- Write-through ---

    /// Emit a deferred write if its interval has elapsed. Call once per frame.
    pub fn flush_pending(&mut self) -> bool {
        let now = self.clock.now();
        if self.writer.poll(now) {
            self.emit();
            true
        } else {
            false
        }
    }

    /// Emit a deferred write immediately (on save shortcut or exit).
    pub fn flush_now(&mut self) -> bool {
        let now = self.clock.now();
        if self.writer.take_pending(now) {
            self.emit();
            true
        } else {
            false
        }
    }

    /// How long until a deferred write becomes due.
    pub fn time_until_flush(&self) -> Option<Duration> {
        self.writer.time_until_due(self.clock.now())
    }

    pub fn has_pending_write(&self) -> bool {
        self.writer.is_pending()
    }

    // --- Internals ---

    fn placeable_index(&self, id: &str) -> Option<usize> {
        if id == ADD_CONCERN_ID {
            tracing::debug!(id, "sentinel cannot be placed");
            return None;
        }
        let index = self.state.milestones.iter().position(|m| m.id == id);
        if index.is_none() {
            tracing::debug!(id, "no milestone with this id");
        }
        index
    }

    fn milestones_changed(&mut self) {
        if self.state.include_timeline_in_report {
            self.refresh_summary();
            self.mark_snapshot_stale();
        }
        self.commit();
    }

    fn mark_snapshot_stale(&mut self) {
        self.snapshot_stale = true;
        self.timeline_revision += 1;
    }

    fn refresh_summary(&mut self) {
        self.state.milestone_timeline_data = Some(report::timeline_summary(&self.state.milestones));
    }

    fn commit(&mut self) {
        self.state.touch(self.clock.utc_now());
        if self.writer.request(self.clock.now()) {
            self.emit();
        }
    }

    fn emit(&mut self) {
        (self.on_change)(&self.state);
    }
}

/// Bring loaded data back in line with the collection invariants.
pub fn normalize(state: &mut MilestoneCollectionState, settings: &EngineSettings) {
    let mut seen = HashSet::new();
    state.milestones.retain(|m| {
        let fresh = seen.insert(m.id.clone());
        if !fresh {
            tracing::warn!(id = %m.id, "dropping duplicate milestone");
        }
        fresh
    });
    if state.sentinel_index().is_none() {
        state.milestones.push(Milestone::add_concern_sentinel());
    }

    let max_rows = settings.layout.max_rows.max(1);
    for index in 0..state.milestones.len() {
        let milestone = &mut state.milestones[index];
        if milestone.is_sentinel() {
            let sentinel = Milestone::add_concern_sentinel();
            if *milestone != sentinel {
                tracing::warn!("restoring altered add-concern entry");
                *milestone = sentinel;
            }
            continue;
        }
        if milestone.stack_position.is_some_and(|row| row >= max_rows) {
            milestone.stack_position = None;
        }
        if let Some(age) = milestone.actual_age {
            milestone.actual_age = Some(age.min(settings.max_age));
        } else {
            milestone.stack_position = None;
        }
        milestone.status = derive_status(
            milestone.actual_age,
            milestone.expected_age,
            &settings.thresholds,
        );

        if let (Some(age), None) = (milestone.actual_age, milestone.stack_position) {
            let row = settings.layout.assign_row_for(&state.milestones, index, age);
            state.milestones[index].stack_position = Some(row);
        }
    }

    if !state.include_timeline_in_report {
        state.clear_artifacts();
    }
}
