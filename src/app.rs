use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use egui::{Id, LayerId, Order, Pos2, Rect, Stroke};
use milestone_timeline::config::Settings;
use milestone_timeline::engine::snapshot::Unavailable;
use milestone_timeline::engine::{
    DragGesture, DragSource, DropOutcome, DropTargets, MilestoneEngine, SnapshotError,
};
use milestone_timeline::io::{self, SessionStore};
use milestone_timeline::{MilestoneCollectionState, TimelineAxis};

use crate::ui;
use crate::ui::capture::ScreenCapture;

const CAPTURE_TIMEOUT: Duration = Duration::from_secs(2);

/// Progress of a timeline snapshot for the report.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CaptureState {
    Idle,
    /// Labels are expanded this frame; the screenshot is requested after drawing.
    Preparing,
    /// Waiting for the screenshot event.
    Waiting {
        since: Instant,
        region: Rect,
        revision: u64,
    },
}

/// Main application state.
pub struct MilestoneApp {
    pub engine: MilestoneEngine,
    pub axis: TimelineAxis,
    store: SessionStore,
    save_error: Rc<RefCell<Option<String>>>,
    stack_rows: u32,

    // Drag state
    drag: Option<DragGesture>,

    // Snapshot capture
    capture: CaptureState,

    // View state
    pub expand_labels: bool,
    history_draft: String,

    // Dialog state
    pub show_add_concern: bool,
    pub show_about: bool,
    pub new_concern_text: String,

    // Status message
    pub status_message: String,
}

impl MilestoneApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let store = match SessionStore::open(settings.persistence.session_file.as_deref()) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to a session file in the working directory");
                SessionStore::new("session.json")
            }
        };

        let mut status_message = "Ready".to_string();
        let data = match store.load() {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %store.path().display(), error = %e, "could not load session");
                status_message = format!("Could not load session: {}", e);
                None
            }
        };

        let save_error = Rc::new(RefCell::new(None));
        let engine = MilestoneEngine::new(
            data,
            settings.engine(),
            Self::store_writer(store.clone(), Rc::clone(&save_error)),
        );
        let history_draft = engine.state().history.clone();

        Self {
            engine,
            axis: settings.axis(),
            store,
            save_error,
            stack_rows: settings.timeline.stacking.max_rows,
            drag: None,
            capture: CaptureState::Idle,
            expand_labels: false,
            history_draft,
            show_add_concern: false,
            show_about: false,
            new_concern_text: String::new(),
            status_message,
        }
    }

    /// The engine's change listener: write every emitted snapshot to disk.
    fn store_writer(
        store: SessionStore,
        save_error: Rc<RefCell<Option<String>>>,
    ) -> Box<dyn FnMut(&MilestoneCollectionState)> {
        Box::new(move |state: &MilestoneCollectionState| {
            if let Err(e) = store.save(state) {
                tracing::warn!(path = %store.path().display(), error = %e, "session write failed");
                *save_error.borrow_mut() = Some(e.to_string());
            }
        })
    }

    // --- Session operations ---

    pub fn new_session(&mut self) {
        let confirm = rfd::MessageDialog::new()
            .set_title("New Session")
            .set_description("This clears every placed milestone and the history. Continue?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        if confirm != rfd::MessageDialogResult::Yes {
            return;
        }

        if let Err(e) = self.store.clear() {
            self.status_message = format!("Could not clear session: {}", e);
            return;
        }
        self.engine.reset();
        self.history_draft.clear();
        self.drag = None;
        self.capture = CaptureState::Idle;
        self.status_message = "New session started".to_string();
    }

    pub fn save_now(&mut self) {
        if self.engine.flush_now() {
            self.status_message = "Session saved".to_string();
        } else {
            self.status_message = "Nothing to save".to_string();
        }
    }

    pub fn export_csv(&mut self) {
        if self.engine.state().placed().next().is_none() {
            self.status_message = "Nothing to export — no milestones placed".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("milestones.csv")
            .save_file()
        {
            match io::export_csv(&self.engine.state().milestones, &path) {
                Ok(count) => {
                    self.status_message = format!("Exported {} milestones to CSV", count);
                }
                Err(e) => {
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    pub fn copy_report_summary(&mut self, ctx: &egui::Context) {
        let summary =
            milestone_timeline::engine::report::timeline_summary(&self.engine.state().milestones);
        if summary.is_empty() {
            self.status_message = "Nothing to copy — no milestones placed".to_string();
            return;
        }
        ctx.copy_text(summary);
        self.status_message = "Report summary copied".to_string();
    }

    pub fn open_data_folder(&mut self) {
        let Some(dir) = self.store.path().parent() else {
            return;
        };
        if let Err(e) = open::that(dir) {
            self.status_message = format!("Could not open {}: {}", dir.display(), e);
        }
    }

    pub fn create_concern_from_dialog(&mut self) {
        match self.engine.add_custom_concern(&self.new_concern_text) {
            Some(_) => {
                self.status_message = format!("Added concern '{}'", self.new_concern_text.trim());
            }
            None => {
                self.status_message = "Concern text is empty".to_string();
            }
        }
        self.new_concern_text.clear();
    }

    // --- Drag handling ---

    fn start_drag(&mut self, id: String, source: DragSource, origin: Pos2) {
        // The capture frame draws a fitted axis, so drags wait for it.
        if self.drag.is_none() && self.capture == CaptureState::Idle {
            self.drag = Some(DragGesture::start(id, source, origin));
        }
    }

    /// Advance the current drag; commits only when the pointer is released.
    fn update_drag(&mut self, ctx: &egui::Context, targets: &DropTargets) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.drag = None;
            self.status_message = "Drag cancelled".to_string();
            return;
        }

        let pointer = ctx.input(|i| i.pointer.interact_pos());
        if let Some(pos) = pointer {
            drag.move_to(pos, &self.axis, targets);
        }
        draw_drag_ghost(ctx, drag, &self.engine);

        if !ctx.input(|i| i.pointer.any_released()) {
            return;
        }
        let Some(drag) = self.drag.take() else {
            return;
        };
        let release = pointer.unwrap_or(drag.pointer());
        match drag.finish(release, &self.axis, targets) {
            DropOutcome::Place { id, month } => {
                if self.engine.place_milestone(&id, month) {
                    if let Some(m) = self.engine.milestone(&id) {
                        self.status_message = format!(
                            "Placed '{}' at {} months ({})",
                            m.title,
                            month,
                            m.status.label()
                        );
                    }
                }
            }
            DropOutcome::Unplace { id } => {
                if self.engine.unplace_milestone(&id) {
                    self.status_message = "Milestone removed from timeline".to_string();
                }
            }
            DropOutcome::Cancel => {}
        }
    }

    // --- Snapshot capture ---

    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        let shot: Option<Arc<egui::ColorImage>> = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                _ => None,
            })
        });

        if let CaptureState::Waiting {
            since,
            region,
            revision,
        } = self.capture
        {
            if let Some(image) = shot {
                let mut capture = ScreenCapture::new(image, region, ctx.pixels_per_point());
                self.engine.export_captured_snapshot(&mut capture, revision);
                self.capture = CaptureState::Idle;
                self.status_message = if self.engine.state().timeline_image.is_some() {
                    "Timeline snapshot attached to report".to_string()
                } else {
                    "Timeline snapshot failed".to_string()
                };
            } else if since.elapsed() > CAPTURE_TIMEOUT {
                let mut unavailable = Unavailable(SnapshotError::TimedOut);
                self.engine
                    .export_captured_snapshot(&mut unavailable, revision);
                self.capture = CaptureState::Idle;
                self.status_message = "Timeline snapshot timed out".to_string();
            } else {
                ctx.request_repaint();
            }
        }

        if self.capture == CaptureState::Idle && self.drag.is_none() && self.engine.needs_snapshot()
        {
            self.capture = CaptureState::Preparing;
            ctx.request_repaint();
        }
    }

    fn request_screenshot(&mut self, ctx: &egui::Context, chart: &ui::timeline_chart::ChartOutput) {
        if self.capture != CaptureState::Preparing {
            return;
        }
        match chart.visible_rect {
            Some(region) if region.is_positive() => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot);
                self.capture = CaptureState::Waiting {
                    since: Instant::now(),
                    region,
                    revision: self.engine.timeline_revision(),
                };
            }
            _ => {
                self.engine
                    .export_snapshot(&mut Unavailable(SnapshotError::NotMounted));
                self.capture = CaptureState::Idle;
            }
        }
    }
}

fn draw_drag_ghost(ctx: &egui::Context, drag: &DragGesture, engine: &MilestoneEngine) {
    let Some(milestone) = engine.milestone(drag.milestone_id()) else {
        return;
    };
    let painter = ctx.layer_painter(LayerId::new(Order::Tooltip, Id::new("drag_ghost")));
    let pos = drag.pointer();
    painter.circle(
        pos,
        ui::theme::MARKER_RADIUS,
        ui::theme::category_color(milestone.category).gamma_multiply(0.8),
        Stroke::new(1.5, egui::Color32::WHITE),
    );
    let label = match drag.hovered_month() {
        Some(month) => format!("{} · {} mo", milestone.title, month),
        None => milestone.title.clone(),
    };
    painter.text(
        pos + egui::vec2(ui::theme::MARKER_RADIUS + 6.0, 0.0),
        egui::Align2::LEFT_CENTER,
        label,
        ui::theme::font_marker(),
        ui::theme::TEXT_PRIMARY,
    );
    ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
}

impl Drop for MilestoneApp {
    fn drop(&mut self) {
        self.engine.flush_now();
    }
}

impl eframe::App for MilestoneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_now();
        }

        self.handle_screenshot(ctx);

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        if let Some(err) = self.save_error.borrow_mut().take() {
            self.status_message = format!("Could not save session: {}", err);
        }
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let saved = if self.engine.has_pending_write() {
                            "Saving…"
                        } else {
                            "Saved"
                        };
                        ui.label(
                            egui::RichText::new(saved)
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(
                            egui::RichText::new(" · ")
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(
                            egui::RichText::new(format!(
                                "Zoom: {:.0} px/month",
                                self.axis.pixels_per_month
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: palette + history
        let dragging_id = self.drag.as_ref().map(|d| d.milestone_id().to_string());
        let mut palette_action = ui::milestone_palette::PaletteAction::None;
        let mut history_action = ui::history_panel::HistoryAction::default();
        let side = egui::SidePanel::left("milestone_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(ui::theme::SIDE_PANEL_WIDTH * 0.8)
            .max_width(ui::theme::SIDE_PANEL_WIDTH * 2.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                palette_action = ui::milestone_palette::show_milestone_palette(
                    &self.engine.state().milestones,
                    dragging_id.as_deref(),
                    ui,
                );
                ui.add_space(4.0);
                ui.separator();
                history_action = ui::history_panel::show_history_panel(
                    self.engine.state(),
                    &mut self.history_draft,
                    ui,
                );
            });

        match palette_action {
            ui::milestone_palette::PaletteAction::StartDrag(id, pos) => {
                self.start_drag(id, DragSource::Palette, pos);
            }
            ui::milestone_palette::PaletteAction::AddConcern => {
                self.show_add_concern = true;
            }
            ui::milestone_palette::PaletteAction::None => {}
        }
        if let Some(text) = history_action.history_changed {
            self.engine.set_history(text);
        }
        if let Some(include) = history_action.include_changed {
            self.engine.set_include_timeline_in_report(include);
            self.status_message = if include {
                "Timeline will be included in the report".to_string()
            } else {
                "Timeline removed from the report".to_string()
            };
        }
        if history_action.recapture && self.capture == CaptureState::Idle && self.drag.is_none()
        {
            self.capture = CaptureState::Preparing;
        }

        // Central panel: timeline
        let mode = if self.capture == CaptureState::Idle {
            ui::timeline_chart::ChartMode::Interactive {
                expand_labels: self.expand_labels,
            }
        } else {
            ui::timeline_chart::ChartMode::Capture
        };
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let chart = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| {
                ui::timeline_chart::show_timeline_chart(
                    &self.engine.state().milestones,
                    &mut self.axis,
                    self.stack_rows,
                    self.drag.as_ref(),
                    mode,
                    ui,
                )
            })
            .inner;

        if let Some((id, pos)) = chart.drag_started.clone() {
            self.start_drag(id, DragSource::Timeline, pos);
        }

        let targets = DropTargets {
            timeline: chart.axis_rect,
            palette: Some(side.response.rect),
        };
        self.update_drag(ctx, &targets);
        self.request_screenshot(ctx, &chart);

        // Dialogs
        if self.show_add_concern {
            ui::dialogs::show_add_concern_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }

        // Deferred session writes
        self.engine.flush_pending();
        if let Some(wait) = self.engine.time_until_flush() {
            ctx.request_repaint_after(wait);
        }
        if self.drag.is_some() {
            ctx.request_repaint();
        }
    }
}
