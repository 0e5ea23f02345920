use crate::ui::theme;
use egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use milestone_timeline::engine::report::summary_records;
use milestone_timeline::MilestoneCollectionState;

/// Actions the history panel can request.
#[derive(Debug, Default)]
pub struct HistoryAction {
    pub history_changed: Option<String>,
    pub include_changed: Option<bool>,
    pub recapture: bool,
}

/// Render the history narrative, report toggle and placed-milestone summary.
pub fn show_history_panel(
    state: &MilestoneCollectionState,
    history_draft: &mut String,
    ui: &mut Ui,
) -> HistoryAction {
    let mut action = HistoryAction::default();

    ui.add_space(6.0);
    ui.label(
        RichText::new("Developmental History")
            .strong()
            .size(13.0)
            .color(theme::TEXT_PRIMARY),
    );
    ui.add_space(4.0);

    ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
    let edit = ui.add(
        egui::TextEdit::multiline(history_draft)
            .hint_text("Pregnancy, birth, early development, family history…")
            .desired_rows(5)
            .desired_width(f32::INFINITY),
    );
    if edit.changed() {
        action.history_changed = Some(history_draft.clone());
    }

    ui.add_space(6.0);
    let mut include = state.include_timeline_in_report;
    if ui
        .checkbox(&mut include, "Include timeline in report")
        .changed()
    {
        action.include_changed = Some(include);
    }

    if state.include_timeline_in_report {
        ui.horizontal(|ui| {
            let image_label = if state.timeline_image.is_some() {
                "Snapshot attached"
            } else {
                "No snapshot yet"
            };
            ui.label(RichText::new(image_label).size(10.5).color(theme::TEXT_SECONDARY));
            if ui
                .small_button(format!("{} Recapture", egui_phosphor::regular::CAMERA))
                .clicked()
            {
                action.recapture = true;
            }
        });
    }

    ui.add_space(4.0);
    ui.separator();
    ui.label(
        RichText::new("Placed Milestones")
            .size(10.0)
            .color(theme::TEXT_DIM)
            .strong(),
    );

    let records = summary_records(&state.milestones);
    if records.is_empty() {
        ui.label(RichText::new("None yet").size(11.0).color(theme::TEXT_DIM));
        return action;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(100.0).clip(true))
        .column(Column::exact(52.0))
        .column(Column::exact(44.0))
        .column(Column::exact(60.0))
        .header(18.0, |mut header| {
            for title in ["Milestone", "Expected", "Actual", "Status"] {
                header.col(|ui| {
                    ui.label(RichText::new(title).size(9.5).strong().color(theme::TEXT_DIM));
                });
            }
        })
        .body(|mut body| {
            for record in &records {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(RichText::new(&record.title).size(11.0));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&record.expected).size(11.0));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(record.actual.to_string()).size(11.0));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&record.status).size(11.0));
                    });
                });
            }
        });

    action
}
