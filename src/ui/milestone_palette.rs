use crate::ui::theme;
use egui::{Color32, Pos2, RichText, Ui};
use milestone_timeline::{Category, Milestone};

/// Actions that the palette can request.
pub enum PaletteAction {
    None,
    StartDrag(String, Pos2),
    AddConcern,
}

/// Render the unplaced milestones, grouped by category.
pub fn show_milestone_palette(
    milestones: &[Milestone],
    dragging: Option<&str>,
    ui: &mut Ui,
) -> PaletteAction {
    let mut action = PaletteAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Milestones")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        let unplaced = milestones
            .iter()
            .filter(|m| !m.is_placed() && !m.is_sentinel())
            .count();
        ui.label(
            RichText::new(format!("({} to place)", unplaced))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.label(
        RichText::new("Drag onto the timeline · drag a marker back here to remove it")
            .font(theme::font_sub())
            .color(theme::TEXT_DIM),
    );
    ui.add_space(4.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("palette_scroll")
        .max_height(ui.available_height() * 0.55)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for category in Category::all() {
                let items: Vec<&Milestone> = milestones
                    .iter()
                    .filter(|m| m.category == *category && !m.is_placed())
                    .collect();

                egui::CollapsingHeader::new(
                    RichText::new(category.label())
                        .strong()
                        .color(theme::category_color(*category)),
                )
                .id_salt(("palette", category.label()))
                .default_open(true)
                .show(ui, |ui| {
                    for milestone in items {
                        if milestone.is_sentinel() {
                            let btn = egui::Button::new(
                                RichText::new(format!(
                                    "{}  Add concern",
                                    egui_phosphor::regular::PLUS
                                ))
                                .color(Color32::WHITE)
                                .size(12.0),
                            )
                            .fill(theme::ACCENT)
                            .rounding(egui::Rounding::same(5.0));
                            if ui.add_sized([ui.available_width(), 26.0], btn).clicked() {
                                action = PaletteAction::AddConcern;
                            }
                            continue;
                        }

                        if let Some((id, pos)) =
                            show_chip(milestone, dragging == Some(milestone.id.as_str()), ui)
                        {
                            action = PaletteAction::StartDrag(id, pos);
                        }
                    }
                });
            }
        });

    action
}

fn show_chip(milestone: &Milestone, is_dragged: bool, ui: &mut Ui) -> Option<(String, Pos2)> {
    let frame = egui::Frame {
        fill: if is_dragged {
            theme::BG_SELECTED
        } else {
            theme::BG_DARK
        },
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::symmetric(6.0, 4.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(
            1.0,
            if is_dragged {
                theme::BORDER_ACCENT
            } else {
                theme::BORDER_SUBTLE
            },
        ),
        shadow: egui::epaint::Shadow::NONE,
    };

    let frame_resp = frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            let (dot_rect, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
            ui.painter().circle_filled(
                dot_rect.center(),
                4.0,
                theme::category_color(milestone.category),
            );
            ui.add(
                egui::Label::new(RichText::new(&milestone.title).size(12.0).color(theme::TEXT_PRIMARY))
                    .truncate(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let age = if milestone.is_age_referenced() {
                    format!("{} mo", milestone.expected_age)
                } else {
                    "—".to_string()
                };
                ui.label(RichText::new(age).size(10.0).color(theme::TEXT_SECONDARY));
            });
        });
    });

    let chip_rect = frame_resp.response.rect;
    let chip = ui.interact(
        chip_rect,
        egui::Id::new(("palette-chip", milestone.id.as_str())),
        egui::Sense::drag(),
    );
    ui.add_space(1.0);

    if chip.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    }
    if chip.drag_started() {
        let pos = chip.interact_pointer_pos().unwrap_or(chip_rect.center());
        return Some((milestone.id.clone(), pos));
    }
    None
}
