use crate::app::MilestoneApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};
use milestone_timeline::engine::MAX_CONCERN_CHARS;

/// Render the "Add Concern" dialog.
pub fn show_add_concern_dialog(app: &mut MilestoneApp, ctx: &Context) {
    let mut should_close = false;
    let mut submit = false;

    Window::new(RichText::new("Add Concern").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            ui.label(RichText::new("Concern").color(theme::TEXT_SECONDARY));
            let edit = ui.add_sized(
                [ui.available_width(), 24.0],
                egui::TextEdit::singleline(&mut app.new_concern_text)
                    .hint_text("e.g. Echolalia")
                    .char_limit(MAX_CONCERN_CHARS),
            );
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            ui.label(
                RichText::new(format!(
                    "{}/{}",
                    app.new_concern_text.chars().count(),
                    MAX_CONCERN_CHARS
                ))
                .size(10.0)
                .color(theme::TEXT_DIM),
            );

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let can_add = !app.new_concern_text.trim().is_empty();
                let add_btn = egui::Button::new(RichText::new("Add").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_enabled(can_add, add_btn).clicked() {
                    submit = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if submit {
        app.create_concern_from_dialog();
        should_close = true;
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_add_concern = false;
        app.new_concern_text.clear();
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut MilestoneApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 200.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Milestone Timeline").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Developmental milestone tracker");
                ui.label("for clinical assessment intake.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
