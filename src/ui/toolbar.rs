use crate::app::MilestoneApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut MilestoneApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  New Session").clicked() {
                app.new_session();
                ui.close_menu();
            }
            if ui.button("  Save Now          Ctrl+S").clicked() {
                app.save_now();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
            if ui.button("  Copy Report Summary").clicked() {
                app.copy_report_summary(ui.ctx());
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Open Data Folder").clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.axis.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.axis.zoom_out();
                ui.close_menu();
            }
            ui.separator();
            ui.checkbox(&mut app.expand_labels, "Show every month label");
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let state = app.engine.state();
            let total = state.milestones.iter().filter(|m| !m.is_sentinel()).count();
            let placed = state.placed().count();
            ui.label(
                RichText::new(format!("{} of {} placed", placed, total))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
