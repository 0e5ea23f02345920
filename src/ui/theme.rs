use egui::{Color32, FontId, Rounding, Stroke, Visuals};
use milestone_timeline::{Category, MilestoneStatus};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_FIELD: Color32 = Color32::from_rgb(20, 20, 28);
pub const BG_ROW_EVEN: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 6);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(90, 140, 220);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const HOVER_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const GRID_LINE_MAJOR: Color32 = Color32::from_rgb(62, 65, 80);
pub const AXIS_LINE: Color32 = Color32::from_rgb(120, 125, 145);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const ROW_HEIGHT: f32 = 34.0;
pub const HEADER_HEIGHT: f32 = 44.0;
pub const AXIS_PADDING: f32 = 24.0; // left/right margin around month 0 and max age
pub const MARKER_RADIUS: f32 = 7.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;
pub const SIDE_PANEL_WIDTH: f32 = 300.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_marker() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

// ── Semantic colors ──────────────────────────────────────────────────────────

pub fn status_color(status: MilestoneStatus) -> Color32 {
    match status {
        MilestoneStatus::Typical => Color32::from_rgb(52, 168, 83),
        MilestoneStatus::Monitor => Color32::from_rgb(251, 188, 5),
        MilestoneStatus::Delayed => Color32::from_rgb(229, 57, 53),
        MilestoneStatus::Pending => Color32::from_rgb(120, 124, 140),
    }
}

pub fn category_color(category: Category) -> Color32 {
    match category {
        Category::Communication => Color32::from_rgb(66, 133, 244),
        Category::Motor => Color32::from_rgb(0, 188, 212),
        Category::Social => Color32::from_rgb(171, 71, 188),
        Category::Concerns => Color32::from_rgb(251, 140, 0),
    }
}

// ── Visuals ──────────────────────────────────────────────────────────────────

fn widget_state(
    visuals: &mut egui::style::WidgetVisuals,
    fill: Color32,
    border: Color32,
    text: Color32,
) {
    visuals.bg_fill = fill;
    visuals.weak_bg_fill = fill;
    visuals.bg_stroke = Stroke::new(1.0, border);
    visuals.fg_stroke = Stroke::new(1.0, text);
    visuals.rounding = Rounding::same(4.0);
}

/// Install the dark clinical theme. Called once at startup.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_HEADER;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.faint_bg_color = BG_ROW_EVEN;
    visuals.striped = true;

    let w = &mut visuals.widgets;
    widget_state(&mut w.noninteractive, BG_PANEL, BORDER_SUBTLE, TEXT_SECONDARY);
    widget_state(&mut w.inactive, BG_HEADER, BORDER_SUBTLE, TEXT_PRIMARY);
    widget_state(&mut w.hovered, GRID_LINE_MAJOR, ACCENT, TEXT_PRIMARY);
    widget_state(&mut w.active, GRID_LINE_MAJOR, BORDER_ACCENT, Color32::WHITE);

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    ctx.set_visuals(visuals);
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(6.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 3.0);
    });
}
