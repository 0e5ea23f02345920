use crate::ui::theme;
use egui::{Align2, Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use milestone_timeline::engine::DragGesture;
use milestone_timeline::{Milestone, TimelineAxis};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const PADDING: f32 = theme::AXIS_PADDING;
const RADIUS: f32 = theme::MARKER_RADIUS;

/// What the chart reports back to the app this frame.
#[derive(Debug, Clone, Default)]
pub struct ChartOutput {
    /// Drop target; its left edge is month 0.
    pub axis_rect: Option<Rect>,
    /// Visible part of the chart, used as the snapshot region.
    pub visible_rect: Option<Rect>,
    /// A placed marker started dragging: (milestone id, pointer position).
    pub drag_started: Option<(String, Pos2)>,
}

/// How the chart is drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    Interactive { expand_labels: bool },
    /// Whole axis fitted to the panel with every label, for the report image.
    Capture,
}

/// Render the milestone timeline (central panel).
pub fn show_timeline_chart(
    milestones: &[Milestone],
    axis: &mut TimelineAxis,
    rows: u32,
    drag: Option<&DragGesture>,
    mode: ChartMode,
    ui: &mut Ui,
) -> ChartOutput {
    let mut output = ChartOutput::default();
    let available = ui.available_size();

    // Capture draws a temporary axis; the user's zoom is left alone.
    let mut fitted;
    let (axis, expand_labels, scroll_id) = match mode {
        ChartMode::Interactive { expand_labels } => (axis, expand_labels, "timeline_scroll"),
        ChartMode::Capture => {
            fitted = axis.fitted_to(available.x - PADDING * 2.0);
            (&mut fitted, true, "timeline_capture")
        }
    };
    let chart_width = (axis.total_width() + PADDING * 2.0).max(available.x);
    let chart_height = HEADER_HEIGHT + rows.max(1) as f32 * ROW_HEIGHT + 40.0;

    // Ctrl + scroll wheel zooms
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            axis.zoom_in();
        } else if scroll_delta.y < 0.0 {
            axis.zoom_out();
        }
    }

    egui::ScrollArea::horizontal()
        .id_salt(scroll_id)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::hover(),
            );
            let origin = response.rect.min;
            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            let axis_rect = Rect::from_min_size(
                Pos2::new(origin.x + PADDING, origin.y),
                Vec2::new(axis.total_width(), response.rect.height()),
            );
            output.axis_rect = Some(axis_rect);
            output.visible_rect = Some(response.rect.intersect(ui.clip_rect()));

            draw_month_header(&painter, axis_rect, axis, chart_width, expand_labels);
            draw_row_bands(&painter, origin, chart_width, rows);

            if let Some(month) = drag.and_then(|d| d.hovered_month()) {
                draw_hover_line(&painter, axis_rect, axis, month);
            }

            let dragged_id = drag.map(|d| d.milestone_id());
            for milestone in milestones.iter().filter(|m| m.is_placed()) {
                let is_dragged = dragged_id == Some(milestone.id.as_str());
                let marker_rect =
                    draw_marker(&painter, axis_rect, axis, milestone, is_dragged);

                let marker_response = ui.interact(
                    marker_rect,
                    ui.make_persistent_id(("marker", milestone.id.as_str())),
                    Sense::drag(),
                );

                if marker_response.drag_started() {
                    let ptr = marker_response
                        .interact_pointer_pos()
                        .unwrap_or(marker_rect.center());
                    output.drag_started = Some((milestone.id.clone(), ptr));
                }

                if marker_response.hovered() && drag.is_none() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("marker-tip", milestone.id.as_str())),
                        |ui| marker_tooltip(milestone, ui),
                    );
                }
            }

            if milestones.iter().all(|m| !m.is_placed()) {
                painter.text(
                    Pos2::new(response.rect.center().x, origin.y + HEADER_HEIGHT + ROW_HEIGHT),
                    Align2::CENTER_CENTER,
                    "Drag milestones from the left panel onto the timeline",
                    theme::font_header(),
                    theme::TEXT_DIM,
                );
            }
        });

    output
}

fn marker_tooltip(milestone: &Milestone, ui: &mut Ui) {
    ui.strong(&milestone.title);
    ui.label(
        egui::RichText::new(milestone.category.label())
            .color(theme::category_color(milestone.category)),
    );
    if milestone.is_age_referenced() {
        ui.label(milestone.description());
    }
    if let Some(actual) = milestone.actual_age {
        if milestone.is_age_referenced() {
            let diff = i64::from(actual) - i64::from(milestone.expected_age);
            ui.label(format!("Achieved at {} months ({:+} months)", actual, diff));
        } else {
            ui.label(format!("Noted at {} months", actual));
        }
    }
    ui.label(
        egui::RichText::new(milestone.status.label())
            .strong()
            .color(theme::status_color(milestone.status)),
    );
}

fn month_x(axis_rect: Rect, axis: &TimelineAxis, month: u32) -> f32 {
    axis_rect.left() + axis.month_to_x(month)
}

fn draw_month_header(
    painter: &egui::Painter,
    axis_rect: Rect,
    axis: &TimelineAxis,
    width: f32,
    expand_labels: bool,
) {
    let top = axis_rect.top();
    let left = axis_rect.left() - PADDING;
    painter.rect_filled(
        Rect::from_min_size(Pos2::new(left, top), Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    // Axis line along the bottom of the header
    painter.line_segment(
        [
            Pos2::new(axis_rect.left(), top + HEADER_HEIGHT),
            Pos2::new(axis_rect.right(), top + HEADER_HEIGHT),
        ],
        Stroke::new(1.5, theme::AXIS_LINE),
    );

    for month in 0..=axis.max_age {
        let x = month_x(axis_rect, axis, month);
        let major = month % axis.label_every == 0;

        painter.line_segment(
            [
                Pos2::new(x, top + HEADER_HEIGHT),
                Pos2::new(x, axis_rect.bottom()),
            ],
            Stroke::new(
                if major { 1.0 } else { 0.5 },
                if major { theme::GRID_LINE_MAJOR } else { theme::GRID_LINE },
            ),
        );
        let tick = if major { 8.0 } else { 4.0 };
        painter.line_segment(
            [
                Pos2::new(x, top + HEADER_HEIGHT - tick),
                Pos2::new(x, top + HEADER_HEIGHT),
            ],
            Stroke::new(1.0, theme::AXIS_LINE),
        );

        if axis.is_label_visible(month, expand_labels) {
            let (font, color) = if major {
                (theme::font_header(), theme::TEXT_PRIMARY)
            } else {
                (theme::font_small(), theme::TEXT_SECONDARY)
            };
            painter.text(
                Pos2::new(x, top + HEADER_HEIGHT - 16.0),
                Align2::CENTER_CENTER,
                month.to_string(),
                font,
                color,
            );
        }
    }

    painter.text(
        Pos2::new(left + 4.0, top + 10.0),
        Align2::LEFT_CENTER,
        "Age (months)",
        theme::font_small(),
        theme::TEXT_DIM,
    );
}

fn draw_row_bands(painter: &egui::Painter, origin: Pos2, width: f32, rows: u32) {
    for row in 0..rows.max(1) {
        let y = origin.y + HEADER_HEIGHT + row as f32 * ROW_HEIGHT;
        let fill = if row % 2 == 0 {
            theme::BG_PANEL
        } else {
            theme::BG_DARK
        };
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, ROW_HEIGHT)),
            0.0,
            fill,
        );
    }
}

fn draw_hover_line(painter: &egui::Painter, axis_rect: Rect, axis: &TimelineAxis, month: u32) {
    let x = month_x(axis_rect, axis, month);
    painter.line_segment(
        [
            Pos2::new(x, axis_rect.top() + HEADER_HEIGHT),
            Pos2::new(x, axis_rect.bottom()),
        ],
        Stroke::new(1.5, theme::HOVER_LINE),
    );

    let badge_w = 46.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, axis_rect.top() + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::HOVER_LINE);
    painter.text(
        badge_rect.center(),
        Align2::CENTER_CENTER,
        format!("{} mo", month),
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_marker(
    painter: &egui::Painter,
    axis_rect: Rect,
    axis: &TimelineAxis,
    milestone: &Milestone,
    is_dragged: bool,
) -> Rect {
    let month = milestone.actual_age.unwrap_or(0);
    let row = milestone.stack_position.unwrap_or(0);
    let x = month_x(axis_rect, axis, month);
    let y = axis_rect.top() + HEADER_HEIGHT + row as f32 * ROW_HEIGHT + ROW_HEIGHT / 2.0;
    let center = Pos2::new(x, y);

    let fill = theme::status_color(milestone.status);
    let ring = theme::category_color(milestone.category);
    let alpha = if is_dragged { 90 } else { 255 };

    painter.circle_filled(
        center + Vec2::new(1.0, 1.5),
        RADIUS,
        Color32::from_black_alpha(40),
    );
    painter.circle(
        center,
        RADIUS,
        fill.gamma_multiply(alpha as f32 / 255.0),
        Stroke::new(2.0, ring.gamma_multiply(alpha as f32 / 255.0)),
    );

    // Expected-age whisker for referenced milestones
    if milestone.is_age_referenced() {
        let ex = month_x(axis_rect, axis, milestone.expected_age);
        if (ex - x).abs() > RADIUS {
            painter.line_segment(
                [Pos2::new(ex, y), Pos2::new(x, y)],
                Stroke::new(1.0, fill.gamma_multiply(0.4)),
            );
            painter.circle_stroke(Pos2::new(ex, y), 2.5, Stroke::new(1.0, ring));
        }
    }

    painter.text(
        Pos2::new(x + RADIUS + 5.0, y),
        Align2::LEFT_CENTER,
        &milestone.title,
        theme::font_marker(),
        theme::TEXT_SECONDARY,
    );

    Rect::from_center_size(center, Vec2::splat(RADIUS * 2.0 + 6.0))
}
