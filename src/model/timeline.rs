/// Default upper bound of the timeline, in months.
pub const DEFAULT_MAX_AGE: u32 = 72;

const MIN_PIXELS_PER_MONTH: f32 = 6.0;
const MAX_PIXELS_PER_MONTH: f32 = 60.0;

/// Maps ages in months to horizontal offsets on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineAxis {
    /// Rightmost month shown on the axis.
    pub max_age: u32,
    /// Pixels per month (controls zoom level).
    pub pixels_per_month: f32,
    /// Month labels are drawn only every `label_every` months unless expanded.
    pub label_every: u32,
}

impl Default for TimelineAxis {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE, 14.0, 6)
    }
}

impl TimelineAxis {
    pub fn new(max_age: u32, pixels_per_month: f32, label_every: u32) -> Self {
        Self {
            max_age,
            pixels_per_month: pixels_per_month.clamp(MIN_PIXELS_PER_MONTH, MAX_PIXELS_PER_MONTH),
            label_every: label_every.max(1),
        }
    }

    /// Convert a month to an x-pixel offset from the axis origin.
    pub fn month_to_x(&self, month: u32) -> f32 {
        month as f32 * self.pixels_per_month
    }

    /// Convert an x-pixel offset back to a month, clamped to `[0, max_age]`.
    pub fn x_to_month(&self, x: f32) -> u32 {
        if !x.is_finite() || x <= 0.0 {
            return 0;
        }
        let month = (x / self.pixels_per_month).round() as u32;
        month.min(self.max_age)
    }

    /// Total width in pixels for months `0..=max_age`.
    pub fn total_width(&self) -> f32 {
        self.month_to_x(self.max_age)
    }

    /// Whether the marker label for `month` is drawn. Collapsed labels are
    /// expanded for snapshot export.
    pub fn is_label_visible(&self, month: u32, expanded: bool) -> bool {
        expanded || month % self.label_every == 0 || month == self.max_age
    }

    /// Copy of this axis scaled so months `0..=max_age` span `width` pixels.
    /// Narrow widths may go below the interactive zoom limit.
    pub fn fitted_to(&self, width: f32) -> Self {
        let months = self.max_age.max(1) as f32;
        let pixels_per_month = if width.is_finite() { width / months } else { 0.0 };
        Self {
            pixels_per_month: pixels_per_month.clamp(1.0, MAX_PIXELS_PER_MONTH),
            ..self.clone()
        }
    }

    /// Zoom in (increase pixels per month).
    pub fn zoom_in(&mut self) {
        self.pixels_per_month = (self.pixels_per_month * 1.2).min(MAX_PIXELS_PER_MONTH);
    }

    /// Zoom out (decrease pixels per month).
    pub fn zoom_out(&mut self) {
        self.pixels_per_month = (self.pixels_per_month / 1.2).max(MIN_PIXELS_PER_MONTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_and_x_round_trip_on_grid() {
        let axis = TimelineAxis::new(72, 10.0, 6);
        assert_eq!(axis.month_to_x(7), 70.0);
        assert_eq!(axis.x_to_month(70.0), 7);
        assert_eq!(axis.x_to_month(74.0), 7);
        assert_eq!(axis.x_to_month(76.0), 8);
    }

    #[test]
    fn x_to_month_clamps_to_axis() {
        let axis = TimelineAxis::new(72, 10.0, 6);
        assert_eq!(axis.x_to_month(-40.0), 0);
        assert_eq!(axis.x_to_month(10_000.0), 72);
        assert_eq!(axis.x_to_month(f32::NAN), 0);
    }

    #[test]
    fn labels_collapse_unless_expanded() {
        let axis = TimelineAxis::new(72, 10.0, 6);
        assert!(axis.is_label_visible(12, false));
        assert!(!axis.is_label_visible(13, false));
        assert!(axis.is_label_visible(13, true));
        assert!(axis.is_label_visible(72, false));
    }

    #[test]
    fn zoom_is_bounded() {
        let mut axis = TimelineAxis::default();
        for _ in 0..50 {
            axis.zoom_in();
        }
        assert_eq!(axis.pixels_per_month, MAX_PIXELS_PER_MONTH);
        for _ in 0..50 {
            axis.zoom_out();
        }
        assert_eq!(axis.pixels_per_month, MIN_PIXELS_PER_MONTH);
    }

    #[test]
    fn fitted_axis_spans_the_width() {
        let axis = TimelineAxis::new(72, 30.0, 6);
        let fitted = axis.fitted_to(720.0);
        assert_eq!(fitted.pixels_per_month, 10.0);
        assert_eq!(fitted.total_width(), 720.0);
        assert_eq!(fitted.label_every, 6);
        assert_eq!(axis.pixels_per_month, 30.0);

        assert_eq!(axis.fitted_to(144.0).pixels_per_month, 2.0);
        assert_eq!(axis.fitted_to(f32::NAN).pixels_per_month, 1.0);
    }
}
