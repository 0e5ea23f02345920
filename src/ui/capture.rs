//! Screenshot-backed snapshot renderer.

use std::sync::Arc;

use egui::{ColorImage, Rect};
use milestone_timeline::engine::{SnapshotError, SnapshotRenderer, TimelineImage};

/// A finished viewport screenshot cropped to the timeline area.
pub struct ScreenCapture {
    image: Arc<ColorImage>,
    /// Timeline area in points.
    region: Rect,
    pixels_per_point: f32,
}

impl ScreenCapture {
    pub fn new(image: Arc<ColorImage>, region: Rect, pixels_per_point: f32) -> Self {
        Self {
            image,
            region,
            pixels_per_point,
        }
    }
}

impl SnapshotRenderer for ScreenCapture {
    fn capture_timeline_snapshot(&mut self) -> Result<TimelineImage, SnapshotError> {
        let ppp = self.pixels_per_point.max(f32::EPSILON);
        let [width, height] = self.image.size;
        let bounds = Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(width as f32 / ppp, height as f32 / ppp),
        );
        let region = self.region.intersect(bounds);
        if !region.is_positive() {
            return Err(SnapshotError::EmptyRegion);
        }

        let cropped = self.image.region(&region, Some(ppp));
        if cropped.width() == 0 || cropped.height() == 0 {
            return Err(SnapshotError::EmptyRegion);
        }
        let rgba = cropped
            .pixels
            .iter()
            .flat_map(|c| c.to_srgba_unmultiplied())
            .collect();
        Ok(TimelineImage::new(
            cropped.width() as u32,
            cropped.height() as u32,
            rgba,
        ))
    }
}
