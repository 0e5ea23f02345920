use base64::Engine as _;
use std::io::Cursor;
use thiserror::Error;

use crate::error::{Result, TrackerError};

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Raw RGBA8 pixels of the rendered timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineImage {
    pub width: u32,
    pub height: u32,
    /// Unmultiplied RGBA, row-major, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl TimelineImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self { width, height, rgba }
    }

    /// Encode as PNG and wrap in a `data:` URL for embedding in the report.
    pub fn to_png_data_url(&self) -> Result<String> {
        let buffer = image::RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
            .ok_or_else(|| {
                TrackerError::ImageEncode(format!(
                    "buffer of {} bytes does not fit {}x{}",
                    self.rgba.len(),
                    self.width,
                    self.height
                ))
            })?;
        let mut png = Cursor::new(Vec::new());
        buffer.write_to(&mut png, image::ImageFormat::Png)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(png.into_inner());
        Ok(format!("{DATA_URL_PREFIX}{encoded}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("timeline view is not mounted")]
    NotMounted,

    #[error("captured region is empty")]
    EmptyRegion,

    #[error("capture timed out")]
    TimedOut,
}

/// Renders the current timeline to pixels.
pub trait SnapshotRenderer {
    fn capture_timeline_snapshot(&mut self) -> std::result::Result<TimelineImage, SnapshotError>;
}

/// Renderer for when no view is available; every capture fails.
#[derive(Debug, Clone, Copy)]
pub struct Unavailable(pub SnapshotError);

impl SnapshotRenderer for Unavailable {
    fn capture_timeline_snapshot(&mut self) -> std::result::Result<TimelineImage, SnapshotError> {
        Err(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_png_data_url() {
        let image = TimelineImage::new(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]);
        let url = image.to_png_data_url().unwrap();
        assert!(url.starts_with(DATA_URL_PREFIX));

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&url[DATA_URL_PREFIX.len()..])
            .unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let image = TimelineImage::new(4, 4, vec![0; 3]);
        assert!(matches!(
            image.to_png_data_url(),
            Err(TrackerError::ImageEncode(_))
        ));
    }

    #[test]
    fn unavailable_renderer_always_fails() {
        let mut renderer = Unavailable(SnapshotError::NotMounted);
        assert_eq!(
            renderer.capture_timeline_snapshot(),
            Err(SnapshotError::NotMounted)
        );
    }
}
