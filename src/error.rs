use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("image encoding failed: {0}")]
    ImageEncode(String),

    #[error("no data directory available for this platform")]
    NoDataDir,
}

impl From<image::ImageError> for TrackerError {
    fn from(e: image::ImageError) -> Self {
        TrackerError::ImageEncode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
