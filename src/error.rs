// src/error.rs
// Errors from grabbing, copying and writing a capture.

use std::path::PathBuf;

use thiserror::Error;

use crate::selection::CaptureRegion;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no monitor available")]
    NoMonitor,

    #[error("screen capture failed: {0}")]
    Screen(String),

    #[error(
        "region ({},{} {}x{}) lies outside the captured screen",
        .0.x, .0.y, .0.width, .0.height
    )]
    OutOfBounds(CaptureRegion),

    #[error("clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl From<xcap::XCapError> for CaptureError {
    fn from(e: xcap::XCapError) -> Self {
        CaptureError::Screen(e.to_string())
    }
}
