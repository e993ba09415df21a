//! Error types for rendering and exporting QR codes.

use thiserror::Error;

/// Failures while turning a request into a raster surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Nothing to encode: text is empty")]
    EmptyText,

    /// The encoder rejected the data, usually because it is too long for the level.
    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("Render produced no readable surface ({width}x{height})")]
    InvalidSurface { width: u32, height: u32 },

    #[error("Render was superseded")]
    Cancelled,

    #[error("Render worker stopped before finishing")]
    WorkerLost,
}

impl From<qrcode::types::QrError> for RenderError {
    fn from(err: qrcode::types::QrError) -> Self {
        RenderError::Encode(err.to_string())
    }
}

/// Failures of an export request.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Validation failure; the user has to type something first.
    #[error("Please enter text or a URL before exporting")]
    EmptyText,

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to save file: {0}")]
    Save(#[from] std::io::Error),
}

impl ExportError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ExportError::EmptyText)
    }
}
