//! Error types for pagesqr operations

use crate::qr::ErrorCorrectionLevel;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using pagesqr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pagesqr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Requested campaign id is not in the catalog
    #[error("Campaign '{id}' not found. Available: {}", available.join(", "))]
    UnknownCampaign {
        /// The id that was requested
        id: String,
        /// Ids present in the catalog, in catalog order
        available: Vec<String>,
    },

    /// The QR encoder rejected the data
    #[error("Failed to encode {length} bytes at error correction level {level}: {reason}")]
    EncodingFailure {
        /// Length of the rejected data in bytes
        length: usize,
        /// Error correction level the encoding was attempted at
        level: ErrorCorrectionLevel,
        /// Encoder-provided reason
        reason: String,
    },

    /// Directory or file write failure
    #[error("I/O error at {}: {source}", path.display())]
    IoFailure {
        /// Path that could not be created or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// URL could not be parsed or extended
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Parser-provided reason
        reason: String,
    },

    /// Output filename stem is empty or escapes the output directory
    #[error("Invalid output filename '{0}'")]
    InvalidFilename(String),

    /// Rendered PNG did not decode back to the encoded data
    #[error("Verification of {} failed: {reason}", path.display())]
    VerificationFailed {
        /// PNG that was read back
        path: PathBuf,
        /// What did not match
        reason: String,
    },

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analytics transport error, returned by beacon transports
    #[error("Analytics error: {0}")]
    Analytics(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attach a path to an I/O error.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::IoFailure {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}
