use std::io;
use std::path::PathBuf;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("upload too large: {0}")]
    TooLarge(String),

    #[error("invalid upload file name '{0}'")]
    InvalidFileName(String),

    /// The encoder exited non-zero or could not be started. Carries the
    /// tool's stderr verbatim.
    #[error("FFmpeg error: {diagnostic}")]
    Encode { diagnostic: String },

    #[error("encoder reported success but {} is missing", .0.display())]
    MissingOutput(PathBuf),

    #[error("failed to write master manifest: {0}")]
    ManifestWrite(#[source] io::Error),

    #[error("storage error: {0}")]
    Io(#[from] io::Error),

    #[error("transcode task did not finish: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl TranscodeError {
    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Upload(_) | Self::TooLarge(_) | Self::InvalidFileName(_)
        )
    }
}

impl From<MultipartError> for TranscodeError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge(e.body_text())
        } else {
            Self::Upload(format!("stream interrupted: {}", e.body_text()))
        }
    }
}
