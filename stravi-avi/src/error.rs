use stravi_core::Geometry;
use thiserror::Error;

/// Result type for AVI operations.
pub type Result<T> = std::result::Result<T, AviError>;

/// Errors raised while writing or inspecting an AVI file.
#[derive(Debug, Error)]
pub enum AviError {
    /// I/O error on the underlying writer or reader
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream parameters cannot describe a playable file
    #[error("Invalid AVI configuration: {0}")]
    InvalidConfig(String),

    /// A frame does not match the geometry the stream was opened with
    #[error("Frame is {actual} but the stream is {expected}")]
    FrameSize { expected: Geometry, actual: Geometry },

    /// The file is not a well-formed AVI
    #[error("Invalid AVI file: {0}")]
    InvalidFile(String),
}

impl AviError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn invalid_file(msg: impl Into<String>) -> Self {
        Self::InvalidFile(msg.into())
    }
}
