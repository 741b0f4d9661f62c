use std::path::PathBuf;

use stravi_avi::AviError;
use thiserror::Error;

/// Errors that end a conversion.
///
/// Damaged sectors and undecodable frames never show up here; the
/// pipeline skips them and counts them in the report.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// I/O error on the input or output stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be opened or created
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The AVI writer failed
    #[error("AVI output: {0}")]
    Avi(#[from] AviError),

    /// The requested conversion is not implemented
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The settings file could not be read or written
    #[error("Settings: {0}")]
    Settings(String),
}

impl ConvertError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
