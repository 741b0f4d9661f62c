use stravi_avi::AviError;
use stravi_lib::ConvertError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Conversion or probe failed
    #[error("{0}")]
    Convert(#[from] ConvertError),

    /// AVI inspection failed
    #[error("AVI error: {0}")]
    Avi(#[from] AviError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
