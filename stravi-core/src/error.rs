use thiserror::Error;

/// Errors raised while parsing STR chunks or decoding MDEC frames.
///
/// Apart from `Io`, every variant describes damage local to one sector or
/// one frame. The conversion pipeline logs those and moves on.
#[derive(Debug, Error)]
pub enum StrError {
    /// I/O error while reading the stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The STR chunk header at the start of a video payload is malformed
    #[error("Invalid chunk header: {0}")]
    InvalidChunk(String),

    /// The compressed frame is malformed
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// The data is too small to contain the expected structure
    #[error("Data too small: expected at least {expected} bytes, got {actual}")]
    TooSmall { expected: u64, actual: u64 },

    /// Bitstream version the decoder does not handle
    #[error("Unsupported bitstream version: {0}")]
    UnsupportedVersion(u16),

    /// The MDEC bitstream could not be decoded
    #[error("Bitstream error: {0}")]
    Bitstream(String),
}

impl StrError {
    pub fn invalid_chunk(msg: impl Into<String>) -> Self {
        Self::InvalidChunk(msg.into())
    }

    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    pub fn bitstream(msg: impl Into<String>) -> Self {
        Self::Bitstream(msg.into())
    }
}
