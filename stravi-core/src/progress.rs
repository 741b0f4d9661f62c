/// Progress update sent during an STR→AVI conversion.
///
/// Delivered through a callback so frontends can drive a progress bar
/// without the pipeline knowing how it is displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertProgress {
    /// Conversion has started
    Started {
        /// Total size of the input stream (if known)
        total_bytes: Option<u64>,
    },

    /// Sectors are being read
    Reading {
        /// Bytes consumed so far
        bytes_read: u64,
        /// Total bytes to process (if known)
        total_bytes: Option<u64>,
    },

    /// A frame was decoded and appended to the output
    FrameWritten {
        /// Index of the frame in the output file
        index: u64,
        /// Frame number from the STR chunk header
        frame_number: u32,
    },

    /// A frame was discarded
    FrameDropped {
        /// Frame number from the STR chunk header, if one was seen
        frame_number: Option<u32>,
        /// Why it was dropped
        reason: String,
    },

    /// Conversion completed successfully
    Completed {
        /// Number of frames in the output
        frames: u64,
    },
}

impl ConvertProgress {
    pub fn started(total_bytes: Option<u64>) -> Self {
        Self::Started { total_bytes }
    }

    pub fn reading(bytes_read: u64, total_bytes: Option<u64>) -> Self {
        Self::Reading {
            bytes_read,
            total_bytes,
        }
    }

    pub fn dropped(frame_number: Option<u32>, reason: impl Into<String>) -> Self {
        Self::FrameDropped {
            frame_number,
            reason: reason.into(),
        }
    }
}
