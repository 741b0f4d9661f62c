//! Uncompressed AVI output for decoded STR frames.
//!
//! [`AviMuxer`] writes a RIFF `AVI ` file with a single 24-bit RGB video
//! stream and back-patches the frame counts when it is finalized.
//! [`AviInfo`] reads those headers back.

mod chunks;
mod error;
mod info;
mod muxer;

pub use chunks::{FourCC, IndexEntry, chunk_ids};
pub use error::{AviError, Result};
pub use info::AviInfo;
pub use muxer::{AviConfig, AviMuxer, AviSummary, first_frame_offset};
