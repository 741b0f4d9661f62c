//! PlayStation STR stream decoding.
//!
//! The pieces run in stream order:
//!
//! - [`sector`]: split the input into raw 2352-byte sectors, pick out the
//!   video sectors and their payloads
//! - [`chunk`]: the STR chunk header at the start of every video payload
//! - [`assembler`]: join chunks into complete compressed frames
//! - [`mdec`]: decode a compressed frame to RGB

pub mod assembler;
pub mod chunk;
pub mod mdec;
pub mod sector;

pub use assembler::{
    CompressedFrame, CompressedFrames, DropReason, DroppedFrame, FrameAssembler, frames,
};
pub use chunk::ChunkHeader;
pub use mdec::{FrameHeader, MdecDecoder};
pub use sector::{SectorKind, SectorReader, extract_payload, is_video_sector};

#[cfg(test)]
#[path = "tests/testutil.rs"]
mod testutil;
