//! STR chunk header.
//!
//! Each video sector payload opens with a 32-byte header saying which
//! frame the sector belongs to, where in that frame it sits, and how large
//! the compressed frame is.

use stravi_core::util::{read_u16_le, read_u32_le};
use stravi_core::{Geometry, StrError};

/// Size of the chunk header at the start of each payload.
pub const CHUNK_HEADER_SIZE: usize = 32;

/// Compressed bytes carried by one chunk (2048-byte user area minus the header).
pub const CHUNK_DATA_SIZE: usize = 2016;

/// Status word identifying an STR chunk.
pub const STR_MAGIC: u16 = 0x0160;

/// Chunk type for MDEC video.
pub const STR_VIDEO_TYPE: u16 = 0x8001;

/// Parsed STR chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub chunk_number: u16,
    pub chunk_count: u16,
    pub frame_number: u32,
    /// Byte length of the whole compressed frame.
    pub frame_size: u32,
    pub width: u16,
    pub height: u16,
}

impl ChunkHeader {
    /// Parse and validate the header at the start of a video payload.
    pub fn parse(payload: &[u8]) -> Result<Self, StrError> {
        if payload.len() < CHUNK_HEADER_SIZE + CHUNK_DATA_SIZE {
            return Err(StrError::TooSmall {
                expected: (CHUNK_HEADER_SIZE + CHUNK_DATA_SIZE) as u64,
                actual: payload.len() as u64,
            });
        }

        let magic = read_u16_le(payload, 0x00);
        if magic != STR_MAGIC {
            return Err(StrError::invalid_chunk(format!(
                "bad magic 0x{magic:04X}"
            )));
        }
        let kind = read_u16_le(payload, 0x02);
        if kind != STR_VIDEO_TYPE {
            return Err(StrError::invalid_chunk(format!(
                "not a video chunk (type 0x{kind:04X})"
            )));
        }

        let header = Self {
            chunk_number: read_u16_le(payload, 0x04),
            chunk_count: read_u16_le(payload, 0x06),
            frame_number: read_u32_le(payload, 0x08),
            frame_size: read_u32_le(payload, 0x0C),
            width: read_u16_le(payload, 0x10),
            height: read_u16_le(payload, 0x12),
        };

        if header.chunk_number >= header.chunk_count {
            return Err(StrError::invalid_chunk(format!(
                "chunk {} of {}",
                header.chunk_number, header.chunk_count
            )));
        }
        if header.frame_size == 0 {
            return Err(StrError::invalid_chunk("zero frame size"));
        }
        if header.frame_size as u64 > header.capacity() {
            return Err(StrError::invalid_chunk(format!(
                "frame size {} exceeds {} chunks",
                header.frame_size, header.chunk_count
            )));
        }

        Ok(header)
    }

    /// Frame dimensions declared by the stream.
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.width as u32, self.height as u32)
    }

    /// Most bytes the declared number of chunks can carry.
    pub fn capacity(&self) -> u64 {
        self.chunk_count as u64 * CHUNK_DATA_SIZE as u64
    }

    pub fn is_first(&self) -> bool {
        self.chunk_number == 0
    }

    pub fn is_last(&self) -> bool {
        self.chunk_number + 1 == self.chunk_count
    }
}

/// The compressed bytes carried by a payload, after its chunk header.
pub fn chunk_data(payload: &[u8]) -> &[u8] {
    let end = payload.len().min(CHUNK_HEADER_SIZE + CHUNK_DATA_SIZE);
    payload.get(CHUNK_HEADER_SIZE..end).unwrap_or(&[])
}

#[cfg(test)]
#[path = "tests/chunk_tests.rs"]
mod tests;
