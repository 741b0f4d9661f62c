//! RIFF building blocks.

use std::fmt;
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Four-character chunk identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn read<R: Read>(r: &mut R) -> std::io::Result<Self> {
        let mut b = [0u8; 4];
        r.read_exact(&mut b)?;
        Ok(Self(b))
    }

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.0)
    }

    /// Stream data chunk (`##db` or `##dc`).
    pub fn is_video_data(&self) -> bool {
        self.0[0].is_ascii_digit()
            && self.0[1].is_ascii_digit()
            && matches!(&self.0[2..4], b"db" | b"dc")
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{}\")", self)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Chunk and form identifiers used by the writer and the inspector.
pub mod chunk_ids {
    use super::FourCC;

    pub const RIFF: FourCC = FourCC(*b"RIFF");
    pub const AVI: FourCC = FourCC(*b"AVI ");
    pub const LIST: FourCC = FourCC(*b"LIST");
    pub const HDRL: FourCC = FourCC(*b"hdrl");
    pub const AVIH: FourCC = FourCC(*b"avih");
    pub const STRL: FourCC = FourCC(*b"strl");
    pub const STRH: FourCC = FourCC(*b"strh");
    pub const STRF: FourCC = FourCC(*b"strf");
    pub const MOVI: FourCC = FourCC(*b"movi");
    pub const IDX1: FourCC = FourCC(*b"idx1");
    pub const VIDS: FourCC = FourCC(*b"vids");
    pub const DIB: FourCC = FourCC(*b"DIB ");
    /// Uncompressed video, stream 0.
    pub const VIDEO_00DB: FourCC = FourCC(*b"00db");
}

/// `avih.dwFlags`: the file carries an `idx1` index.
pub const AVIF_HASINDEX: u32 = 0x10;

/// `idx1` entry flag: the chunk is a key frame.
pub const AVIIF_KEYFRAME: u32 = 0x10;

/// Write a chunk header: id and body size.
pub fn write_chunk_header<W: Write>(w: &mut W, id: FourCC, size: u32) -> std::io::Result<()> {
    id.write(w)?;
    w.write_u32::<LittleEndian>(size)
}

/// Read a chunk header, returning the id and body size.
pub fn read_chunk_header<R: Read>(r: &mut R) -> std::io::Result<(FourCC, u32)> {
    let id = FourCC::read(r)?;
    let size = r.read_u32::<LittleEndian>()?;
    Ok((id, size))
}

/// One `idx1` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub chunk_id: FourCC,
    pub flags: u32,
    /// Offset of the chunk header from the `movi` form type.
    pub offset: u32,
    pub size: u32,
}

impl IndexEntry {
    pub const SIZE: u32 = 16;

    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.chunk_id.write(w)?;
        w.write_u32::<LittleEndian>(self.flags)?;
        w.write_u32::<LittleEndian>(self.offset)?;
        w.write_u32::<LittleEndian>(self.size)
    }
}
