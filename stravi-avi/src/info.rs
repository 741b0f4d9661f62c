//! Read-only AVI header inspection.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::chunks::{FourCC, IndexEntry, chunk_ids, read_chunk_header};
use crate::error::{AviError, Result};

/// Header values and chunk counts of an AVI file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AviInfo {
    /// Size field of the RIFF header.
    pub riff_size: u32,
    pub file_size: u64,
    pub micros_per_frame: u32,
    pub flags: u32,
    /// `avih.dwTotalFrames`.
    pub total_frames: u32,
    pub streams: u32,
    pub width: u32,
    pub height: u32,
    pub stream_type: Option<FourCC>,
    pub handler: Option<FourCC>,
    pub scale: u32,
    pub rate: u32,
    /// `strh.dwLength`.
    pub stream_length: u32,
    pub bit_count: u16,
    pub compression: u32,
    /// Size field of the `movi` list.
    pub movi_size: Option<u32>,
    /// Number of `##db`/`##dc` chunks found.
    pub frame_chunks: u32,
    /// Sum of the frame chunk body sizes.
    pub frame_bytes: u64,
    /// Entries in `idx1`, if present.
    pub index_entries: Option<u32>,
}

impl AviInfo {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::read(&mut BufReader::new(file))
    }

    /// Walk the chunk tree of an AVI stream.
    pub fn read<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let file_size = r.seek(SeekFrom::End(0))?;
        r.seek(SeekFrom::Start(0))?;

        if file_size < 12 {
            return Err(AviError::invalid_file("shorter than a RIFF header"));
        }
        let (id, riff_size) = read_chunk_header(r)?;
        if id != chunk_ids::RIFF {
            return Err(AviError::invalid_file(format!("expected RIFF, found {id}")));
        }
        let form = FourCC::read(r)?;
        if form != chunk_ids::AVI {
            return Err(AviError::invalid_file(format!("form type is {form}, not AVI")));
        }

        let mut info = AviInfo {
            riff_size,
            file_size,
            ..Default::default()
        };
        let end = (8 + riff_size as u64).min(file_size);
        walk(r, end, &mut info)?;
        Ok(info)
    }

    /// Frame rate as declared by the stream header.
    pub fn fps(&self) -> Option<f64> {
        (self.scale > 0).then(|| self.rate as f64 / self.scale as f64)
    }

    pub fn has_index(&self) -> bool {
        self.index_entries.is_some()
    }
}

fn walk<R: Read + Seek>(r: &mut R, end: u64, info: &mut AviInfo) -> Result<()> {
    while r.stream_position()? + 8 <= end {
        let (id, size) = read_chunk_header(r)?;
        let body = r.stream_position()?;
        let body_end = body + size as u64;
        if body_end > end {
            return Err(AviError::invalid_file(format!(
                "chunk {id} at {} overruns its parent",
                body - 8
            )));
        }

        match id {
            chunk_ids::LIST => {
                if size < 4 {
                    return Err(AviError::invalid_file("empty LIST"));
                }
                let kind = FourCC::read(r)?;
                if kind == chunk_ids::MOVI {
                    info.movi_size = Some(size);
                }
                walk(r, body_end, info)?;
            }
            chunk_ids::AVIH => read_avih(r, size, info)?,
            chunk_ids::STRH => read_strh(r, size, info)?,
            chunk_ids::STRF => read_strf(r, size, info)?,
            chunk_ids::IDX1 => info.index_entries = Some(size / IndexEntry::SIZE),
            id if id.is_video_data() => {
                info.frame_chunks += 1;
                info.frame_bytes += size as u64;
            }
            other => log::debug!("Skipping {} chunk ({} bytes)", other, size),
        }

        // Chunk bodies are padded to an even length.
        r.seek(SeekFrom::Start(body_end + (size as u64 & 1)))?;
    }
    Ok(())
}

fn require(id: FourCC, size: u32, needed: u32) -> Result<()> {
    if size < needed {
        return Err(AviError::invalid_file(format!(
            "{id} is {size} bytes, need {needed}"
        )));
    }
    Ok(())
}

fn read_avih<R: Read>(r: &mut R, size: u32, info: &mut AviInfo) -> Result<()> {
    require(chunk_ids::AVIH, size, 40)?;
    info.micros_per_frame = r.read_u32::<LittleEndian>()?;
    let _max_bytes_per_sec = r.read_u32::<LittleEndian>()?;
    let _padding = r.read_u32::<LittleEndian>()?;
    info.flags = r.read_u32::<LittleEndian>()?;
    info.total_frames = r.read_u32::<LittleEndian>()?;
    let _initial_frames = r.read_u32::<LittleEndian>()?;
    info.streams = r.read_u32::<LittleEndian>()?;
    let _suggested_buffer = r.read_u32::<LittleEndian>()?;
    info.width = r.read_u32::<LittleEndian>()?;
    info.height = r.read_u32::<LittleEndian>()?;
    Ok(())
}

fn read_strh<R: Read>(r: &mut R, size: u32, info: &mut AviInfo) -> Result<()> {
    require(chunk_ids::STRH, size, 36)?;
    info.stream_type = Some(FourCC::read(r)?);
    info.handler = Some(FourCC::read(r)?);
    let _flags = r.read_u32::<LittleEndian>()?;
    let _priority = r.read_u16::<LittleEndian>()?;
    let _language = r.read_u16::<LittleEndian>()?;
    let _initial_frames = r.read_u32::<LittleEndian>()?;
    info.scale = r.read_u32::<LittleEndian>()?;
    info.rate = r.read_u32::<LittleEndian>()?;
    let _start = r.read_u32::<LittleEndian>()?;
    info.stream_length = r.read_u32::<LittleEndian>()?;
    Ok(())
}

fn read_strf<R: Read>(r: &mut R, size: u32, info: &mut AviInfo) -> Result<()> {
    require(chunk_ids::STRF, size, 20)?;
    let _header_size = r.read_u32::<LittleEndian>()?;
    let _width = r.read_i32::<LittleEndian>()?;
    let _height = r.read_i32::<LittleEndian>()?;
    let _planes = r.read_u16::<LittleEndian>()?;
    info.bit_count = r.read_u16::<LittleEndian>()?;
    info.compression = r.read_u32::<LittleEndian>()?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/info_tests.rs"]
mod tests;
