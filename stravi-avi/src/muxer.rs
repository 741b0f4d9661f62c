//! Uncompressed AVI writer.
//!
//! Writes a single 24-bit RGB video stream. Header fields that depend on
//! the number of frames are written as placeholders by [`AviMuxer::open`]
//! and back-patched by [`AviMuxer::finalize`].

use std::io::{Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use stravi_core::{Geometry, RgbFrame};

use crate::chunks::{AVIF_HASINDEX, AVIIF_KEYFRAME, IndexEntry, chunk_ids, write_chunk_header};
use crate::error::{AviError, Result};

const AVIH_SIZE: u32 = 56;
const STRH_SIZE: u32 = 56;
const BITMAPINFOHEADER_SIZE: u32 = 40;
const STRL_SIZE: u32 = 4 + (8 + STRH_SIZE) + (8 + BITMAPINFOHEADER_SIZE);
const HDRL_SIZE: u32 = 4 + (8 + AVIH_SIZE) + (8 + STRL_SIZE);

/// Parameters fixed for the whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AviConfig {
    pub width: u32,
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
}

impl AviConfig {
    pub fn new(geometry: Geometry, fps: u32) -> Self {
        Self {
            width: geometry.width,
            height: geometry.height,
            fps,
        }
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.width, self.height)
    }

    /// Bytes per stored row: BGR triples padded to a 4-byte boundary.
    pub fn stride(&self) -> usize {
        (self.width as usize * 3 + 3) & !3
    }

    /// Bytes per `00db` chunk body.
    pub fn frame_size(&self) -> usize {
        self.stride() * self.height as usize
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AviError::invalid_config(format!(
                "empty frame size {}",
                self.geometry()
            )));
        }
        if self.width > i16::MAX as u32 || self.height > i16::MAX as u32 {
            return Err(AviError::invalid_config(format!(
                "frame size {} too large",
                self.geometry()
            )));
        }
        if self.fps == 0 {
            return Err(AviError::invalid_config("frame rate must be positive"));
        }
        if self.frame_size() > u32::MAX as usize / 2 {
            return Err(AviError::invalid_config("frame too large for AVI"));
        }
        Ok(())
    }
}

/// What [`AviMuxer::finalize`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AviSummary {
    pub frames: u32,
    /// Total bytes from the start of the RIFF header to the end of `idx1`.
    pub file_size: u64,
    /// Size of the `movi` list body (form type plus frame chunks).
    pub movi_size: u32,
    pub config: AviConfig,
}

/// Streaming AVI writer. Frames are appended in call order.
pub struct AviMuxer<W: Write + Seek> {
    writer: W,
    config: AviConfig,
    riff_start: u64,
    total_frames_pos: u64,
    stream_length_pos: u64,
    movi_start: u64,
    index: Vec<IndexEntry>,
    buf: Vec<u8>,
}

impl<W: Write + Seek> AviMuxer<W> {
    /// Write the file header and open the `movi` list.
    pub fn open(mut writer: W, config: AviConfig) -> Result<Self> {
        config.validate()?;

        let riff_start = writer.stream_position()?;
        write_chunk_header(&mut writer, chunk_ids::RIFF, 0)?;
        chunk_ids::AVI.write(&mut writer)?;

        write_chunk_header(&mut writer, chunk_ids::LIST, HDRL_SIZE)?;
        chunk_ids::HDRL.write(&mut writer)?;
        let total_frames_pos = write_avih(&mut writer, &config)?;

        write_chunk_header(&mut writer, chunk_ids::LIST, STRL_SIZE)?;
        chunk_ids::STRL.write(&mut writer)?;
        let stream_length_pos = write_strh(&mut writer, &config)?;
        write_strf(&mut writer, &config)?;

        let movi_start = writer.stream_position()?;
        write_chunk_header(&mut writer, chunk_ids::LIST, 0)?;
        chunk_ids::MOVI.write(&mut writer)?;

        log::debug!(
            "AVI header written: {} @ {} fps, movi at {}",
            config.geometry(),
            config.fps,
            movi_start
        );

        Ok(Self {
            writer,
            config,
            riff_start,
            total_frames_pos,
            stream_length_pos,
            movi_start,
            index: Vec::new(),
            buf: Vec::with_capacity(config.frame_size()),
        })
    }

    pub fn config(&self) -> &AviConfig {
        &self.config
    }

    /// Frames written so far.
    pub fn frame_count(&self) -> u32 {
        self.index.len() as u32
    }

    /// Append one frame as a bottom-up BGR `00db` chunk.
    pub fn write_frame(&mut self, frame: &RgbFrame) -> Result<()> {
        if frame.geometry() != self.config.geometry() {
            return Err(AviError::FrameSize {
                expected: self.config.geometry(),
                actual: frame.geometry(),
            });
        }

        self.buf.clear();
        let pad = self.config.stride() - frame.width() as usize * 3;
        for y in (0..frame.height()).rev() {
            for px in frame.row(y).chunks_exact(3) {
                self.buf.extend_from_slice(&[px[2], px[1], px[0]]);
            }
            self.buf.extend(std::iter::repeat_n(0u8, pad));
        }

        let pos = self.writer.stream_position()?;
        let size = self.buf.len() as u32;
        write_chunk_header(&mut self.writer, chunk_ids::VIDEO_00DB, size)?;
        self.writer.write_all(&self.buf)?;

        self.index.push(IndexEntry {
            chunk_id: chunk_ids::VIDEO_00DB,
            flags: AVIIF_KEYFRAME,
            offset: (pos - (self.movi_start + 8)) as u32,
            size,
        });
        Ok(())
    }

    /// Write the index, patch the header fields, and hand back the writer.
    pub fn finalize(mut self) -> Result<(W, AviSummary)> {
        let movi_end = self.writer.stream_position()?;

        write_chunk_header(
            &mut self.writer,
            chunk_ids::IDX1,
            self.index.len() as u32 * IndexEntry::SIZE,
        )?;
        for entry in &self.index {
            entry.write(&mut self.writer)?;
        }

        let end = self.writer.stream_position()?;
        let frames = self.frame_count();
        let movi_size = (movi_end - self.movi_start - 8) as u32;

        self.patch_u32(self.riff_start + 4, (end - self.riff_start - 8) as u32)?;
        self.patch_u32(self.movi_start + 4, movi_size)?;
        self.patch_u32(self.total_frames_pos, frames)?;
        self.patch_u32(self.stream_length_pos, frames)?;
        self.writer.seek(SeekFrom::Start(end))?;
        self.writer.flush()?;

        log::debug!("AVI finalized: {} frames, {} bytes", frames, end - self.riff_start);

        let summary = AviSummary {
            frames,
            file_size: end - self.riff_start,
            movi_size,
            config: self.config,
        };
        Ok((self.writer, summary))
    }

    fn patch_u32(&mut self, pos: u64, value: u32) -> Result<()> {
        self.writer.seek(SeekFrom::Start(pos))?;
        self.writer.write_u32::<LittleEndian>(value)?;
        Ok(())
    }
}

/// Write `avih`; returns the position of `dwTotalFrames`.
fn write_avih<W: Write + Seek>(w: &mut W, config: &AviConfig) -> Result<u64> {
    let frame_size = config.frame_size() as u32;
    write_chunk_header(w, chunk_ids::AVIH, AVIH_SIZE)?;
    w.write_u32::<LittleEndian>(1_000_000 / config.fps)?; // microseconds per frame
    w.write_u32::<LittleEndian>(frame_size.saturating_mul(config.fps))?; // max bytes per second
    w.write_u32::<LittleEndian>(0)?; // padding granularity
    w.write_u32::<LittleEndian>(AVIF_HASINDEX)?;
    let total_frames_pos = w.stream_position()?;
    w.write_u32::<LittleEndian>(0)?; // total frames
    w.write_u32::<LittleEndian>(0)?; // initial frames
    w.write_u32::<LittleEndian>(1)?; // streams
    w.write_u32::<LittleEndian>(frame_size + 8)?; // suggested buffer
    w.write_u32::<LittleEndian>(config.width)?;
    w.write_u32::<LittleEndian>(config.height)?;
    w.write_all(&[0u8; 16])?; // reserved
    Ok(total_frames_pos)
}

/// Write `strh`; returns the position of `dwLength`.
fn write_strh<W: Write + Seek>(w: &mut W, config: &AviConfig) -> Result<u64> {
    let frame_size = config.frame_size() as u32;
    write_chunk_header(w, chunk_ids::STRH, STRH_SIZE)?;
    chunk_ids::VIDS.write(w)?;
    chunk_ids::DIB.write(w)?;
    w.write_u32::<LittleEndian>(0)?; // flags
    w.write_u16::<LittleEndian>(0)?; // priority
    w.write_u16::<LittleEndian>(0)?; // language
    w.write_u32::<LittleEndian>(0)?; // initial frames
    w.write_u32::<LittleEndian>(1)?; // scale
    w.write_u32::<LittleEndian>(config.fps)?; // rate
    w.write_u32::<LittleEndian>(0)?; // start
    let length_pos = w.stream_position()?;
    w.write_u32::<LittleEndian>(0)?; // length
    w.write_u32::<LittleEndian>(frame_size + 8)?; // suggested buffer
    w.write_u32::<LittleEndian>(u32::MAX)?; // quality: default
    w.write_u32::<LittleEndian>(frame_size)?; // sample size
    w.write_i16::<LittleEndian>(0)?; // rcFrame
    w.write_i16::<LittleEndian>(0)?;
    w.write_i16::<LittleEndian>(config.width as i16)?;
    w.write_i16::<LittleEndian>(config.height as i16)?;
    Ok(length_pos)
}

/// Write `strf` as a BITMAPINFOHEADER for bottom-up 24-bit RGB.
fn write_strf<W: Write>(w: &mut W, config: &AviConfig) -> Result<()> {
    write_chunk_header(w, chunk_ids::STRF, BITMAPINFOHEADER_SIZE)?;
    w.write_u32::<LittleEndian>(BITMAPINFOHEADER_SIZE)?;
    w.write_i32::<LittleEndian>(config.width as i32)?;
    w.write_i32::<LittleEndian>(config.height as i32)?;
    w.write_u16::<LittleEndian>(1)?; // planes
    w.write_u16::<LittleEndian>(24)?; // bits per pixel
    w.write_u32::<LittleEndian>(0)?; // BI_RGB
    w.write_u32::<LittleEndian>(config.frame_size() as u32)?;
    w.write_i32::<LittleEndian>(0)?; // x pixels per metre
    w.write_i32::<LittleEndian>(0)?; // y pixels per metre
    w.write_u32::<LittleEndian>(0)?; // colours used
    w.write_u32::<LittleEndian>(0)?; // colours important
    Ok(())
}

/// Byte offset of the first frame chunk in a file written by [`AviMuxer`].
pub fn first_frame_offset() -> u64 {
    12 + 8 + HDRL_SIZE as u64 + 12
}

#[cfg(test)]
#[path = "tests/muxer_tests.rs"]
mod tests;
