//! MDEC frame decoder.
//!
//! Turns one compressed frame (as assembled from STR chunks) into an RGB
//! raster. The bitstream is the PlayStation's MPEG-1-like intra coding:
//! a DC value and run/level coded AC coefficients per 8×8 block, six
//! blocks per 16×16 macroblock, macroblocks scanned column by column.

mod bitreader;
mod color;
mod idct;
pub mod tables;

pub use bitreader::BitReader;
pub use color::ycbcr_to_rgb;

use stravi_core::util::read_u16_le;
use stravi_core::{Geometry, RgbFrame, StrError};

use color::Planes;
use tables::{AcSymbol, DC_CHROMA, DC_LUMA, QUANT_MATRIX, ZIGZAG};

/// Magic number in the second word of every frame header.
pub const MDEC_MAGIC: u16 = 0x3800;

/// Size of the frame header preceding the bitstream.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest frame the decoder accepts: the full width and height of VRAM.
pub const MAX_WIDTH: u32 = 1024;
pub const MAX_HEIGHT: u32 = 512;

/// Dequantised coefficients saturate to the MDEC's 11-bit range.
const COEFF_MIN: i64 = -1024;
const COEFF_MAX: i64 = 1023;

const LUMA: usize = 0;
const CB: usize = 1;
const CR: usize = 2;

/// The 8-byte header at the start of a compressed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Number of 32-bit MDEC codes after decompression (informational).
    pub code_count: u16,
    pub qscale: u16,
    pub version: u16,
}

impl FrameHeader {
    pub fn parse(data: &[u8]) -> Result<Self, StrError> {
        if data.len() < FRAME_HEADER_SIZE {
            return Err(StrError::TooSmall {
                expected: FRAME_HEADER_SIZE as u64,
                actual: data.len() as u64,
            });
        }

        let magic = read_u16_le(data, 2);
        if magic != MDEC_MAGIC {
            return Err(StrError::invalid_frame(format!(
                "bad MDEC magic 0x{magic:04X}"
            )));
        }

        let version = read_u16_le(data, 6);
        if !(1..=3).contains(&version) {
            return Err(StrError::UnsupportedVersion(version));
        }

        Ok(Self {
            code_count: read_u16_le(data, 0),
            qscale: read_u16_le(data, 4),
            version,
        })
    }
}

/// Decoder for frames of one geometry.
///
/// Plane buffers are allocated once and reused for every frame.
pub struct MdecDecoder {
    geometry: Geometry,
    mb_cols: usize,
    mb_rows: usize,
    planes: Planes,
}

impl MdecDecoder {
    /// Fails for an empty geometry or one larger than VRAM, before any
    /// plane memory is allocated.
    pub fn new(geometry: Geometry) -> Result<Self, StrError> {
        check_geometry(geometry)?;
        let mb_cols = (geometry.width as usize).div_ceil(16);
        let mb_rows = (geometry.height as usize).div_ceil(16);
        Ok(Self {
            geometry,
            mb_cols,
            mb_rows,
            planes: Planes::new(mb_cols, mb_rows),
        })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Decode one compressed frame.
    ///
    /// Any error leaves the decoder usable for the next frame.
    pub fn decode(&mut self, data: &[u8]) -> Result<RgbFrame, StrError> {
        let header = FrameHeader::parse(data)?;
        let mut reader = BitReader::new(data);
        reader.skip(FRAME_HEADER_SIZE * 8)?;

        let mut last_dc = [128i32; 3];
        let mut block = [0i32; 64];
        let mut samples = [0u8; 64];

        for mb_x in 0..self.mb_cols {
            for mb_y in 0..self.mb_rows {
                // Cr, Cb, then the four luma blocks in raster order.
                for index in 0..6 {
                    let component = match index {
                        0 => CR,
                        1 => CB,
                        _ => LUMA,
                    };
                    block.fill(0);
                    decode_block(&mut reader, &header, component, &mut last_dc, &mut block)
                        .inspect_err(|e| {
                            log::debug!("Macroblock ({mb_x}, {mb_y}) block {index}: {e}")
                        })?;
                    idct::idct_8x8(&block, &mut samples);
                    self.store_block(index, mb_x, mb_y, &samples);
                }
            }
        }

        let mut data = vec![0u8; self.geometry.rgb_len()];
        self.planes.to_rgb(self.geometry, &mut data);
        RgbFrame::from_raw(self.geometry, data)
            .ok_or_else(|| StrError::invalid_frame("raster does not match frame size"))
    }

    fn store_block(&mut self, index: usize, mb_x: usize, mb_y: usize, samples: &[u8; 64]) {
        let (plane, stride, x0, y0) = match index {
            0 => (&mut self.planes.cr, self.mb_cols * 8, mb_x * 8, mb_y * 8),
            1 => (&mut self.planes.cb, self.mb_cols * 8, mb_x * 8, mb_y * 8),
            n => {
                let n = n - 2;
                (
                    &mut self.planes.y,
                    self.mb_cols * 16,
                    mb_x * 16 + (n % 2) * 8,
                    mb_y * 16 + (n / 2) * 8,
                )
            }
        };
        for (row, src) in samples.chunks_exact(8).enumerate() {
            let start = (y0 + row) * stride + x0;
            plane[start..start + 8].copy_from_slice(src);
        }
    }
}

/// Whether frames of `geometry` can be decoded at all.
fn check_geometry(geometry: Geometry) -> Result<(), StrError> {
    if geometry.is_empty() {
        return Err(StrError::invalid_frame(format!(
            "cannot decode into {geometry} geometry"
        )));
    }
    if geometry.width > MAX_WIDTH || geometry.height > MAX_HEIGHT {
        return Err(StrError::invalid_frame(format!(
            "frame size {geometry} exceeds {MAX_WIDTH}x{MAX_HEIGHT}"
        )));
    }
    Ok(())
}

fn decode_block(
    reader: &mut BitReader<'_>,
    header: &FrameHeader,
    component: usize,
    last_dc: &mut [i32; 3],
    block: &mut [i32; 64],
) -> Result<(), StrError> {
    block[0] = if header.version >= 3 {
        let size = read_dc_size(reader, component == LUMA)?;
        let diff = if size == 0 {
            0
        } else {
            let v = reader.read(size)? as i32;
            if v < 1 << (size - 1) {
                v - (1 << size) + 1
            } else {
                v
            }
        };
        last_dc[component] += diff;
        last_dc[component] * 8
    } else {
        reader.read_signed(10)? * 2 + 1024
    };

    let qscale = header.qscale as i64;
    let lookup = tables::ac_lookup();
    let mut index = 0usize;
    loop {
        let (run, level) = match lookup[reader.peek(16) as usize] {
            AcSymbol::EndOfBlock => {
                reader.skip(tables::EOB_LEN as usize)?;
                return Ok(());
            }
            AcSymbol::Escape => {
                reader.skip(tables::ESCAPE_LEN as usize)?;
                let run = reader.read(6)? as usize;
                let level = reader.read_signed(10)?;
                (run, level)
            }
            AcSymbol::RunLevel { run, level, len } => {
                reader.skip(len as usize)?;
                let level = level as i32;
                if reader.read_bit()? {
                    (run as usize, -level)
                } else {
                    (run as usize, level)
                }
            }
            AcSymbol::Invalid => {
                return Err(StrError::bitstream(format!(
                    "invalid AC code at bit {}",
                    reader.position()
                )));
            }
        };

        index += run + 1;
        if index > 63 {
            return Err(StrError::bitstream("AC run past end of block"));
        }
        let pos = ZIGZAG[index];
        let magnitude = (level.unsigned_abs() as i64 * qscale * QUANT_MATRIX[pos] as i64) >> 3;
        block[pos] = (level.signum() as i64 * magnitude).clamp(COEFF_MIN, COEFF_MAX) as i32;
    }
}

fn read_dc_size(reader: &mut BitReader<'_>, luma: bool) -> Result<u8, StrError> {
    let table = if luma { &DC_LUMA } else { &DC_CHROMA };
    for (size, &(bits, code)) in table.iter().enumerate() {
        if reader.peek(bits) == code as u32 {
            reader.skip(bits as usize)?;
            return Ok(size as u8);
        }
    }
    Err(StrError::bitstream("invalid DC size code"))
}

#[cfg(test)]
#[path = "../tests/mdec_tests.rs"]
mod tests;
