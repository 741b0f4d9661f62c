//! Raw CD-ROM XA sector handling.
//!
//! Splits an input stream into 2352-byte raw sectors, decides which of
//! them carry video, and exposes the payload that follows the 24-byte
//! sync/header/subheader prefix.

use std::fmt;
use std::io::{self, Read};

use stravi_core::util::bcd_to_decimal;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Raw CD sector size (sync + header + subheader + data + EDC/ECC).
pub const RAW_SECTOR_SIZE: usize = 2352;

/// Offset of the payload within a raw sector.
/// 12 (sync) + 4 (header) + 8 (subheader) = 24.
pub const PAYLOAD_OFFSET: usize = 24;

/// Bytes from the payload offset to the end of the sector.
pub const PAYLOAD_SIZE: usize = RAW_SECTOR_SIZE - PAYLOAD_OFFSET;

/// First byte of the sync field; must be 0x00.
const SYNC_START_OFFSET: usize = 0;

/// Marker byte that closes the sync run in this stream convention; must be 0xFF.
const SYNC_MARKER_OFFSET: usize = 11;
const SYNC_MARKER: u8 = 0xFF;

/// Header bytes 12..15: BCD minute/second/frame address, then the mode byte.
const ADDRESS_OFFSET: usize = 12;
const MODE_OFFSET: usize = 15;
const MODE_2: u8 = 2;

/// First copy of the XA subheader (file, channel, submode, coding info).
const SUBHEADER_OFFSET: usize = 16;
const SUBMODE_OFFSET: usize = 18;

/// Submode bit marking a sector that carries video data.
pub const SUBMODE_VIDEO: u8 = 0x04;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Result of inspecting one raw sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorKind {
    /// All four header checks pass.
    Video,
    /// Input length is not [`RAW_SECTOR_SIZE`].
    WrongLength(usize),
    /// Byte 0 is not 0x00.
    BadSyncStart(u8),
    /// Byte 11 is not the 0xFF marker.
    BadSyncMarker(u8),
    /// Byte 15 is not mode 2.
    NotMode2(u8),
    /// The submode video bit is clear (audio, padding, data).
    NotVideo { submode: u8 },
}

impl SectorKind {
    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video)
    }
}

impl fmt::Display for SectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::WrongLength(n) => write!(f, "wrong length ({n} bytes)"),
            Self::BadSyncStart(b) => write!(f, "bad sync start 0x{b:02X}"),
            Self::BadSyncMarker(b) => write!(f, "bad sync marker 0x{b:02X}"),
            Self::NotMode2(m) => write!(f, "mode {m}, not mode 2"),
            Self::NotVideo { submode } => write!(f, "non-video submode 0x{submode:02X}"),
        }
    }
}

/// Inspect a sector and say why it is or is not a video sector.
pub fn classify_sector(sector: &[u8]) -> SectorKind {
    if sector.len() != RAW_SECTOR_SIZE {
        return SectorKind::WrongLength(sector.len());
    }
    if sector[SYNC_START_OFFSET] != 0x00 {
        return SectorKind::BadSyncStart(sector[SYNC_START_OFFSET]);
    }
    if sector[SYNC_MARKER_OFFSET] != SYNC_MARKER {
        return SectorKind::BadSyncMarker(sector[SYNC_MARKER_OFFSET]);
    }
    if sector[MODE_OFFSET] != MODE_2 {
        return SectorKind::NotMode2(sector[MODE_OFFSET]);
    }
    let submode = sector[SUBMODE_OFFSET];
    if submode & SUBMODE_VIDEO == 0 {
        return SectorKind::NotVideo { submode };
    }
    SectorKind::Video
}

/// True iff `sector` is exactly one raw sector and passes all four
/// header checks. Never fails: anything else is simply not video.
pub fn is_video_sector(sector: &[u8]) -> bool {
    classify_sector(sector).is_video()
}

/// Return the payload of a sector already classified as video.
///
/// No validation is repeated here. A slice shorter than a raw sector
/// yields whatever follows the header prefix.
pub fn extract_payload(sector: &[u8]) -> &[u8] {
    let end = sector.len().min(RAW_SECTOR_SIZE);
    sector.get(PAYLOAD_OFFSET..end).unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Header details (diagnostics only)
// ---------------------------------------------------------------------------

/// Sector address in minutes/seconds/frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msf {
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl Msf {
    /// Absolute sector index (75 frames per second).
    pub fn to_lba(&self) -> u32 {
        (self.minute as u32 * 60 + self.second as u32) * 75 + self.frame as u32
    }
}

impl fmt::Display for Msf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minute, self.second, self.frame)
    }
}

/// Decode the BCD address in the sector header, if it is well formed.
pub fn sector_address(sector: &[u8]) -> Option<Msf> {
    let bytes = sector.get(ADDRESS_OFFSET..ADDRESS_OFFSET + 3)?;
    Some(Msf {
        minute: bcd_to_decimal(bytes[0])?,
        second: bcd_to_decimal(bytes[1])?,
        frame: bcd_to_decimal(bytes[2])?,
    })
}

/// The first copy of the CD-ROM XA subheader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XaSubheader {
    pub file: u8,
    pub channel: u8,
    pub submode: u8,
    pub coding_info: u8,
}

impl XaSubheader {
    pub fn parse(sector: &[u8]) -> Option<Self> {
        let b = sector.get(SUBHEADER_OFFSET..SUBHEADER_OFFSET + 4)?;
        Some(Self {
            file: b[0],
            channel: b[1],
            submode: b[2],
            coding_info: b[3],
        })
    }

    pub fn is_video(&self) -> bool {
        self.submode & SUBMODE_VIDEO != 0
    }
}

// ---------------------------------------------------------------------------
// Sector reading
// ---------------------------------------------------------------------------

/// Reads consecutive raw sectors from a byte stream.
///
/// A trailing run shorter than one sector ends the stream quietly; its
/// length is available from [`trailing_bytes`](Self::trailing_bytes).
pub struct SectorReader<R> {
    inner: R,
    buf: Vec<u8>,
    sectors_read: u64,
    trailing_bytes: usize,
    done: bool,
}

impl<R: Read> SectorReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; RAW_SECTOR_SIZE],
            sectors_read: 0,
            trailing_bytes: 0,
            done: false,
        }
    }

    /// Read the next full sector into the internal buffer.
    ///
    /// Returns `Ok(None)` at end of stream, including when fewer than
    /// [`RAW_SECTOR_SIZE`] bytes remain.
    pub fn next_sector(&mut self) -> io::Result<Option<&[u8]>> {
        if self.done {
            return Ok(None);
        }

        let mut filled = 0;
        while filled < RAW_SECTOR_SIZE {
            match self.inner.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Err(e);
                }
            }
        }

        if filled < RAW_SECTOR_SIZE {
            self.done = true;
            self.trailing_bytes = filled;
            if filled > 0 {
                log::debug!(
                    "Ignoring {} trailing bytes after sector {}",
                    filled,
                    self.sectors_read
                );
            }
            return Ok(None);
        }

        self.sectors_read += 1;
        Ok(Some(&self.buf))
    }

    /// Number of complete sectors read so far.
    pub fn sectors_read(&self) -> u64 {
        self.sectors_read
    }

    /// Bytes consumed from the stream, including an ignored partial tail.
    pub fn bytes_read(&self) -> u64 {
        self.sectors_read * RAW_SECTOR_SIZE as u64 + self.trailing_bytes as u64
    }

    /// Size of the incomplete sector at the end of the stream, if any.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing_bytes
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for SectorReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_sector() {
            Ok(Some(sector)) => Some(Ok(sector.to_vec())),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
#[path = "tests/sector_tests.rs"]
mod tests;
