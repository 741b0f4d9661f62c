//! Quick look at an STR file without decoding it.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use stravi_core::Geometry;
use stravi_psx::sector::{Msf, XaSubheader, sector_address};
use stravi_psx::{FrameHeader, SectorReader, extract_payload, frames, is_video_sector};

use crate::error::ConvertError;

/// What one pass over an STR stream found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamInfo {
    /// Complete sectors in the stream.
    pub sectors: u64,
    pub video_sectors: u64,
    /// Audio, data and damaged sectors.
    pub other_sectors: u64,
    /// Frames that assembled completely.
    pub frames: u64,
    /// Frames that were started but never completed.
    pub frames_dropped: u64,
    /// Chunks with no matching frame open.
    pub orphan_chunks: u64,
    /// Address of the first video sector, when its header carries one.
    pub first_video_address: Option<Msf>,
    /// Geometry declared by the first complete frame.
    pub geometry: Option<Geometry>,
    pub first_frame: Option<u32>,
    pub last_frame: Option<u32>,
    /// XA channels the video sectors were found on.
    pub channels: BTreeSet<u8>,
    /// Bitstream versions seen in frame headers.
    pub mdec_versions: BTreeSet<u16>,
    /// Frames whose bitstream header could not be read.
    pub bad_headers: u64,
    pub trailing_bytes: u64,
    pub total_bytes: u64,
}

impl StreamInfo {
    /// Playing time at `fps`, in seconds.
    pub fn duration_secs(&self, fps: u32) -> Option<f64> {
        (fps > 0).then(|| self.frames as f64 / fps as f64)
    }
}

/// Probe an STR file on disk.
pub fn probe_file(path: &Path) -> Result<StreamInfo, ConvertError> {
    let file = File::open(path).map_err(|e| ConvertError::file(path, e))?;
    probe_stream(BufReader::new(file))
}

/// Scan a sector stream and assemble its frames, reading only headers.
pub fn probe_stream<R: Read>(reader: R) -> Result<StreamInfo, ConvertError> {
    let mut sectors = SectorReader::new(reader);
    let mut info = StreamInfo::default();

    let mut read_error = None;
    let mut video_sectors = 0u64;
    let mut other_sectors = 0u64;
    let mut channels = BTreeSet::new();
    let mut first_video_address = None;

    let payloads = sectors
        .by_ref()
        .map_while(|sector| match sector {
            Ok(s) => Some(s),
            Err(e) => {
                read_error = Some(e);
                None
            }
        })
        .filter_map(|sector| {
            if is_video_sector(&sector) {
                if video_sectors == 0 {
                    first_video_address = sector_address(&sector);
                }
                video_sectors += 1;
                if let Some(sub) = XaSubheader::parse(&sector) {
                    channels.insert(sub.channel);
                }
                Some(extract_payload(&sector).to_vec())
            } else {
                other_sectors += 1;
                None
            }
        });

    let mut stream = frames(payloads);
    stream.assembler_mut().count_drops_only();
    for frame in stream.by_ref() {
        info.frames += 1;
        info.first_frame.get_or_insert(frame.frame_number);
        info.last_frame = Some(frame.frame_number);
        info.geometry.get_or_insert(frame.geometry);
        match FrameHeader::parse(&frame.data) {
            Ok(header) => {
                info.mdec_versions.insert(header.version);
            }
            Err(e) => {
                log::debug!("Frame {}: {}", frame.frame_number, e);
                info.bad_headers += 1;
            }
        }
    }
    info.frames_dropped = stream.assembler().frames_dropped();
    info.orphan_chunks = stream.assembler().orphan_chunks();
    drop(stream);

    if let Some(e) = read_error {
        return Err(e.into());
    }

    info.video_sectors = video_sectors;
    info.other_sectors = other_sectors;
    info.channels = channels;
    info.first_video_address = first_video_address;
    info.sectors = sectors.sectors_read();
    info.trailing_bytes = sectors.trailing_bytes() as u64;
    info.total_bytes = sectors.bytes_read();
    Ok(info)
}

#[cfg(test)]
#[path = "tests/probe_tests.rs"]
mod tests;
