//! Builders for synthetic sectors and payloads.

use crate::chunk::{CHUNK_DATA_SIZE, CHUNK_HEADER_SIZE, STR_MAGIC, STR_VIDEO_TYPE};
use crate::sector::{PAYLOAD_OFFSET, PAYLOAD_SIZE, RAW_SECTOR_SIZE, SUBMODE_VIDEO};

/// A raw sector that passes every video check, payload zeroed.
pub fn video_sector() -> Vec<u8> {
    let mut s = vec![0u8; RAW_SECTOR_SIZE];
    s[1..11].fill(0xFF);
    s[11] = 0xFF;
    s[12..15].copy_from_slice(&[0x00, 0x02, 0x16]);
    s[15] = 2;
    s[16] = 1; // file
    s[18] = SUBMODE_VIDEO | 0x08;
    s.copy_within(16..20, 20);
    s
}

/// Chunk header followed by `data` (padded to a full payload).
pub fn payload(
    frame_number: u32,
    chunk_number: u16,
    chunk_count: u16,
    frame_size: u32,
    data: &[u8],
) -> Vec<u8> {
    let mut p = vec![0u8; PAYLOAD_SIZE];
    p[0..2].copy_from_slice(&STR_MAGIC.to_le_bytes());
    p[2..4].copy_from_slice(&STR_VIDEO_TYPE.to_le_bytes());
    p[4..6].copy_from_slice(&chunk_number.to_le_bytes());
    p[6..8].copy_from_slice(&chunk_count.to_le_bytes());
    p[8..12].copy_from_slice(&frame_number.to_le_bytes());
    p[12..16].copy_from_slice(&frame_size.to_le_bytes());
    p[16..18].copy_from_slice(&320u16.to_le_bytes());
    p[18..20].copy_from_slice(&240u16.to_le_bytes());
    let n = data.len().min(CHUNK_DATA_SIZE);
    p[CHUNK_HEADER_SIZE..CHUNK_HEADER_SIZE + n].copy_from_slice(&data[..n]);
    p
}

/// A chunk filled with `fill`.
pub fn filled_payload(
    frame_number: u32,
    chunk_number: u16,
    chunk_count: u16,
    frame_size: u32,
    fill: u8,
) -> Vec<u8> {
    payload(
        frame_number,
        chunk_number,
        chunk_count,
        frame_size,
        &[fill; CHUNK_DATA_SIZE],
    )
}

/// Place a payload into a video sector.
pub fn sector_with_payload(payload: &[u8]) -> Vec<u8> {
    let mut s = video_sector();
    s[PAYLOAD_OFFSET..PAYLOAD_OFFSET + payload.len()].copy_from_slice(payload);
    s
}
