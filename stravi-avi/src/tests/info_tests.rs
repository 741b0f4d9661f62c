use super::*;
use crate::muxer::{AviConfig, AviMuxer};
use std::io::{Cursor, Write};
use stravi_core::{Geometry, RgbFrame};

fn written(geometry: Geometry, fps: u32, frames: usize) -> Vec<u8> {
    let mut muxer = AviMuxer::open(Cursor::new(Vec::new()), AviConfig::new(geometry, fps)).unwrap();
    for _ in 0..frames {
        muxer.write_frame(&RgbFrame::new(geometry)).unwrap();
    }
    muxer.finalize().unwrap().0.into_inner()
}

#[test]
fn test_reads_back_muxer_output() {
    let buf = written(Geometry::new(48, 32), 15, 3);
    let info = AviInfo::read(&mut Cursor::new(&buf)).unwrap();

    assert_eq!(info.file_size, buf.len() as u64);
    assert_eq!(info.riff_size as usize, buf.len() - 8);
    assert_eq!(info.width, 48);
    assert_eq!(info.height, 32);
    assert_eq!(info.total_frames, 3);
    assert_eq!(info.stream_length, 3);
    assert_eq!(info.frame_chunks, 3);
    assert_eq!(info.frame_bytes, 3 * 48 * 3 * 32);
    assert_eq!(info.index_entries, Some(3));
    assert_eq!(info.streams, 1);
    assert_eq!(info.bit_count, 24);
    assert_eq!(info.compression, 0);
    assert_eq!(info.stream_type, Some(chunk_ids::VIDS));
    assert_eq!(info.handler, Some(chunk_ids::DIB));
    assert_eq!(info.fps(), Some(15.0));
    assert!(info.has_index());
}

#[test]
fn test_zero_frame_file() {
    let buf = written(Geometry::new(320, 240), 15, 0);
    let info = AviInfo::read(&mut Cursor::new(&buf)).unwrap();
    assert_eq!(info.total_frames, 0);
    assert_eq!(info.frame_chunks, 0);
    assert_eq!(info.movi_size, Some(4));
    assert_eq!(info.index_entries, Some(0));
}

#[test]
fn test_from_path() {
    let buf = written(Geometry::new(16, 16), 24, 1);
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&buf).unwrap();
    let info = AviInfo::from_path(tmp.path()).unwrap();
    assert_eq!(info.frame_chunks, 1);
    assert_eq!(info.rate, 24);
}

#[test]
fn test_rejects_non_riff() {
    let err = AviInfo::read(&mut Cursor::new(b"not an avi file at all".to_vec())).unwrap_err();
    assert!(matches!(err, AviError::InvalidFile(_)));

    let mut buf = written(Geometry::new(16, 16), 15, 0);
    buf[8..12].copy_from_slice(b"WAVE");
    assert!(matches!(
        AviInfo::read(&mut Cursor::new(buf)),
        Err(AviError::InvalidFile(_))
    ));
}

#[test]
fn test_rejects_short_input() {
    assert!(matches!(
        AviInfo::read(&mut Cursor::new(b"RIFF".to_vec())),
        Err(AviError::InvalidFile(_))
    ));
}

#[test]
fn test_rejects_overrunning_chunk() {
    let mut buf = written(Geometry::new(16, 16), 15, 0);
    // Inflate the avih size past the end of hdrl.
    buf[28..32].copy_from_slice(&10_000u32.to_le_bytes());
    assert!(matches!(
        AviInfo::read(&mut Cursor::new(buf)),
        Err(AviError::InvalidFile(_))
    ));
}
