use super::*;

/// Packs bits MSB-first into 16-bit words, emitted little-endian.
struct BitWriter {
    words: Vec<u16>,
    cur: u32,
    n: u32,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            words: Vec::new(),
            cur: 0,
            n: 0,
        }
    }

    fn put(&mut self, value: u32, bits: u32) {
        for i in (0..bits).rev() {
            self.cur = (self.cur << 1) | ((value >> i) & 1);
            self.n += 1;
            if self.n == 16 {
                self.words.push(self.cur as u16);
                self.cur = 0;
                self.n = 0;
            }
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.n > 0 {
            self.words.push((self.cur << (16 - self.n)) as u16);
        }
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

/// The RGB triple at `(x, y)`.
fn px(rgb: &RgbFrame, x: u32, y: u32) -> [u8; 3] {
    let p = &rgb.row(y)[x as usize * 3..x as usize * 3 + 3];
    [p[0], p[1], p[2]]
}

fn header_bytes(qscale: u16, version: u16) -> Vec<u8> {
    let mut v = Vec::new();
    for word in [0x0100u16, MDEC_MAGIC, qscale, version] {
        v.extend_from_slice(&word.to_le_bytes());
    }
    v
}

fn frame(qscale: u16, version: u16, body: impl FnOnce(&mut BitWriter)) -> Vec<u8> {
    let mut w = BitWriter::new();
    body(&mut w);
    let mut data = header_bytes(qscale, version);
    data.extend(w.finish());
    data
}

fn eob(w: &mut BitWriter) {
    w.put(0b10, 2);
}

/// Version 1/2 DC: signed 10 bits.
fn dc_v2(w: &mut BitWriter, dc: i32) {
    w.put((dc as u32) & 0x3FF, 10);
}

/// Version 3 DC: size code then the differential in `size` bits.
fn dc_v3(w: &mut BitWriter, diff: i32, luma: bool) {
    let size = 32 - diff.unsigned_abs().leading_zeros();
    let (bits, code) = if luma {
        tables::DC_LUMA[size as usize]
    } else {
        tables::DC_CHROMA[size as usize]
    };
    w.put(code as u32, bits as u32);
    if size > 0 {
        let v = if diff < 0 { diff + (1 << size) - 1 } else { diff };
        w.put(v as u32, size);
    }
}

/// A version-2 macroblock where every block is DC-only.
fn flat_mb(w: &mut BitWriter, cr: i32, cb: i32, y: [i32; 4]) {
    for dc in [cr, cb, y[0], y[1], y[2], y[3]] {
        dc_v2(w, dc);
        eob(w);
    }
}

fn gray_frame(geometry: Geometry) -> Vec<u8> {
    let mbs = (geometry.width as usize).div_ceil(16) * (geometry.height as usize).div_ceil(16);
    frame(1, 2, |w| {
        for _ in 0..mbs {
            flat_mb(w, 0, 0, [0; 4]);
        }
    })
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[test]
fn test_header_parse() {
    let data = header_bytes(7, 2);
    let h = FrameHeader::parse(&data).unwrap();
    assert_eq!(h.code_count, 0x0100);
    assert_eq!(h.qscale, 7);
    assert_eq!(h.version, 2);
}

#[test]
fn test_header_too_small() {
    let data = header_bytes(1, 2);
    let err = FrameHeader::parse(&data[..5]).unwrap_err();
    assert!(matches!(
        err,
        StrError::TooSmall {
            expected: 8,
            actual: 5
        }
    ));
}

#[test]
fn test_header_bad_magic() {
    let mut data = header_bytes(1, 2);
    data[3] = 0x39;
    assert!(matches!(
        FrameHeader::parse(&data),
        Err(StrError::InvalidFrame(_))
    ));
}

#[test]
fn test_header_unsupported_version() {
    assert!(matches!(
        FrameHeader::parse(&header_bytes(1, 4)),
        Err(StrError::UnsupportedVersion(4))
    ));
    assert!(matches!(
        FrameHeader::parse(&header_bytes(1, 0)),
        Err(StrError::UnsupportedVersion(0))
    ));
}

// ---------------------------------------------------------------------------
// DC-only frames
// ---------------------------------------------------------------------------

#[test]
fn test_zero_dc_is_mid_gray() {
    let geometry = Geometry::new(16, 16);
    let mut dec = MdecDecoder::new(geometry).unwrap();
    let rgb = dec.decode(&gray_frame(geometry)).unwrap();
    assert_eq!(rgb.geometry(), geometry);
    assert!(rgb.data().iter().all(|&b| b == 128));
}

#[test]
fn test_luma_dc() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let data = frame(1, 2, |w| flat_mb(w, 0, 0, [100; 4]));
    let rgb = dec.decode(&data).unwrap();
    // (2 * 100 + 1024) / 8
    assert_eq!(px(&rgb, 0, 0), [153, 153, 153]);
    assert_eq!(px(&rgb, 15, 15), [153, 153, 153]);
}

#[test]
fn test_chroma_dc() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let data = frame(1, 2, |w| flat_mb(w, 200, 0, [0; 4]));
    let rgb = dec.decode(&data).unwrap();
    assert_eq!(px(&rgb, 7, 9), [198, 92, 128]);
}

#[test]
fn test_luma_block_order() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let data = frame(1, 2, |w| flat_mb(w, 0, 0, [0, 40, 80, 120]));
    let rgb = dec.decode(&data).unwrap();
    assert_eq!(px(&rgb, 0, 0)[0], 128);
    assert_eq!(px(&rgb, 8, 0)[0], 138);
    assert_eq!(px(&rgb, 0, 8)[0], 148);
    assert_eq!(px(&rgb, 8, 8)[0], 158);
}

#[test]
fn test_macroblocks_are_column_major() {
    let mut dec = MdecDecoder::new(Geometry::new(32, 32)).unwrap();
    let data = frame(1, 2, |w| {
        for dc in [0, 40, 80, 120] {
            flat_mb(w, 0, 0, [dc; 4]);
        }
    });
    let rgb = dec.decode(&data).unwrap();
    assert_eq!(px(&rgb, 0, 0)[0], 128); // first: top-left
    assert_eq!(px(&rgb, 0, 16)[0], 138); // second: bottom-left
    assert_eq!(px(&rgb, 16, 0)[0], 148); // third: top-right
    assert_eq!(px(&rgb, 16, 16)[0], 158);
}

#[test]
fn test_output_is_cropped() {
    let geometry = Geometry::new(24, 8);
    let mut dec = MdecDecoder::new(geometry).unwrap();
    let rgb = dec.decode(&gray_frame(geometry)).unwrap();
    assert_eq!(rgb.width(), 24);
    assert_eq!(rgb.height(), 8);
    assert_eq!(rgb.data().len(), 24 * 8 * 3);
}

// ---------------------------------------------------------------------------
// Version 3 DC prediction
// ---------------------------------------------------------------------------

#[test]
fn test_v3_dc_prediction() {
    let mut dec = MdecDecoder::new(Geometry::new(32, 16)).unwrap();
    let data = frame(1, 3, |w| {
        for _ in 0..2 {
            dc_v3(w, 10, false); // Cr
            eob(w);
            dc_v3(w, 0, false); // Cb
            eob(w);
            for _ in 0..4 {
                dc_v3(w, 0, true);
                eob(w);
            }
        }
    });
    let rgb = dec.decode(&data).unwrap();
    // Cr predictor 128 -> 138 -> 148 across the two macroblocks.
    assert_eq!(px(&rgb, 0, 0), [142, 121, 128]);
    assert_eq!(px(&rgb, 16, 0)[0], 156);
}

#[test]
fn test_v3_negative_diff_and_reset_per_frame() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let data = frame(1, 3, |w| {
        dc_v3(w, 0, false);
        eob(w);
        dc_v3(w, 0, false);
        eob(w);
        dc_v3(w, -40, true);
        eob(w);
        for _ in 0..3 {
            dc_v3(w, 0, true);
            eob(w);
        }
    });
    // Decoding twice gives the same result: predictors restart at 128.
    for _ in 0..2 {
        let rgb = dec.decode(&data).unwrap();
        assert_eq!(px(&rgb, 0, 0)[0], 88);
        assert_eq!(px(&rgb, 15, 15)[0], 88);
    }
}

// ---------------------------------------------------------------------------
// AC coefficients
// ---------------------------------------------------------------------------

/// One macroblock whose first luma block carries `ac` after its DC.
fn mb_with_ac(ac: impl Fn(&mut BitWriter)) -> Vec<u8> {
    frame(8, 2, |w| {
        for i in 0..6 {
            dc_v2(w, 0);
            if i == 2 {
                ac(w);
            }
            eob(w);
        }
    })
}

#[test]
fn test_ac_horizontal_gradient() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();

    // Run 0, level 1, positive.
    let rgb = dec.decode(&mb_with_ac(|w| w.put(0b110, 3))).unwrap();
    assert!(px(&rgb, 0, 3)[0] > px(&rgb, 7, 3)[0]);
    // Blocks without AC stay flat.
    assert_eq!(px(&rgb, 8, 0)[0], 128);

    // Same code with the sign bit set flips the gradient.
    let rgb = dec.decode(&mb_with_ac(|w| w.put(0b111, 3))).unwrap();
    assert!(px(&rgb, 0, 3)[0] < px(&rgb, 7, 3)[0]);
}

#[test]
fn test_escape_matches_table_code() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let table = dec.decode(&mb_with_ac(|w| w.put(0b110, 3))).unwrap();
    let escaped = dec
        .decode(&mb_with_ac(|w| {
            w.put(0b000001, 6);
            w.put(0, 6);
            w.put(1, 10);
        }))
        .unwrap();
    assert_eq!(table, escaped);
}

#[test]
fn test_run_skips_positions() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    // Run 1, level 1 ("011" + sign) lands on zig-zag position 2, the
    // first vertical frequency: top brighter than bottom, rows flat.
    let rgb = dec.decode(&mb_with_ac(|w| w.put(0b0110, 4))).unwrap();
    assert!(px(&rgb, 3, 0)[0] > px(&rgb, 3, 7)[0]);
    assert_eq!(px(&rgb, 0, 0), px(&rgb, 7, 0));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_truncated_bitstream() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let data = frame(1, 2, |w| {
        dc_v2(w, 0);
        eob(w);
    });
    assert!(matches!(dec.decode(&data), Err(StrError::Bitstream(_))));
}

#[test]
fn test_header_only_frame() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    assert!(matches!(
        dec.decode(&header_bytes(1, 2)),
        Err(StrError::Bitstream(_))
    ));
}

#[test]
fn test_invalid_ac_code() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let data = frame(1, 2, |w| {
        dc_v2(w, 0);
        w.put(0, 16);
        w.put(0, 16);
    });
    assert!(matches!(dec.decode(&data), Err(StrError::Bitstream(_))));
}

#[test]
fn test_run_past_end_of_block() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let data = mb_with_ac(|w| {
        w.put(0b000001, 6);
        w.put(63, 6);
        w.put(1, 10);
    });
    assert!(matches!(dec.decode(&data), Err(StrError::Bitstream(_))));
}

#[test]
fn test_decoder_recovers_after_error() {
    let geometry = Geometry::new(16, 16);
    let mut dec = MdecDecoder::new(geometry).unwrap();
    assert!(dec.decode(&header_bytes(1, 2)).is_err());
    assert!(dec.decode(&gray_frame(geometry)).is_ok());
}

#[test]
fn test_empty_geometry_rejected() {
    assert!(matches!(
        MdecDecoder::new(Geometry::new(0, 240)),
        Err(StrError::InvalidFrame(_))
    ));
}

#[test]
fn test_oversized_geometry_rejected() {
    for geometry in [
        Geometry::new(33000, 16),
        Geometry::new(65535, 65535),
        Geometry::new(MAX_WIDTH + 16, 16),
        Geometry::new(16, MAX_HEIGHT + 16),
    ] {
        assert!(
            matches!(MdecDecoder::new(geometry), Err(StrError::InvalidFrame(_))),
            "{geometry}"
        );
    }
    assert!(MdecDecoder::new(Geometry::new(MAX_WIDTH, MAX_HEIGHT)).is_ok());
}

// ---------------------------------------------------------------------------
// Dequantisation
// ---------------------------------------------------------------------------

#[test]
fn test_huge_qscale_saturates() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let data = frame(0xFFFF, 2, |w| {
        for i in 0..6 {
            dc_v2(w, 0);
            if i == 2 {
                // Escape to the last position with the largest level.
                w.put(0b000001, 6);
                w.put(62, 6);
                w.put(511, 10);
            }
            eob(w);
        }
    });
    let rgb = dec.decode(&data).unwrap();
    assert_eq!(rgb.geometry(), Geometry::new(16, 16));
    // Other blocks are untouched by the saturated coefficient.
    assert_eq!(px(&rgb, 8, 0)[0], 128);
}

#[test]
fn test_negative_level_saturates() {
    let mut dec = MdecDecoder::new(Geometry::new(16, 16)).unwrap();
    let data = frame(0xFFFF, 2, |w| {
        for i in 0..6 {
            dc_v2(w, 0);
            if i == 2 {
                w.put(0b000001, 6);
                w.put(0, 6);
                w.put((-512i32 as u32) & 0x3FF, 10);
            }
            eob(w);
        }
    });
    assert!(dec.decode(&data).is_ok());
}
