//! Synthetic STR streams for the conversion tests.

#![allow(dead_code)]

pub const SECTOR: usize = 2352;
pub const CHUNK_DATA: usize = 2016;

/// Packs bits MSB-first into 16-bit words, emitted little-endian.
pub struct BitWriter {
    words: Vec<u16>,
    cur: u32,
    n: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            cur: 0,
            n: 0,
        }
    }

    pub fn put(&mut self, value: u32, bits: u32) {
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

    pub fn finish(mut self) -> Vec<u8> {
        if self.n > 0 {
            self.words.push((self.cur << (16 - self.n)) as u16);
        }
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

/// A version-2 MDEC frame where every block has the same DC value and no
/// AC coefficients. DC 0 decodes to mid-gray.
pub fn flat_frame(width: u32, height: u32, dc: i32) -> Vec<u8> {
    let mbs = width.div_ceil(16) * height.div_ceil(16);
    let mut w = BitWriter::new();
    for _ in 0..mbs * 6 {
        w.put((dc as u32) & 0x3FF, 10);
        w.put(0b10, 2); // end of block
    }
    let mut data = Vec::new();
    for word in [0x0100u16, 0x3800, 1, 2] {
        data.extend_from_slice(&word.to_le_bytes());
    }
    data.extend(w.finish());
    data
}

pub fn gray_frame(width: u32, height: u32) -> Vec<u8> {
    flat_frame(width, height, 0)
}

/// A frame that fails its bitstream header check.
pub fn broken_frame() -> Vec<u8> {
    let mut data = gray_frame(32, 32);
    data[2] = 0x12;
    data
}

/// Sector header prefix with the given submode byte.
pub fn raw_sector(submode: u8) -> Vec<u8> {
    let mut s = vec![0u8; SECTOR];
    s[1..12].fill(0xFF);
    s[12..15].copy_from_slice(&[0x00, 0x02, 0x00]);
    s[15] = 2;
    s[16] = 1;
    s[18] = submode;
    s.copy_within(16..20, 20);
    s
}

/// A sector with the submode video bit set.
pub fn video_sector() -> Vec<u8> {
    raw_sector(0x04 | 0x08)
}

/// A well-formed sector without the video bit.
pub fn audio_sector() -> Vec<u8> {
    raw_sector(0x60)
}

/// Split a compressed frame into video sectors, one per 2016-byte chunk.
pub fn frame_sectors(frame_number: u32, width: u16, height: u16, frame: &[u8]) -> Vec<Vec<u8>> {
    let chunks: Vec<&[u8]> = frame.chunks(CHUNK_DATA).collect();
    let count = chunks.len() as u16;
    chunks
        .iter()
        .enumerate()
        .map(|(i, data)| {
            let mut s = video_sector();
            let p = &mut s[24..];
            p[0..2].copy_from_slice(&0x0160u16.to_le_bytes());
            p[2..4].copy_from_slice(&0x8001u16.to_le_bytes());
            p[4..6].copy_from_slice(&(i as u16).to_le_bytes());
            p[6..8].copy_from_slice(&count.to_le_bytes());
            p[8..12].copy_from_slice(&frame_number.to_le_bytes());
            p[12..16].copy_from_slice(&(frame.len() as u32).to_le_bytes());
            p[16..18].copy_from_slice(&width.to_le_bytes());
            p[18..20].copy_from_slice(&height.to_le_bytes());
            p[32..32 + data.len()].copy_from_slice(data);
            s
        })
        .collect()
}

/// `frame` padded with zero bytes to `len`, so it spans several chunks.
/// The decoder stops after the last macroblock and never reads the padding.
pub fn padded(mut frame: Vec<u8>, len: usize) -> Vec<u8> {
    frame.resize(len.max(frame.len()), 0);
    frame
}

pub fn concat(sectors: impl IntoIterator<Item = Vec<u8>>) -> Vec<u8> {
    sectors.into_iter().flatten().collect()
}

pub fn u32_at(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}
