//! Constant tables for the MDEC bitstream.

use std::sync::OnceLock;

/// Zig-zag scan order: position `i` in the bitstream lands at raster index
/// `ZIGZAG[i]` within the 8×8 block.
#[rustfmt::skip]
pub const ZIGZAG: [usize; 64] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Default PlayStation quantisation matrix, raster order.
#[rustfmt::skip]
pub const QUANT_MATRIX: [u16; 64] = [
     2, 16, 19, 22, 26, 27, 29, 34,
    16, 16, 22, 24, 27, 29, 34, 37,
    19, 22, 26, 27, 29, 34, 34, 38,
    22, 22, 26, 27, 29, 34, 37, 40,
    22, 26, 27, 29, 32, 35, 40, 48,
    26, 27, 29, 32, 35, 40, 48, 58,
    26, 27, 29, 34, 38, 46, 56, 69,
    27, 29, 35, 38, 46, 56, 69, 83,
];

/// Luma DC size codes (bits, code) indexed by DC size 0..=11.
#[rustfmt::skip]
pub const DC_LUMA: [(u8, u16); 12] = [
    (3, 0x4), (2, 0x0), (2, 0x1), (3, 0x5), (3, 0x6), (4, 0xe),
    (5, 0x1e), (6, 0x3e), (7, 0x7e), (8, 0xfe), (9, 0x1fe), (9, 0x1ff),
];

/// Chroma DC size codes (bits, code) indexed by DC size 0..=11.
#[rustfmt::skip]
pub const DC_CHROMA: [(u8, u16); 12] = [
    (2, 0x0), (2, 0x1), (2, 0x2), (3, 0x6), (4, 0xe), (5, 0x1e),
    (6, 0x3e), (7, 0x7e), (8, 0xfe), (9, 0x1fe), (10, 0x3fe), (10, 0x3ff),
];

/// End-of-block code `10`.
pub const EOB_CODE: u16 = 0b10;
pub const EOB_LEN: u8 = 2;

/// Escape code `000001`, followed by a 6-bit run and a 10-bit level.
pub const ESCAPE_CODE: u16 = 0b000001;
pub const ESCAPE_LEN: u8 = 6;

/// One run/level variable-length code. The sign bit follows the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcCode {
    pub code: u16,
    pub len: u8,
    pub run: u8,
    pub level: u8,
}

impl AcCode {
    const fn new(code: u16, len: u8, run: u8, level: u8) -> Self {
        Self {
            code,
            len,
            run,
            level,
        }
    }
}

/// MPEG-1 run/level codes (Table B.14, without the first-coefficient
/// variant; MDEC always has a separate DC).
pub const AC_CODES: [AcCode; 111] = [
    AcCode::new(0b11, 2, 0, 1),
    AcCode::new(0b0100, 4, 0, 2),
    AcCode::new(0b00101, 5, 0, 3),
    AcCode::new(0b0000110, 7, 0, 4),
    AcCode::new(0b00100110, 8, 0, 5),
    AcCode::new(0b00100001, 8, 0, 6),
    AcCode::new(0b0000001010, 10, 0, 7),
    AcCode::new(0b000000011101, 12, 0, 8),
    AcCode::new(0b000000011000, 12, 0, 9),
    AcCode::new(0b000000010011, 12, 0, 10),
    AcCode::new(0b000000010000, 12, 0, 11),
    AcCode::new(0b0000000011010, 13, 0, 12),
    AcCode::new(0b0000000011001, 13, 0, 13),
    AcCode::new(0b0000000011000, 13, 0, 14),
    AcCode::new(0b0000000010111, 13, 0, 15),
    AcCode::new(0b00000000011111, 14, 0, 16),
    AcCode::new(0b00000000011110, 14, 0, 17),
    AcCode::new(0b00000000011101, 14, 0, 18),
    AcCode::new(0b00000000011100, 14, 0, 19),
    AcCode::new(0b00000000011011, 14, 0, 20),
    AcCode::new(0b00000000011010, 14, 0, 21),
    AcCode::new(0b00000000011001, 14, 0, 22),
    AcCode::new(0b00000000011000, 14, 0, 23),
    AcCode::new(0b00000000010111, 14, 0, 24),
    AcCode::new(0b00000000010110, 14, 0, 25),
    AcCode::new(0b00000000010101, 14, 0, 26),
    AcCode::new(0b00000000010100, 14, 0, 27),
    AcCode::new(0b00000000010011, 14, 0, 28),
    AcCode::new(0b00000000010010, 14, 0, 29),
    AcCode::new(0b00000000010001, 14, 0, 30),
    AcCode::new(0b00000000010000, 14, 0, 31),
    AcCode::new(0b000000000011000, 15, 0, 32),
    AcCode::new(0b000000000010111, 15, 0, 33),
    AcCode::new(0b000000000010110, 15, 0, 34),
    AcCode::new(0b000000000010101, 15, 0, 35),
    AcCode::new(0b000000000010100, 15, 0, 36),
    AcCode::new(0b000000000010011, 15, 0, 37),
    AcCode::new(0b000000000010010, 15, 0, 38),
    AcCode::new(0b000000000010001, 15, 0, 39),
    AcCode::new(0b000000000010000, 15, 0, 40),
    AcCode::new(0b011, 3, 1, 1),
    AcCode::new(0b000110, 6, 1, 2),
    AcCode::new(0b00100101, 8, 1, 3),
    AcCode::new(0b0000001100, 10, 1, 4),
    AcCode::new(0b000000011011, 12, 1, 5),
    AcCode::new(0b0000000010110, 13, 1, 6),
    AcCode::new(0b0000000010101, 13, 1, 7),
    AcCode::new(0b000000000011111, 15, 1, 8),
    AcCode::new(0b000000000011110, 15, 1, 9),
    AcCode::new(0b000000000011101, 15, 1, 10),
    AcCode::new(0b000000000011100, 15, 1, 11),
    AcCode::new(0b000000000011011, 15, 1, 12),
    AcCode::new(0b000000000011010, 15, 1, 13),
    AcCode::new(0b000000000011001, 15, 1, 14),
    AcCode::new(0b0000000000010011, 16, 1, 15),
    AcCode::new(0b0000000000010010, 16, 1, 16),
    AcCode::new(0b0000000000010001, 16, 1, 17),
    AcCode::new(0b0000000000010000, 16, 1, 18),
    AcCode::new(0b0101, 4, 2, 1),
    AcCode::new(0b0000100, 7, 2, 2),
    AcCode::new(0b0000001011, 10, 2, 3),
    AcCode::new(0b000000010100, 12, 2, 4),
    AcCode::new(0b0000000010100, 13, 2, 5),
    AcCode::new(0b00111, 5, 3, 1),
    AcCode::new(0b00100100, 8, 3, 2),
    AcCode::new(0b000000011100, 12, 3, 3),
    AcCode::new(0b0000000010011, 13, 3, 4),
    AcCode::new(0b00110, 5, 4, 1),
    AcCode::new(0b0000001111, 10, 4, 2),
    AcCode::new(0b000000010010, 12, 4, 3),
    AcCode::new(0b000111, 6, 5, 1),
    AcCode::new(0b0000001001, 10, 5, 2),
    AcCode::new(0b0000000010010, 13, 5, 3),
    AcCode::new(0b000101, 6, 6, 1),
    AcCode::new(0b000000011110, 12, 6, 2),
    AcCode::new(0b0000000000010100, 16, 6, 3),
    AcCode::new(0b000100, 6, 7, 1),
    AcCode::new(0b000000010101, 12, 7, 2),
    AcCode::new(0b0000111, 7, 8, 1),
    AcCode::new(0b000000010001, 12, 8, 2),
    AcCode::new(0b0000101, 7, 9, 1),
    AcCode::new(0b0000000010001, 13, 9, 2),
    AcCode::new(0b00100111, 8, 10, 1),
    AcCode::new(0b0000000010000, 13, 10, 2),
    AcCode::new(0b00100011, 8, 11, 1),
    AcCode::new(0b0000000000011010, 16, 11, 2),
    AcCode::new(0b00100010, 8, 12, 1),
    AcCode::new(0b0000000000011001, 16, 12, 2),
    AcCode::new(0b00100000, 8, 13, 1),
    AcCode::new(0b0000000000011000, 16, 13, 2),
    AcCode::new(0b0000001110, 10, 14, 1),
    AcCode::new(0b0000000000010111, 16, 14, 2),
    AcCode::new(0b0000001101, 10, 15, 1),
    AcCode::new(0b0000000000010110, 16, 15, 2),
    AcCode::new(0b0000001000, 10, 16, 1),
    AcCode::new(0b0000000000010101, 16, 16, 2),
    AcCode::new(0b000000011111, 12, 17, 1),
    AcCode::new(0b000000011010, 12, 18, 1),
    AcCode::new(0b000000011001, 12, 19, 1),
    AcCode::new(0b000000010111, 12, 20, 1),
    AcCode::new(0b000000010110, 12, 21, 1),
    AcCode::new(0b0000000011111, 13, 22, 1),
    AcCode::new(0b0000000011110, 13, 23, 1),
    AcCode::new(0b0000000011101, 13, 24, 1),
    AcCode::new(0b0000000011100, 13, 25, 1),
    AcCode::new(0b0000000011011, 13, 26, 1),
    AcCode::new(0b0000000000011111, 16, 27, 1),
    AcCode::new(0b0000000000011110, 16, 28, 1),
    AcCode::new(0b0000000000011101, 16, 29, 1),
    AcCode::new(0b0000000000011100, 16, 30, 1),
    AcCode::new(0b0000000000011011, 16, 31, 1),
];

/// What a 16-bit window at the read position decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcSymbol {
    /// Not a valid prefix.
    Invalid,
    EndOfBlock,
    Escape,
    /// Run/level pair; `len` includes the code but not the sign bit.
    RunLevel { run: u8, level: u8, len: u8 },
}

/// Lookup indexed by the next 16 bits of the stream. The longest code is
/// 16 bits, so every code resolves in a single probe.
pub fn ac_lookup() -> &'static [AcSymbol] {
    static TABLE: OnceLock<Vec<AcSymbol>> = OnceLock::new();
    TABLE.get_or_init(build_ac_lookup)
}

fn build_ac_lookup() -> Vec<AcSymbol> {
    let mut table = vec![AcSymbol::Invalid; 1 << 16];
    let mut fill = |code: u16, len: u8, sym: AcSymbol| {
        let shift = 16 - len as u32;
        let start = (code as usize) << shift;
        let end = start + (1usize << shift);
        table[start..end].fill(sym);
    };

    fill(EOB_CODE, EOB_LEN, AcSymbol::EndOfBlock);
    fill(ESCAPE_CODE, ESCAPE_LEN, AcSymbol::Escape);
    for c in AC_CODES.iter() {
        fill(
            c.code,
            c.len,
            AcSymbol::RunLevel {
                run: c.run,
                level: c.level,
                len: c.len,
            },
        );
    }
    table
}
