use stravi_core::StrError;

/// Bit reader over an MDEC bitstream.
///
/// The stream is a sequence of little-endian 16-bit words; bits are
/// consumed from the most significant bit of each word down.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    total_bits: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            total_bits: data.len().div_ceil(2) * 16,
        }
    }

    /// Current position in bits from the start of `data`.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn bits_left(&self) -> usize {
        self.total_bits.saturating_sub(self.pos)
    }

    /// Skip `n` bits.
    pub fn skip(&mut self, n: usize) -> Result<(), StrError> {
        if n > self.bits_left() {
            return Err(StrError::bitstream("unexpected end of frame data"));
        }
        self.pos += n;
        Ok(())
    }

    fn word(&self, index: usize) -> u32 {
        let lo = self.data.get(index * 2).copied().unwrap_or(0);
        let hi = self.data.get(index * 2 + 1).copied().unwrap_or(0);
        u16::from_le_bytes([lo, hi]) as u32
    }

    /// Look at the next `n` bits (1..=16) without consuming them.
    /// Bits past the end of the stream read as zero.
    pub fn peek(&self, n: u8) -> u32 {
        debug_assert!((1..=16).contains(&n));
        let index = self.pos / 16;
        let offset = (self.pos % 16) as u32;
        let window = (self.word(index) << 16) | self.word(index + 1);
        (window << offset) >> (32 - n as u32)
    }

    /// Read `n` bits (0..=16) as an unsigned value.
    pub fn read(&mut self, n: u8) -> Result<u32, StrError> {
        if n == 0 {
            return Ok(0);
        }
        if n as usize > self.bits_left() {
            return Err(StrError::bitstream("unexpected end of frame data"));
        }
        let v = self.peek(n);
        self.pos += n as usize;
        Ok(v)
    }

    /// Read `n` bits as a two's-complement signed value.
    pub fn read_signed(&mut self, n: u8) -> Result<i32, StrError> {
        let v = self.read(n)? as i32;
        let shift = 32 - n as u32;
        Ok((v << shift) >> shift)
    }

    pub fn read_bit(&mut self) -> Result<bool, StrError> {
        Ok(self.read(1)? != 0)
    }
}
