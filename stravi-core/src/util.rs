/// Format a byte count with fractional KB/MB (e.g., "1.5 KB", "2.3 MB").
pub fn format_bytes_approx(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Read a little-endian u16 at `offset`. The caller guarantees the bounds.
pub fn read_u16_le(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

/// Read a little-endian u32 at `offset`. The caller guarantees the bounds.
pub fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Decode a packed BCD byte (e.g. the minute/second/frame fields of a CD
/// sector address). Returns `None` for nibbles above 9.
pub fn bcd_to_decimal(bcd: u8) -> Option<u8> {
    let hi = bcd >> 4;
    let lo = bcd & 0x0F;
    if hi > 9 || lo > 9 {
        None
    } else {
        Some(hi * 10 + lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_approx() {
        assert_eq!(format_bytes_approx(0), "0 B");
        assert_eq!(format_bytes_approx(2352), "2.3 KB");
        assert_eq!(format_bytes_approx(1536), "1.5 KB");
        assert_eq!(format_bytes_approx(1048576), "1.0 MB");
    }

    #[test]
    fn test_read_le() {
        let buf = [0x60, 0x01, 0x01, 0x80, 0x78, 0x56, 0x34, 0x12];
        assert_eq!(read_u16_le(&buf, 0), 0x0160);
        assert_eq!(read_u16_le(&buf, 2), 0x8001);
        assert_eq!(read_u32_le(&buf, 4), 0x1234_5678);
    }

    #[test]
    fn test_bcd_to_decimal() {
        assert_eq!(bcd_to_decimal(0x00), Some(0));
        assert_eq!(bcd_to_decimal(0x59), Some(59));
        assert_eq!(bcd_to_decimal(0x74), Some(74));
        assert_eq!(bcd_to_decimal(0x1A), None);
        assert_eq!(bcd_to_decimal(0xA0), None);
    }
}
