//! 8×8 inverse DCT.

use std::f32::consts::{FRAC_1_SQRT_2, PI};
use std::sync::OnceLock;

/// `BASIS[u][x] = C(u)/2 · cos((2x+1)uπ/16)`, with `C(0) = 1/√2`.
fn basis() -> &'static [[f32; 8]; 8] {
    static BASIS: OnceLock<[[f32; 8]; 8]> = OnceLock::new();
    BASIS.get_or_init(|| {
        let mut b = [[0.0f32; 8]; 8];
        for (u, row) in b.iter_mut().enumerate() {
            let scale = (if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }) / 2.0;
            for (x, v) in row.iter_mut().enumerate() {
                *v = scale * ((2 * x + 1) as f32 * u as f32 * PI / 16.0).cos();
            }
        }
        b
    })
}

/// Transform dequantised coefficients (raster order, row = vertical
/// frequency) into clamped 8-bit samples.
pub fn idct_8x8(coeffs: &[i32; 64], out: &mut [u8; 64]) {
    let basis = basis();

    // Horizontal pass.
    let mut tmp = [0.0f32; 64];
    for v in 0..8 {
        let row = &coeffs[v * 8..v * 8 + 8];
        if row.iter().all(|&c| c == 0) {
            continue;
        }
        for x in 0..8 {
            let mut sum = 0.0;
            for (u, &c) in row.iter().enumerate() {
                sum += c as f32 * basis[u][x];
            }
            tmp[v * 8 + x] = sum;
        }
    }

    // Vertical pass.
    for y in 0..8 {
        for x in 0..8 {
            let mut sum = 0.0;
            for v in 0..8 {
                sum += tmp[v * 8 + x] * basis[v][y];
            }
            out[y * 8 + x] = sum.round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_only_is_flat() {
        let mut coeffs = [0; 64];
        coeffs[0] = 1024;
        let mut out = [0u8; 64];
        idct_8x8(&coeffs, &mut out);
        assert!(out.iter().all(|&p| p == 128));
    }

    #[test]
    fn test_clamps() {
        let mut coeffs = [0; 64];
        coeffs[0] = 8 * 400;
        let mut out = [0u8; 64];
        idct_8x8(&coeffs, &mut out);
        assert!(out.iter().all(|&p| p == 255));

        coeffs[0] = -800;
        idct_8x8(&coeffs, &mut out);
        assert!(out.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_first_horizontal_harmonic() {
        let mut coeffs = [0; 64];
        coeffs[0] = 1024;
        coeffs[1] = 200;
        let mut out = [0u8; 64];
        idct_8x8(&coeffs, &mut out);
        // Brighter on the left, darker on the right, constant down each column.
        assert!(out[0] > out[7]);
        for y in 1..8 {
            assert_eq!(out[y * 8], out[0]);
        }
    }
}
