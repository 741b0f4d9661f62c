//! YCbCr → RGB conversion and 4:2:0 reconstruction.

use stravi_core::Geometry;

/// Full-range (JFIF) conversion of one sample.
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let y = y as f32;
    let cb = cb as f32 - 128.0;
    let cr = cr as f32 - 128.0;
    let r = y + 1.402 * cr;
    let g = y - 0.344_136 * cb - 0.714_136 * cr;
    let b = y + 1.772 * cb;
    [clamp(r), clamp(g), clamp(b)]
}

fn clamp(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Component planes for one frame, sized to whole macroblocks.
#[derive(Debug, Clone)]
pub struct Planes {
    pub luma_width: usize,
    pub y: Vec<u8>,
    pub cb: Vec<u8>,
    pub cr: Vec<u8>,
}

impl Planes {
    pub fn new(mb_cols: usize, mb_rows: usize) -> Self {
        let luma = mb_cols * 16 * mb_rows * 16;
        Self {
            luma_width: mb_cols * 16,
            y: vec![0; luma],
            cb: vec![0; luma / 4],
            cr: vec![0; luma / 4],
        }
    }

    pub fn chroma_width(&self) -> usize {
        self.luma_width / 2
    }

    /// Write the visible `geometry` area as packed RGB into `out`.
    pub fn to_rgb(&self, geometry: Geometry, out: &mut [u8]) {
        let width = geometry.width as usize;
        let cw = self.chroma_width();
        for (row, line) in out.chunks_exact_mut(width * 3).enumerate() {
            let luma_row = &self.y[row * self.luma_width..];
            let chroma_off = (row / 2) * cw;
            for (x, px) in line.chunks_exact_mut(3).enumerate() {
                let c = chroma_off + x / 2;
                px.copy_from_slice(&ycbcr_to_rgb(luma_row[x], self.cb[c], self.cr[c]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_chroma_is_gray() {
        assert_eq!(ycbcr_to_rgb(0, 128, 128), [0, 0, 0]);
        assert_eq!(ycbcr_to_rgb(153, 128, 128), [153, 153, 153]);
        assert_eq!(ycbcr_to_rgb(255, 128, 128), [255, 255, 255]);
    }

    #[test]
    fn test_red_shift() {
        assert_eq!(ycbcr_to_rgb(128, 128, 178), [198, 92, 128]);
    }

    #[test]
    fn test_chroma_upsampling_and_crop() {
        let mut planes = Planes::new(1, 1);
        planes.y.fill(128);
        planes.cb.fill(128);
        planes.cr.fill(128);
        // Top-left chroma sample covers a 2×2 luma area.
        planes.cr[0] = 178;

        let geometry = Geometry::new(4, 4);
        let mut out = vec![0u8; geometry.rgb_len()];
        planes.to_rgb(geometry, &mut out);

        let px = |x: usize, y: usize| &out[(y * 4 + x) * 3..(y * 4 + x) * 3 + 3];
        assert_eq!(px(0, 0), [198, 92, 128]);
        assert_eq!(px(1, 1), [198, 92, 128]);
        assert_eq!(px(2, 0), [128, 128, 128]);
        assert_eq!(px(0, 2), [128, 128, 128]);
    }
}
