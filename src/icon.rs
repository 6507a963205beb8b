//! Perceptual icon construction and comparison. Builds a small, fixed-size
//! fingerprint from a decoded raster frame and compares two fingerprints
//! with a three-component Euclidean-style metric over luminance and chroma.
//!
//! The icon downsamples the frame onto a `GRID x GRID` grid of average
//! YCbCr samples. `euc_metric` sums squared per-cell differences separately
//! for luma (`m1`) and the two chroma channels (`m2`, `m3`); the scale
//! factor is calibrated so that an all-white frame vs. an all-black frame —
//! the worst-case luminance+chroma combination — yields
//! `sqrt(m1) == MAX_DIFFERENCE`.

use image::{imageops::FilterType, DynamicImage, RgbImage};

const GRID: u32 = 9;
const CELLS: f64 = (GRID * GRID) as f64;

/// Worst-case combined luminance+chroma distance between two icons
/// (all-white vs. all-black). Must stay in sync with the calibration in
/// [`Icon::build`].
pub const MAX_DIFFERENCE: f64 = 2804.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    luma: Vec<f64>,
    chroma_b: Vec<f64>,
    chroma_r: Vec<f64>,
}

impl Icon {
    /// Builds a perceptual icon from a decoded raster frame.
    pub fn build(image: &DynamicImage) -> Self {
        let small: RgbImage = image
            .resize_exact(GRID, GRID, FilterType::Triangle)
            .to_rgb8();

        let mut luma = Vec::with_capacity(GRID as usize * GRID as usize);
        let mut chroma_b = Vec::with_capacity(luma.capacity());
        let mut chroma_r = Vec::with_capacity(luma.capacity());

        for pixel in small.pixels() {
            let [r, g, b] = [pixel[0] as f64, pixel[1] as f64, pixel[2] as f64];
            let y = 0.299 * r + 0.587 * g + 0.114 * b;
            let cb = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
            let cr = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
            luma.push(y);
            chroma_b.push(cb);
            chroma_r.push(cr);
        }

        Self {
            luma,
            chroma_b,
            chroma_r,
        }
    }
}

/// Worst-case per-cell squared luminance difference (full white vs. full
/// black), before calibration.
fn raw_channel_max() -> f64 {
    CELLS * 255.0 * 255.0
}

fn calibration() -> f64 {
    MAX_DIFFERENCE * MAX_DIFFERENCE / raw_channel_max()
}

/// Three-component distance between two icons: `(luminance, chroma_b,
/// chroma_r)`, all non-negative. Callers combine these as
/// `sqrt(m1 + m2/2 + m3/2)`, weighting chroma at half the luminance term.
pub fn euc_metric(a: &Icon, b: &Icon) -> (f64, f64, f64) {
    let scale = calibration();
    let sum_sq = |xs: &[f64], ys: &[f64]| -> f64 {
        xs.iter()
            .zip(ys)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            * scale
    };

    (
        sum_sq(&a.luma, &b.luma),
        sum_sq(&a.chroma_b, &b.chroma_b),
        sum_sq(&a.chroma_r, &b.chroma_r),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for p in img.pixels_mut() {
            *p = Rgb(rgb);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn identical_icons_have_zero_distance() {
        let img = solid(32, 32, [120, 60, 200]);
        let icon = Icon::build(&img);
        let (m1, m2, m3) = euc_metric(&icon, &icon);
        assert_eq!(m1, 0.0);
        assert_eq!(m2, 0.0);
        assert_eq!(m3, 0.0);
    }

    #[test]
    fn white_vs_black_saturates_to_max_difference() {
        let white = Icon::build(&solid(32, 32, [255, 255, 255]));
        let black = Icon::build(&solid(32, 32, [0, 0, 0]));
        let (m1, m2, m3) = euc_metric(&white, &black);

        assert!((m1.sqrt() - MAX_DIFFERENCE).abs() < 1e-6);
        // White and black sit on the gray axis: no chroma difference.
        assert!(m2.abs() < 1e-9);
        assert!(m3.abs() < 1e-9);
    }

    #[test]
    fn metric_is_symmetric() {
        let a = Icon::build(&solid(16, 16, [10, 200, 30]));
        let b = Icon::build(&solid(16, 16, [200, 10, 90]));
        assert_eq!(euc_metric(&a, &b), euc_metric(&b, &a));
    }
}
