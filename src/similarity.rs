//! Perceptual similarity between two loaded media items.
//!
//! Dispatches on kind: cross-kind pairs are defined as `0.0`, same-kind
//! images compare frame-by-frame taking the best-matching variant, and
//! same-kind videos align frame sequences with [`crate::dtw`].

use crate::dtw::dtw;
use crate::icon::{euc_metric, Icon, MAX_DIFFERENCE};
use crate::media::{Media, MediaKind};

/// Computes the perceptual similarity of `a` and `b`, in `[0, 1]`.
/// Returns `0.0` immediately for cross-kind pairs.
pub fn similarity(a: &Media, b: &Media) -> f64 {
    if a.kind != b.kind {
        return 0.0;
    }

    match a.kind {
        MediaKind::Image => image_similarity(a, b),
        MediaKind::Video => video_similarity(a, b),
    }
}

/// Distance-to-similarity conversion shared by both kinds: halves the
/// weight of the two chroma components relative to luminance, normalizes
/// by the library-defined worst case, and flips distance into similarity.
fn icon_similarity(f: &Icon, g: &Icon) -> f64 {
    let (m1, m2, m3) = euc_metric(f, g);
    let difference = (m1 + m2 / 2.0 + m3 / 2.0).sqrt() / MAX_DIFFERENCE;
    (1.0 - difference).clamp(0.0, 1.0)
}

/// Compares `a`'s base frame against every frame of `b` (base plus any
/// augmented flip/rotate variants) and keeps the best match.
fn image_similarity(a: &Media, b: &Media) -> f64 {
    let f = &a.frames[0];
    b.frames
        .iter()
        .map(|g| icon_similarity(f, g))
        .fold(f64::MIN, f64::max)
}

/// Aligns `a`'s and `b`'s frame sequences with DTW over a per-frame
/// distance matrix, then returns the mean alignment cost along the optimal
/// path. Despite the function's name this value is distance-shaped, not a
/// bounded symmetric similarity: lower means more alike, and it is not
/// directly comparable in scale to `image_similarity`'s output.
fn video_similarity(a: &Media, b: &Media) -> f64 {
    let cost: Vec<Vec<f64>> = a
        .frames
        .iter()
        .map(|fa| {
            b.frames
                .iter()
                .map(|fb| 1.0 - icon_similarity(fa, fb))
                .collect()
        })
        .collect();

    let (total_cost, path) = dtw(&cost);
    if path.is_empty() {
        return 0.0;
    }
    total_cost / path.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use image::{DynamicImage, Rgb, RgbImage};

    fn solid_image(rgb: [u8; 3]) -> Media {
        let mut img = RgbImage::new(64, 64);
        for p in img.pixels_mut() {
            *p = Rgb(rgb);
        }
        let icon = Icon::build(&DynamicImage::ImageRgb8(img));
        Media::new("x.png", MediaKind::Image, vec![icon], 64, 64, 1024, 0)
    }

    fn solid_video(rgb: [u8; 3], frame_count: usize) -> Media {
        let mut img = RgbImage::new(16, 16);
        for p in img.pixels_mut() {
            *p = Rgb(rgb);
        }
        let icon = Icon::build(&DynamicImage::ImageRgb8(img));
        let frames = vec![icon; frame_count];
        Media::new(
            "x.mp4",
            MediaKind::Video,
            frames,
            16,
            16,
            4096,
            frame_count as u64,
        )
    }

    #[test]
    fn reflexivity_for_images() {
        let m = solid_image([80, 160, 20]);
        assert!((similarity(&m, &m) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn symmetry_for_images() {
        let a = solid_image([200, 30, 30]);
        let b = solid_image([30, 200, 30]);
        assert!((similarity(&a, &b) - similarity(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn cross_kind_is_always_zero() {
        let image = solid_image([10, 10, 10]);
        let video = solid_video([10, 10, 10], 3);
        assert_eq!(similarity(&image, &video), 0.0);
        assert_eq!(similarity(&video, &image), 0.0);
    }

    #[test]
    fn range_is_bounded() {
        let a = solid_image([255, 255, 255]);
        let b = solid_image([0, 0, 0]);
        let s = similarity(&a, &b);
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn identical_videos_score_near_zero() {
        // video_similarity is distance-shaped (1 - icon_similarity feeds the
        // DTW cost matrix), so identical frame sequences align at zero cost.
        let v = solid_video([50, 100, 150], 4);
        assert!(similarity(&v, &v).abs() < 1e-9);
    }

    #[test]
    fn distinct_videos_score_higher_than_identical() {
        let a = solid_video([255, 0, 0], 3);
        let b = solid_video([0, 0, 255], 3);
        assert!(similarity(&a, &b) > similarity(&a, &a));
    }
}
