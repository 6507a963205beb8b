//! The value type produced by the frame loader and consumed by the
//! similarity and grouping engines.

use crate::icon::Icon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

/// An immutable, fully-loaded media item: a name, a kind, and the ordered
/// sequence of perceptual icons extracted from it.
///
/// `frames` is never empty. For `Image`, `length` is always `0`; for
/// `Video`, `length` equals `frames.len()` at construction time.
#[derive(Debug, Clone)]
pub struct Media {
    pub name: String,
    pub kind: MediaKind,
    pub frames: Vec<Icon>,
    pub width: u32,
    pub height: u32,
    pub size: u64,
    pub length: u64,
}

impl Media {
    /// Builds a `Media`, enforcing the non-empty-frames invariant and the
    /// kind-dependent `length` invariant.
    ///
    /// # Panics
    ///
    /// Panics if `frames` is empty, or if `kind` is `Video` and `length !=
    /// frames.len()`, or if `kind` is `Image` and `length != 0`. These are
    /// programming errors in the frame loader, not user-facing failures.
    pub fn new(
        name: impl Into<String>,
        kind: MediaKind,
        frames: Vec<Icon>,
        width: u32,
        height: u32,
        size: u64,
        length: u64,
    ) -> Self {
        assert!(!frames.is_empty(), "Media::frames must be non-empty");
        match kind {
            MediaKind::Image => assert_eq!(length, 0, "image Media must have length == 0"),
            MediaKind::Video => assert_eq!(
                length,
                frames.len() as u64,
                "video Media length must equal frame count"
            ),
        }

        Self {
            name: name.into(),
            kind,
            frames,
            width,
            height,
            size,
            length,
        }
    }

    pub fn pixel_area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_icon() -> Icon {
        use image::{DynamicImage, RgbImage};
        Icon::build(&DynamicImage::ImageRgb8(RgbImage::new(4, 4)))
    }

    #[test]
    fn image_media_requires_zero_length() {
        let m = Media::new("a.png", MediaKind::Image, vec![dummy_icon()], 10, 10, 100, 0);
        assert_eq!(m.length, 0);
        assert_eq!(m.pixel_area(), 100);
    }

    #[test]
    fn video_media_requires_length_equal_to_frame_count() {
        let frames = vec![dummy_icon(), dummy_icon(), dummy_icon()];
        let m = Media::new("a.mp4", MediaKind::Video, frames, 640, 480, 1_000, 3);
        assert_eq!(m.length, 3);
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn empty_frames_panics() {
        Media::new("a.png", MediaKind::Image, vec![], 1, 1, 1, 0);
    }

    #[test]
    #[should_panic(expected = "length == 0")]
    fn image_with_nonzero_length_panics() {
        Media::new("a.png", MediaKind::Image, vec![dummy_icon()], 1, 1, 1, 5);
    }
}
