//! Process-wide registry of recognized image/video file extensions.
//!
//! The registries start populated with sensible defaults and may be
//! extended once at process init via `add_image_type`/`add_video_type`.
//! Writes after ingest has begun are not supported.

use std::collections::HashSet;
use std::sync::{OnceLock, RwLock};

use crate::media::MediaKind;

fn image_exts() -> &'static RwLock<HashSet<String>> {
    static REGISTRY: OnceLock<RwLock<HashSet<String>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        RwLock::new(
            [".bmp", ".gif", ".jpg", ".jpeg", ".png", ".tiff", ".webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    })
}

fn video_exts() -> &'static RwLock<HashSet<String>> {
    static REGISTRY: OnceLock<RwLock<HashSet<String>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        RwLock::new(
            [".avi", ".m4v", ".mp4", ".mkv", ".mov", ".webm"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    })
}

fn normalize(ext: &str) -> String {
    let ext = ext.trim();
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    format!(".{}", ext.to_lowercase())
}

/// Registers additional image extensions (each normalized to lowercase,
/// leading dot). Intended to be called once at process init, before any
/// ingest begins.
pub fn add_image_type(exts: impl IntoIterator<Item = impl AsRef<str>>) {
    let mut set = image_exts().write().expect("image registry poisoned");
    for ext in exts {
        set.insert(normalize(ext.as_ref()));
    }
}

/// Registers additional video extensions. See [`add_image_type`].
pub fn add_video_type(exts: impl IntoIterator<Item = impl AsRef<str>>) {
    let mut set = video_exts().write().expect("video registry poisoned");
    for ext in exts {
        set.insert(normalize(ext.as_ref()));
    }
}

/// Classifies `path` by its extension, matched case-insensitively against
/// the image and video registries. Returns `None` for unregistered or
/// missing extensions.
pub fn kind_for_path(path: &std::path::Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?;
    let normalized = normalize(ext);

    if image_exts()
        .read()
        .expect("image registry poisoned")
        .contains(&normalized)
    {
        return Some(MediaKind::Image);
    }
    if video_exts()
        .read()
        .expect("video registry poisoned")
        .contains(&normalized)
    {
        return Some(MediaKind::Video);
    }
    None
}
