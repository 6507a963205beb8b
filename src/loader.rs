//! Converts one file path into a [`Media`], dispatching on the registry's
//! classification: a decode path for images, an external-transcoder path
//! for videos.

use std::fs;
use std::path::Path;
use std::process::Command;

use image::DynamicImage;

use crate::error::{MediaSimError, Result};
use crate::icon::Icon;
use crate::media::{Media, MediaKind};
use crate::registry;

/// Per-call options for image loading. Ignored for video.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameOptions {
    /// Append horizontally- and vertically-flipped variants to `frames`.
    pub frame_flip: bool,
    /// Append 90/180/270-degree rotated variants to `frames`.
    pub frame_rotate: bool,
}

/// Loads `path` into a `Media`, classifying it via the process-wide
/// extension registry and dispatching to the image or video path.
pub fn load_one(path: &Path, options: &FrameOptions) -> Result<Media> {
    let kind = registry::kind_for_path(path).ok_or_else(|| MediaSimError::UnsupportedType {
        path: path.to_path_buf(),
    })?;

    let size = fs::metadata(path)
        .map_err(|source| MediaSimError::PathError {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    log::trace!("loading {} ({:?}, {size} bytes)", path.display(), kind);

    let result = match kind {
        MediaKind::Image => load_image(path, options, size),
        MediaKind::Video => load_video(path, size),
    };

    match &result {
        Ok(media) => log::debug!(
            "loaded {} ({} frame(s), {}x{})",
            media.name,
            media.frames.len(),
            media.width,
            media.height
        ),
        Err(e) => log::debug!("failed to load {}: {e}", path.display()),
    }

    result
}

fn load_image(path: &Path, options: &FrameOptions, size: u64) -> Result<Media> {
    let base = image::open(path).map_err(|e| MediaSimError::DecodeError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let (width, height) = (base.width(), base.height());
    let mut frames = vec![Icon::build(&base)];

    if options.frame_flip {
        frames.push(Icon::build(&base.fliph()));
        frames.push(Icon::build(&base.flipv()));
    }
    if options.frame_rotate {
        frames.push(Icon::build(&base.rotate90()));
        frames.push(Icon::build(&base.rotate180()));
        frames.push(Icon::build(&base.rotate270()));
    }

    Ok(Media::new(
        path.to_string_lossy(),
        MediaKind::Image,
        frames,
        width,
        height,
        size,
        0,
    ))
}

fn load_video(path: &Path, size: u64) -> Result<Media> {
    let ffmpeg = which::which("ffmpeg").map_err(|e| MediaSimError::ExtractionError {
        path: path.to_path_buf(),
        message: format!("ffmpeg not found on PATH: {e}"),
    })?;

    let tmp = tempfile::tempdir().map_err(|source| MediaSimError::PathError {
        path: path.to_path_buf(),
        source,
    })?;
    log::trace!("extracting {} into {}", path.display(), tmp.path().display());

    run_ffmpeg(
        &ffmpeg,
        path,
        &["-vf", "fps=1", "-start_number", "1"],
        &tmp.path().join("frame_%04d.jpg"),
    );

    let mut frame_paths = collect_frame_files(tmp.path());
    if frame_paths.is_empty() {
        log::debug!(
            "1fps extraction yielded no frames for {}, falling back to single keyframe",
            path.display()
        );
        run_ffmpeg(
            &ffmpeg,
            path,
            &["-vframes", "1"],
            &tmp.path().join("frame.jpg"),
        );
        frame_paths = collect_frame_files(tmp.path());
    }

    if frame_paths.is_empty() {
        return Err(MediaSimError::ExtractionError {
            path: path.to_path_buf(),
            message: "no frames produced".to_string(),
        });
    }
    log::trace!("extracted {} frame(s) from {}", frame_paths.len(), path.display());

    let mut frames = Vec::with_capacity(frame_paths.len());
    let mut width = 0;
    let mut height = 0;
    for (i, frame_path) in frame_paths.iter().enumerate() {
        let img: DynamicImage =
            image::open(frame_path).map_err(|e| MediaSimError::ExtractionError {
                path: path.to_path_buf(),
                message: format!("decoding extracted frame '{}': {e}", frame_path.display()),
            })?;
        if i == 0 {
            width = img.width();
            height = img.height();
        }
        frames.push(Icon::build(&img));
    }
    let length = frames.len() as u64;

    Ok(Media::new(
        path.to_string_lossy(),
        MediaKind::Video,
        frames,
        width,
        height,
        size,
        length,
    ))
    // `tmp` drops here, removing the temporary directory on every exit path.
}

fn run_ffmpeg(ffmpeg: &Path, input: &Path, extra_args: &[&str], output: &Path) {
    let _ = Command::new(ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(extra_args)
        .arg(output)
        .output();
}

fn collect_frame_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<_> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();
    paths
}
