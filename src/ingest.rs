//! Fan-out over a list of paths (or a directory) with bounded concurrency,
//! streaming one `Result<Media>` per input to the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{unbounded, Receiver};
use walkdir::WalkDir;

use crate::error::{MediaSimError, Result};
use crate::loader::{load_one, FrameOptions};
use crate::media::{Media, MediaKind};
use crate::registry;

/// Options for `load_many`: how many frame-loads may be in flight at once.
#[derive(Debug, Clone, Copy)]
pub struct FilesOptions {
    pub parallel: usize,
    pub frame: FrameOptions,
}

impl Default for FilesOptions {
    fn default() -> Self {
        Self {
            parallel: 5,
            frame: FrameOptions::default(),
        }
    }
}

/// Options for `load_dir`: traversal depth and which kinds to include.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryOptions {
    pub recursive: bool,
    pub include_images: bool,
    pub include_videos: bool,
    pub files: FilesOptions,
}

impl DirectoryOptions {
    /// If neither `include_images` nor `include_videos` was set, both
    /// default to true.
    fn effective_media_types(&self) -> (bool, bool) {
        if !self.include_images && !self.include_videos {
            (true, true)
        } else {
            (self.include_images, self.include_videos)
        }
    }
}

/// Spawns up to `options.parallel` worker threads pulling from a shared
/// job queue, one per input path; every path yields exactly one result on
/// the returned channel. The channel closes once every worker has drained
/// the queue and reported.
pub fn load_many(paths: Vec<PathBuf>, options: &FilesOptions) -> Receiver<Result<Media>> {
    let parallel = options.parallel.max(1);
    let (job_tx, job_rx) = unbounded::<PathBuf>();
    let (result_tx, result_rx) = unbounded::<Result<Media>>();
    let frame_options = options.frame;

    let job_count = paths.len();
    for path in paths {
        job_tx
            .send(path)
            .expect("job_rx kept alive until workers spawn");
    }
    drop(job_tx);
    log::debug!("queued {job_count} path(s) across {parallel} worker(s)");

    for worker_id in 0..parallel {
        let job_rx = job_rx.clone();
        let result_tx = result_tx.clone();
        thread::spawn(move || {
            let mut handled = 0usize;
            while let Ok(path) = job_rx.recv() {
                let result = load_one(&path, &frame_options);
                handled += 1;
                if result_tx.send(result).is_err() {
                    break;
                }
            }
            log::trace!("worker {worker_id} handled {handled} path(s) and exited");
        });
    }
    // Dropping our own sender lets the channel close once every worker's
    // clone has also dropped (i.e. every worker has exited).
    drop(result_tx);

    result_rx
}

/// Synchronously walks `root` (recursive or one level, per `options`),
/// collecting paths whose extension matches the enabled registries, then
/// hands them to `load_many`. Returns the accepted-path count alongside
/// the result stream. A traversal failure on `root` itself yields a
/// single-element error stream and a count of `0`.
pub fn load_dir(root: &Path, options: &DirectoryOptions) -> (Receiver<Result<Media>>, usize) {
    if let Err(source) = fs::metadata(root) {
        let (tx, rx) = unbounded();
        let _ = tx.send(Err(MediaSimError::PathError {
            path: root.to_path_buf(),
            source,
        }));
        return (rx, 0);
    }

    let (include_images, include_videos) = options.effective_media_types();

    let walker = WalkDir::new(root).max_depth(if options.recursive { usize::MAX } else { 1 });

    let paths: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.path().to_path_buf();
            match registry::kind_for_path(&path) {
                Some(MediaKind::Image) if include_images => Some(path),
                Some(MediaKind::Video) if include_videos => Some(path),
                _ => None,
            }
        })
        .collect();

    let total = paths.len();
    log::debug!(
        "walked {} ({}, images={include_images}, videos={include_videos}): {total} accepted path(s)",
        root.display(),
        if options.recursive { "recursive" } else { "one level" },
    );
    (load_many(paths, &options.files), total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut img = RgbImage::new(8, 8);
        for p in img.pixels_mut() {
            *p = Rgb([10, 20, 30]);
        }
        img.save(&path).expect("writing fixture png");
        path
    }

    #[test]
    fn parallel_ingest_completeness_for_k_paths() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..6)
            .map(|i| write_png(dir.path(), &format!("f{i}.png")))
            .collect();

        let rx = load_many(paths.clone(), &FilesOptions { parallel: 2, ..Default::default() });
        let results: Vec<_> = rx.iter().collect();
        assert_eq!(results.len(), paths.len());
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn load_dir_counts_only_registered_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        write_png(dir.path(), "b.png");
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

        let (rx, total) = load_dir(dir.path(), &DirectoryOptions::default());
        assert_eq!(total, 2);
        let results: Vec<_> = rx.iter().collect();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn load_dir_on_missing_root_yields_single_error_and_zero_total() {
        let (rx, total) = load_dir(Path::new("/no/such/directory"), &DirectoryOptions::default());
        assert_eq!(total, 0);
        let results: Vec<_> = rx.iter().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
