//! Clap-derived command tree: `score`, `files`, `dir`, `rename`, plus the
//! global flags shared by all four.

mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossbeam_channel::Receiver;

use mediasim::{self as core, DirectoryOptions, FilesOptions, FrameOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Report,
    Json,
    Csv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MediaTypeArg {
    Image,
    Video,
    All,
}

impl MediaTypeArg {
    fn flags(self) -> (bool, bool) {
        match self {
            MediaTypeArg::Image => (true, false),
            MediaTypeArg::Video => (false, true),
            MediaTypeArg::All => (true, true),
        }
    }
}

fn parse_threshold(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("threshold must be within [0, 1], got {value}"));
    }
    Ok(value)
}

#[derive(Parser, Debug)]
#[command(name = "mediasim", about = "Perceptual similarity and near-duplicate clustering")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Minimum similarity for two media to be considered a match.
    #[arg(short = 't', long = "threshold", global = true, default_value = "0.8", value_parser = parse_threshold)]
    threshold: f64,

    /// Add horizontally/vertically flipped variants when comparing images.
    #[arg(long = "frame-flip", visible_alias = "ff", global = true)]
    frame_flip: bool,

    /// Add 90/180/270-degree rotated variants when comparing images.
    #[arg(long = "frame-rotate", visible_alias = "fr", global = true)]
    frame_rotate: bool,

    /// Output rendering.
    #[arg(short = 'o', long = "output", global = true, default_value = "report")]
    output: OutputFormat,

    /// Skip per-file errors instead of aborting the whole run.
    #[arg(long = "ignore-errors", visible_alias = "ie", global = true)]
    ignore_errors: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare exactly two files and print a single similarity score.
    Score { file_a: String, file_b: String },
    /// Compare two or more files pairwise against the threshold.
    Files {
        #[arg(num_args = 2.., required = true)]
        files: Vec<String>,
    },
    /// Walk a directory and group near-duplicates.
    Dir {
        dir: String,
        #[arg(short = 'r', long = "recursive")]
        recursive: bool,
        #[arg(long = "mt", default_value = "all")]
        media_type: MediaTypeArg,
    },
    /// Walk a directory, group near-duplicates, and rename grouped files.
    Rename {
        dir: String,
        #[arg(long = "mt", default_value = "all")]
        media_type: MediaTypeArg,
    },
}

/// Parses CLI arguments and runs the selected subcommand.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let frame_options = FrameOptions {
        frame_flip: cli.frame_flip,
        frame_rotate: cli.frame_rotate,
    };
    let files_options = FilesOptions {
        parallel: num_cpus::get(),
        frame: frame_options,
    };

    match &cli.command {
        Command::Score { file_a, file_b } => {
            run_score(file_a, file_b, frame_options, cli.output)
        }
        Command::Files { files } => {
            run_files(files, files_options, cli.threshold, cli.ignore_errors, cli.output)
        }
        Command::Dir { dir, recursive, media_type } => {
            let (include_images, include_videos) = (*media_type).flags();
            let dir_options = DirectoryOptions {
                recursive: *recursive,
                include_images,
                include_videos,
                files: files_options,
            };
            run_dir(dir, dir_options, cli.threshold, cli.ignore_errors, cli.output)
        }
        Command::Rename { dir, media_type } => {
            let (include_images, include_videos) = (*media_type).flags();
            let dir_options = DirectoryOptions {
                recursive: false,
                include_images,
                include_videos,
                files: files_options,
            };
            run_rename(dir, dir_options, cli.threshold, cli.ignore_errors)
        }
    }
}

fn run_score(file_a: &str, file_b: &str, frame_options: FrameOptions, output: OutputFormat) -> Result<()> {
    let a = core::load_one(&expand_path(file_a), &frame_options)
        .with_context(|| format!("loading '{file_a}'"))?;
    let b = core::load_one(&expand_path(file_b), &frame_options)
        .with_context(|| format!("loading '{file_b}'"))?;

    let score = core::similarity(&a, &b);
    output::print_score(score, output)
}

fn run_files(
    files: &[String],
    files_options: FilesOptions,
    threshold: f64,
    ignore_errors: bool,
    output: OutputFormat,
) -> Result<()> {
    let paths: Vec<PathBuf> = files.iter().map(|f| expand_path(f)).collect();
    let rx = core::load_many(paths, &files_options);
    let media = collect_media(rx, ignore_errors)?;

    let mut comparisons = Vec::with_capacity(media.len());
    for (i, m) in media.iter().enumerate() {
        let mut similarities: Vec<(String, f64)> = media
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| (other.name.clone(), core::similarity(m, other)))
            .filter(|(_, score)| *score >= threshold)
            .collect();
        similarities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        comparisons.push((m.name.clone(), similarities));
    }

    output::print_comparisons(&comparisons, output)
}

fn run_dir(
    dir: &str,
    dir_options: DirectoryOptions,
    threshold: f64,
    ignore_errors: bool,
    output: OutputFormat,
) -> Result<()> {
    let (rx, total) = core::load_dir(&expand_path(dir), &dir_options);
    log::debug!("directory walk accepted {total} paths");
    let media = collect_media(rx, ignore_errors)?;

    let groups = core::group(media, threshold);
    output::print_groups(&groups, output)
}

fn run_rename(dir: &str, dir_options: DirectoryOptions, threshold: f64, ignore_errors: bool) -> Result<()> {
    let (rx, total) = core::load_dir(&expand_path(dir), &dir_options);
    log::debug!("directory walk accepted {total} paths");
    let media = collect_media(rx, ignore_errors)?;

    let groups = core::group(media, threshold);
    let renamed = output::rename_groups(&groups).context("renaming grouped files")?;
    for (from, to) in renamed {
        println!("{from} -> {to}");
    }
    Ok(())
}

/// Drains `rx`, aborting on the first error unless `ignore_errors` is set,
/// in which case failed loads are logged and dropped from the result.
fn collect_media(rx: Receiver<mediasim::Result<mediasim::Media>>, ignore_errors: bool) -> Result<Vec<mediasim::Media>> {
    let mut media = Vec::new();
    for result in rx.iter() {
        match result {
            Ok(m) => media.push(m),
            Err(e) => {
                if ignore_errors {
                    log::warn!("skipping: {e}");
                } else {
                    return Err(anyhow::Error::from(e));
                }
            }
        }
    }
    Ok(media)
}

/// Expands a leading `~` to the user's home directory.
fn expand_path(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return Path::new(&home).join(rest);
        }
    } else if input == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(input)
}
