//! Perceptual similarity engine for images and videos: icon-based frame
//! comparison, DTW-aligned video sequence comparison, and DSU-backed
//! near-duplicate clustering.

pub mod dsu;
pub mod dtw;
pub mod error;
pub mod grouping;
pub mod icon;
pub mod ingest;
pub mod loader;
pub mod media;
pub mod registry;
pub mod similarity;

pub use error::{MediaSimError, Result};
pub use grouping::{group, Group};
pub use ingest::{load_dir, load_many, DirectoryOptions, FilesOptions};
pub use loader::{load_one, FrameOptions};
pub use media::{Media, MediaKind};
pub use similarity::similarity;
