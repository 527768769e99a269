//! Storage tree traversal.
//!
//! The storage tree is the crawler's archive: one directory per tracked
//! document, each holding a descriptor and the captured snapshots.
//!
//! ```text
//! storage/
//! ├── .git/                        # Skipped entirely
//! ├── abc123/                      # Category directory
//! │   ├── .meta.yml                # name + url (required)
//! │   ├── 2017-10-27-13:16:35.md   # Snapshot
//! │   ├── 2017-10-27-13:16:35.html # Rendered copy, not a snapshot
//! │   └── latest.md                # Snapshot (sentinel name)
//! └── def456/
//!     └── ...
//! ```
//!
//! Category directories and snapshot files are visited in file-name order so
//! repeated builds over the same tree produce the same output.

use crate::config::SiteConfig;
use crate::metadata::{self, Category, MetadataError};
use crate::snapshot::SnapshotDescriptor;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Version-control directory that never holds a category.
pub const VCS_DIR: &str = ".git";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot list storage directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// One category directory and the snapshots found in it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryScan {
    /// Directory name relative to the storage root.
    pub directory: String,
    pub category: Category,
    pub snapshots: Vec<SnapshotDescriptor>,
}

/// Result of scanning the whole storage tree, in traversal order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageManifest {
    pub categories: Vec<CategoryScan>,
}

impl StorageManifest {
    /// Category names in first-seen order, duplicates kept.
    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| c.category.name.clone())
            .collect()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &SnapshotDescriptor> {
        self.categories.iter().flat_map(|c| c.snapshots.iter())
    }

    pub fn snapshot_count(&self) -> usize {
        self.categories.iter().map(|c| c.snapshots.len()).sum()
    }
}

/// Scan every category directory under `root`.
pub fn scan(root: &Path, site: &SiteConfig) -> Result<StorageManifest, ScanError> {
    let mut manifest = StorageManifest::default();
    for dir in category_dirs(root)? {
        manifest.categories.push(scan_category(root, &dir, site)?);
    }
    Ok(manifest)
}

/// Immediate subdirectories of `root`, minus [`VCS_DIR`], sorted by name.
///
/// Symlinked directories count as categories.
pub fn category_dirs(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.file_name() == VCS_DIR {
            debug!(path = %entry.path().display(), "skipping version-control directory");
            continue;
        }
        dirs.push(entry.into_path());
    }
    Ok(dirs)
}

/// Read the descriptor of one category directory and collect its snapshots.
pub fn scan_category(
    root: &Path,
    dir: &Path,
    site: &SiteConfig,
) -> Result<CategoryScan, ScanError> {
    let directory = dir
        .strip_prefix(root)
        .unwrap_or(dir)
        .to_string_lossy()
        .into_owned();
    let category = metadata::read_category_meta(&dir.join(metadata::META_FILE))?;
    debug!(%directory, category = %category.name, "read category descriptor");

    let mut snapshots = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let filename = entry.file_name().to_string_lossy();
        if !is_snapshot_file(&filename) {
            continue;
        }
        if !entry.file_type().is_file() {
            debug!(path = %entry.path().display(), "skipping non-file entry");
            continue;
        }
        snapshots.push(SnapshotDescriptor::new(
            &directory,
            &filename,
            &category.name,
            site,
        ));
    }

    if !snapshots.iter().any(SnapshotDescriptor::is_latest) {
        warn!(%directory, "no latest snapshot");
    }

    Ok(CategoryScan {
        directory,
        category,
        snapshots,
    })
}

/// Hidden files and already-rendered HTML are not snapshots.
pub fn is_snapshot_file(filename: &str) -> bool {
    !filename.starts_with('.') && !filename.contains(".html")
}
