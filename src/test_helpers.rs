//! Shared test utilities for the tosknight-site test suite.
//!
//! Copies the checked-in fixture trees into temp directories and provides
//! lookup helpers over scan results.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let (storage, ui) = setup_site();
//! let settings = settings_for(&storage, &ui);
//! let report = generate_with(&settings, &fixed_renderer(&settings)).unwrap();
//!
//! let manifest = scan(storage.path(), &settings.site).unwrap();
//! let github = find_category(&manifest, "abc123");
//! assert_eq!(snapshot_names(github).last(), Some(&"latest"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::Settings;
use crate::render::SiteRenderer;
use crate::scan::{CategoryScan, StorageManifest};

/// Timestamp stamped on detail pages by [`fixed_renderer`].
pub const FIXED_TODAY: &str = "Sat Oct 28 09:15:00 2017";

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/storage/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_storage() -> TempDir {
    copy_fixture("storage")
}

/// Copy both `fixtures/storage/` and `fixtures/ui/`. Returns `(storage, ui)`.
pub fn setup_site() -> (TempDir, TempDir) {
    (copy_fixture("storage"), copy_fixture("ui"))
}

/// Settings pointing at fixture copies, with the site config loaded from `ui`.
pub fn settings_for(storage: &TempDir, ui: &TempDir) -> Settings {
    Settings::from_args(
        Some(storage.path().to_path_buf()),
        Some(ui.path().to_path_buf()),
    )
    .unwrap()
}

/// A renderer whose timestamp never changes between runs.
pub fn fixed_renderer(settings: &Settings) -> SiteRenderer {
    SiteRenderer::new(&settings.paths, FIXED_TODAY.to_string())
}

fn copy_fixture(name: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name);
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups, panics with a clear message on miss
// =========================================================================

/// Find a category scan by storage directory name. Panics if not found.
pub fn find_category<'a>(manifest: &'a StorageManifest, directory: &str) -> &'a CategoryScan {
    manifest
        .categories
        .iter()
        .find(|c| c.directory == directory)
        .unwrap_or_else(|| {
            let dirs = category_directories(manifest);
            panic!("category directory '{directory}' not found. Available: {dirs:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All category directory names in scan order.
pub fn category_directories(manifest: &StorageManifest) -> Vec<&str> {
    manifest
        .categories
        .iter()
        .map(|c| c.directory.as_str())
        .collect()
}

/// Snapshot names (file stems) of one category, in scan order.
pub fn snapshot_names(scan: &CategoryScan) -> Vec<&str> {
    scan.snapshots.iter().map(|s| s.name.as_str()).collect()
}
