//! Site generation pipeline.
//!
//! One build is a fixed sequence:
//!
//! ```text
//! 1. Cover       templates/index.jinja                → docs/index.html
//! 2. Sources     storage/<dir>/*  (per directory)     → docs/source/<dir>/<name>.index.html
//! 3. Index       all snapshots, grouped by category   → docs/source/index.html
//! 4. Tutorials   tutorials/*.md                       → docs/tutorials/<slug>.html
//! ```
//!
//! Step 2 renders a directory's detail pages as soon as that directory has
//! been read, before moving on to the next one. The first error aborts the
//! run: a malformed descriptor in any category fails the whole build.
//!
//! Output is only ever added or overwritten. Pages for snapshots that were
//! removed from storage stay in `docs/` until deleted by hand.

use crate::config::Settings;
use crate::index;
use crate::render::{GeneratedPage, RenderError, SiteRenderer, WriteStatus, now_ctime};
use crate::scan::{self, CategoryScan, ScanError, StorageManifest};
use crate::snapshot::SnapshotDescriptor;
use crate::tutorials::{self, Tutorial, TutorialError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("cannot create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Tutorial(#[from] TutorialError),
}

/// Detail pages written for one category directory.
#[derive(Debug)]
pub struct CategoryPages {
    pub scan: CategoryScan,
    pub pages: Vec<GeneratedPage>,
}

/// Everything a build produced, in generation order.
#[derive(Debug)]
pub struct GenerateReport {
    pub cover: GeneratedPage,
    pub categories: Vec<CategoryPages>,
    pub index: GeneratedPage,
    pub tutorials: Vec<(Tutorial, GeneratedPage)>,
}

impl GenerateReport {
    pub fn pages(&self) -> impl Iterator<Item = &GeneratedPage> {
        std::iter::once(&self.cover)
            .chain(self.categories.iter().flat_map(|c| c.pages.iter()))
            .chain(std::iter::once(&self.index))
            .chain(self.tutorials.iter().map(|(_, page)| page))
    }

    pub fn snapshot_page_count(&self) -> usize {
        self.categories.iter().map(|c| c.pages.len()).sum()
    }

    pub fn count(&self, status: WriteStatus) -> usize {
        self.pages().filter(|p| p.status == status).count()
    }
}

/// Build the whole site, stamping detail pages with the current time.
pub fn generate(settings: &Settings) -> Result<GenerateReport, GenerateError> {
    let renderer = SiteRenderer::new(&settings.paths, now_ctime());
    generate_with(settings, &renderer)
}

/// Build the whole site with a caller-supplied renderer.
pub fn generate_with(
    settings: &Settings,
    renderer: &SiteRenderer,
) -> Result<GenerateReport, GenerateError> {
    for dir in settings.paths.output_dirs() {
        create_dir(dir)?;
    }

    info!("rendering cover page");
    let cover = renderer.render_cover()?;

    info!(storage = %settings.storage_dir.display(), "rendering source pages");
    let categories = render_sources(settings, renderer)?;

    let manifest = StorageManifest {
        categories: categories.iter().map(|c| c.scan.clone()).collect(),
    };
    let names = manifest.category_names();
    let snapshots: Vec<&SnapshotDescriptor> = manifest.snapshots().collect();
    let elements = index::build_elements(&names, &snapshots);
    info!(
        categories = names.len(),
        snapshots = snapshots.len(),
        "rendering source index"
    );
    let index = renderer.render_source_index(&elements)?;

    let found = tutorials::collect_tutorials(&settings.paths.tutorials)?;
    info!(count = found.len(), "rendering tutorials");
    let pages = tutorials::render_tutorials(renderer, &found)?;

    Ok(GenerateReport {
        cover,
        categories,
        index,
        tutorials: found.into_iter().zip(pages).collect(),
    })
}

/// Walk the storage tree, rendering each directory's pages as it is read.
fn render_sources(
    settings: &Settings,
    renderer: &SiteRenderer,
) -> Result<Vec<CategoryPages>, GenerateError> {
    let root = &settings.storage_dir;
    let mut categories = Vec::new();

    for dir in scan::category_dirs(root)? {
        let relative = dir.strip_prefix(root).unwrap_or(&dir);
        create_dir(&settings.paths.docs_source.join(relative))?;

        let scan = scan::scan_category(root, &dir, &settings.site)?;
        info!(
            directory = %scan.directory,
            category = %scan.category.name,
            snapshots = scan.snapshots.len(),
            "category"
        );

        let pages = scan
            .snapshots
            .iter()
            .map(|snapshot| renderer.render_source_item(snapshot))
            .collect::<Result<Vec<_>, _>>()?;
        categories.push(CategoryPages { scan, pages });
    }

    Ok(categories)
}

fn create_dir(path: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(path).map_err(|source| GenerateError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
