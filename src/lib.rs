//! # tosknight-site
//!
//! Static site generator for an archive of terms-of-service snapshots. A
//! crawler commits each captured version of a document into a storage tree;
//! this crate turns that tree into a browsable website.
//!
//! # Pipeline
//!
//! One build walks the storage tree once and renders four kinds of page
//! through user-supplied Jinja templates:
//!
//! ```text
//! 1. Cover       templates/index.jinja                 → docs/index.html
//! 2. Sources     storage/<dir>/<snapshot>              → docs/source/<dir>/<name>.index.html
//! 3. Index       snapshots grouped by category         → docs/source/index.html
//! 4. Tutorials   tutorials/*.md                        → docs/tutorials/<slug>.html
//! ```
//!
//! Every category directory carries a `.meta.yml` with the service `name` and
//! the `url` of the live document. Snapshot files are named after the capture
//! time (`2017-10-27-13:16:35.md`) or `latest`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | CLI settings, derived site paths, optional `config.toml` with URL bases |
//! | [`metadata`] | Reads a category's `.meta.yml` |
//! | [`snapshot`] | Derives names, labels, URLs and output paths for one snapshot file |
//! | [`scan`] | Walks the storage tree into a [`scan::StorageManifest`] |
//! | [`index`] | Turns the flat snapshot list into the nested render-element stream |
//! | [`render`] | Template environment, page rendering, write-if-changed |
//! | [`tutorials`] | Markdown tutorials rendered into the site |
//! | [`generate`] | Orchestrates a full build |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Runtime Templates
//!
//! Page markup belongs to the site project, not to this binary. Templates are
//! loaded from `<ui-dir>/templates/` at run time with MiniJinja, configured
//! like a stock Jinja2 environment (`trim_blocks`, no auto-escaping) so
//! existing templates render unchanged.
//!
//! ## Flat Index Stream
//!
//! The source index is handed to its template as a flat list of tagged
//! elements (`start-category`, `start-list`, `link`, `end-list`,
//! `end-category`) rather than a tree. Templates stay loop-only, and two
//! directories that declare the same service name share one category block.
//!
//! ## Deterministic Output
//!
//! Directories and files are visited in name order, and a page is only
//! rewritten when its bytes change. Rebuilding an unchanged archive leaves the
//! cover and index untouched, which keeps commits of the generated site small.

pub mod config;
pub mod generate;
pub mod index;
pub mod metadata;
pub mod output;
pub mod render;
pub mod scan;
pub mod snapshot;
pub mod tutorials;

#[cfg(test)]
pub(crate) mod test_helpers;
