//! Snapshot descriptors.
//!
//! A snapshot is one stored copy of a tracked document. Its identity is the
//! filename stem: either a capture timestamp (`2017-10-27-13:16:35.md`) or the
//! sentinel `latest` for the most recent copy. Everything else (labels, file
//! names, public links, output location) is derived from the stem and the
//! category directory it lives in.
//!
//! ```text
//! storage/abc123/latest.md
//!   name          latest
//!   displayName   Latest version
//!   htmlName      latest.html
//!   markdownName  latest.md
//!   htmlURL       <site_url>abc123/latest.html
//!   markdownURL   <source_url>abc123/latest.md
//!   path          abc123/latest.index.html
//! ```
//!
//! The serialized field names are the variable names the Jinja templates use.

use crate::config::SiteConfig;
use serde::Serialize;
use std::path::Path;

/// Stem that marks the most recent copy of a document.
pub const LATEST: &str = "latest";

/// Label shown for the [`LATEST`] snapshot.
pub const LATEST_LABEL: &str = "Latest version";

/// Suffix of a snapshot's detail page, relative to its category directory.
pub const PAGE_SUFFIX: &str = ".index.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDescriptor {
    /// Category directory name, used as a path segment.
    pub directory: String,
    /// Filename stem.
    pub name: String,
    pub display_name: String,
    pub html_name: String,
    pub markdown_name: String,
    #[serde(rename = "markdownURL")]
    pub markdown_url: String,
    #[serde(rename = "htmlURL")]
    pub html_url: String,
    /// Detail page location relative to `docs/source/`.
    pub path: String,
    /// Display name of the owning category.
    pub category: String,
}

impl SnapshotDescriptor {
    pub fn new(directory: &str, filename: &str, category: &str, site: &SiteConfig) -> Self {
        let name = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string());

        let html_name = format!("{name}.html");
        let markdown_name = format!("{name}.md");

        Self {
            display_name: display_name(&name),
            html_url: format!("{}{directory}/{html_name}", site.site_url),
            markdown_url: format!("{}{directory}/{markdown_name}", site.source_url),
            path: format!("{directory}/{name}{PAGE_SUFFIX}"),
            directory: directory.to_string(),
            category: category.to_string(),
            name,
            html_name,
            markdown_name,
        }
    }

    /// File name of the detail page inside the category output directory.
    pub fn page_file_name(&self) -> String {
        format!("{}{PAGE_SUFFIX}", self.name)
    }

    pub fn is_latest(&self) -> bool {
        self.name == LATEST
    }
}

/// Human label for a snapshot stem.
pub fn display_name(name: &str) -> String {
    if name == LATEST {
        LATEST_LABEL.to_string()
    } else {
        format!("Backup at {name}")
    }
}
