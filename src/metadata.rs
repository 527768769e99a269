//! Category descriptor parsing.
//!
//! Every category directory in the storage tree carries a `.meta.yml`
//! describing the tracked document:
//!
//! ```yaml
//! name: GitHub Terms of Service
//! url: https://help.github.com/articles/github-terms-of-service/
//! ```
//!
//! Both keys are required. Extra keys are ignored so the storage crawler can
//! add fields without breaking the site build.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed descriptor filename inside each category directory.
pub const META_FILE: &str = ".meta.yml";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed YAML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("{} has no `{key}` key", path.display())]
    MissingKey { path: PathBuf, key: &'static str },
}

/// A category as declared by its descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Display name; also the grouping key for the source index.
    pub name: String,
    /// Canonical URL of the tracked document.
    pub url: String,
}

#[derive(Deserialize)]
struct RawMeta {
    name: Option<String>,
    url: Option<String>,
}

/// Read and validate the descriptor at `path`.
pub fn read_category_meta(path: &Path) -> Result<Category, MetadataError> {
    let content = fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_category_meta(&content, path)
}

/// Parse descriptor content. `path` is only used for error context.
pub fn parse_category_meta(content: &str, path: &Path) -> Result<Category, MetadataError> {
    let raw: RawMeta = serde_yaml::from_str(content).map_err(|source| MetadataError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let missing = |key| MetadataError::MissingKey {
        path: path.to_path_buf(),
        key,
    };
    Ok(Category {
        name: raw.name.ok_or_else(|| missing("name"))?,
        url: raw.url.ok_or_else(|| missing("url"))?,
    })
}
