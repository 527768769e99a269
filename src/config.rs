//! Run configuration.
//!
//! Two layers feed a build:
//!
//! - **CLI settings** ([`Settings`]): the storage tree and the site project
//!   directory. Both are required for `build`; validation happens once, up
//!   front, and produces a typed [`ConfigError`] instead of printing and
//!   carrying on.
//! - **Site config** ([`SiteConfig`]): an optional `config.toml` at the root of
//!   the site project. It only carries the two base URLs every generated link
//!   is built from.
//!
//! ## Site Project Layout
//!
//! ```text
//! ui/
//! ├── config.toml                  # Optional, see `gen-config`
//! ├── templates/                   # Jinja templates (input)
//! │   ├── index.jinja
//! │   ├── source_item_template.jinja
//! │   ├── source_index_template.jinja
//! │   └── tutorial_template.jinja
//! ├── tutorials/                   # Markdown tutorials (input, optional)
//! └── docs/                        # Generated site
//!     ├── index.html
//!     ├── source/
//!     └── tutorials/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # Published snapshot HTML, joined with `<directory>/<name>.html`
//! site_url = "https://tosknight.github.io/tosknight-storage/"
//! # Source repository browser, joined with `<directory>/<name>.md`
//! source_url = "https://github.com/tosknight/tosknight-storage/blob/master/"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required option --{0}")]
    MissingOption(&'static str),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

pub const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_SITE_URL: &str = "https://tosknight.github.io/tosknight-storage/";
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/tosknight/tosknight-storage/blob/master/";

/// Site configuration loaded from `config.toml` in the site project.
///
/// The defaults are the published locations; external links depend on them,
/// so overriding is meant for forks and staging sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Base URL of the published snapshot HTML.
    pub site_url: String,
    /// Base URL for browsing snapshot sources in the storage repository.
    pub source_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
        }
    }
}

impl SiteConfig {
    /// Both URLs must be absolute http(s) and end with `/`, since snapshot
    /// links are built by plain concatenation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [("site_url", &self.site_url), ("source_url", &self.source_url)] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be an absolute http(s) URL, got {value:?}"
                )));
            }
            if !value.ends_with('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must end with '/', got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Output and input locations derived from the site project directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SitePaths {
    pub templates: PathBuf,
    pub tutorials: PathBuf,
    pub docs: PathBuf,
    pub docs_source: PathBuf,
    pub docs_tutorials: PathBuf,
}

impl SitePaths {
    pub fn new(ui_dir: &Path) -> Self {
        let docs = ui_dir.join("docs");
        Self {
            templates: ui_dir.join("templates"),
            tutorials: ui_dir.join("tutorials"),
            docs_source: docs.join("source"),
            docs_tutorials: docs.join("tutorials"),
            docs,
        }
    }

    /// Output directories every build writes into, parents first.
    pub fn output_dirs(&self) -> [&Path; 3] {
        [
            self.docs.as_path(),
            self.docs_source.as_path(),
            self.docs_tutorials.as_path(),
        ]
    }
}

/// Everything a full build needs, validated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub storage_dir: PathBuf,
    pub ui_dir: PathBuf,
    pub paths: SitePaths,
    pub site: SiteConfig,
}

impl Settings {
    /// Validate raw CLI options and load the site config.
    ///
    /// An empty path counts as missing.
    pub fn from_args(
        storage_dir: Option<PathBuf>,
        ui_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let storage_dir = require(storage_dir, "storage-dir")?;
        let ui_dir = require(ui_dir, "ui-dir")?;
        let site = load_config(&ui_dir)?;
        Ok(Self {
            paths: SitePaths::new(&ui_dir),
            storage_dir,
            ui_dir,
            site,
        })
    }
}

/// Unwrap a required CLI path, rejecting absent or empty values.
pub fn require(value: Option<PathBuf>, option: &'static str) -> Result<PathBuf, ConfigError> {
    value
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(ConfigError::MissingOption(option))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
        path: config_path.clone(),
        source,
    })?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the site config for a site project directory.
///
/// Merges user values over stock defaults, rejects unknown keys and validates.
pub fn load_config(ui_dir: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(ui_dir)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# tosknight-site configuration
# ============================
# Place this file at the root of the site project (next to templates/).
# All settings are optional; values shown below are the defaults.
# Unknown keys will cause an error.

# Base URL of the published snapshot HTML. Each snapshot links to
# <site_url><category-dir>/<name>.html
site_url = "https://tosknight.github.io/tosknight-storage/"

# Base URL for browsing snapshot sources. Each snapshot links to
# <source_url><category-dir>/<name>.md
source_url = "https://github.com/tosknight/tosknight-storage/blob/master/"
"##
}
