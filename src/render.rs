//! Page rendering through the site project's Jinja templates.
//!
//! Templates live in `<ui-dir>/templates/` and are loaded at run time, so the
//! site can be restyled without rebuilding the tool. Each template receives a
//! fixed, typed view:
//!
//! | Template | View | Output |
//! |----------|------|--------|
//! | `index.jinja` | [`CoverView`] (empty) | `docs/index.html` |
//! | `source_item_template.jinja` | [`SourceItemView`] | `docs/source/<dir>/<name>.index.html` |
//! | `source_index_template.jinja` | [`SourceIndexView`] | `docs/source/index.html` |
//! | `tutorial_template.jinja` | `TutorialView` | `docs/tutorials/<slug>.html` |
//!
//! Blocks are trimmed (`trim_blocks`) and interpolation is not auto-escaped,
//! matching a stock Jinja environment; templates escape with `|e` where the
//! value is not trusted.
//!
//! Files are only rewritten when their content changes, so an unchanged
//! storage tree leaves the cover and index pages untouched.

use crate::config::SitePaths;
use crate::index::RenderElement;
use crate::snapshot::SnapshotDescriptor;
use chrono::{Local, NaiveDateTime};
use minijinja::{AutoEscape, Environment, path_loader};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const COVER_TEMPLATE: &str = "index.jinja";
pub const SOURCE_ITEM_TEMPLATE: &str = "source_item_template.jinja";
pub const SOURCE_INDEX_TEMPLATE: &str = "source_index_template.jinja";
pub const TUTORIAL_TEMPLATE: &str = "tutorial_template.jinja";

/// C `ctime()` layout, e.g. `Fri Oct 27 13:16:35 2017`.
const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template {name}: {source}")]
    Template {
        name: &'static str,
        source: minijinja::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What happened to an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub path: PathBuf,
    pub status: WriteStatus,
}

#[derive(Serialize)]
pub struct CoverView {}

#[derive(Serialize)]
pub struct SourceItemView<'a> {
    pub item: &'a SnapshotDescriptor,
    pub today: &'a str,
}

#[derive(Serialize)]
pub struct SourceIndexView<'a> {
    pub elements: &'a [RenderElement<'a>],
}

/// Format a timestamp the way C `ctime()` does, independent of locale.
pub fn ctime(time: &NaiveDateTime) -> String {
    time.format(CTIME_FORMAT).to_string()
}

/// Current local time in [`ctime`] format.
pub fn now_ctime() -> String {
    ctime(&Local::now().naive_local())
}

/// Renders every page of the site from one template environment.
pub struct SiteRenderer {
    env: Environment<'static>,
    paths: SitePaths,
    today: String,
}

impl SiteRenderer {
    /// `today` is stamped on every detail page of this run.
    pub fn new(paths: &SitePaths, today: String) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(&paths.templates));
        env.set_trim_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self {
            env,
            paths: paths.clone(),
            today,
        }
    }

    pub fn today(&self) -> &str {
        &self.today
    }

    pub fn paths(&self) -> &SitePaths {
        &self.paths
    }

    pub fn render_cover(&self) -> Result<GeneratedPage, RenderError> {
        let path = self.paths.docs.join("index.html");
        self.render_to(COVER_TEMPLATE, CoverView {}, &path)
    }

    /// Render one snapshot's detail page into its category output directory.
    ///
    /// The directory must already exist.
    pub fn render_source_item(
        &self,
        snapshot: &SnapshotDescriptor,
    ) -> Result<GeneratedPage, RenderError> {
        let path = self
            .paths
            .docs_source
            .join(&snapshot.directory)
            .join(snapshot.page_file_name());
        let view = SourceItemView {
            item: snapshot,
            today: &self.today,
        };
        self.render_to(SOURCE_ITEM_TEMPLATE, view, &path)
    }

    pub fn render_source_index(
        &self,
        elements: &[RenderElement<'_>],
    ) -> Result<GeneratedPage, RenderError> {
        let path = self.paths.docs_source.join("index.html");
        self.render_to(SOURCE_INDEX_TEMPLATE, SourceIndexView { elements }, &path)
    }

    /// Render `template` with `view` and write the result to `path`.
    pub fn render_to<S: Serialize>(
        &self,
        template: &'static str,
        view: S,
        path: &Path,
    ) -> Result<GeneratedPage, RenderError> {
        let to_err = |source: minijinja::Error| RenderError::Template {
            name: template,
            source,
        };
        let html = self
            .env
            .get_template(template)
            .and_then(|t| t.render(view))
            .map_err(to_err)?;
        let status = write_page(path, &html)?;
        debug!(path = %path.display(), ?status, "rendered {template}");
        Ok(GeneratedPage {
            path: path.to_path_buf(),
            status,
        })
    }
}

/// Write `contents` to `path` unless the file already holds exactly that.
pub fn write_page(path: &Path, contents: &str) -> Result<WriteStatus, RenderError> {
    if let Ok(existing) = fs::read(path)
        && existing == contents.as_bytes()
    {
        return Ok(WriteStatus::Unchanged);
    }
    fs::write(path, contents).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(WriteStatus::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn site_with_templates(templates: &[(&str, &str)]) -> (TempDir, SitePaths) {
        let tmp = TempDir::new().unwrap();
        let paths = SitePaths::new(tmp.path());
        fs::create_dir_all(&paths.templates).unwrap();
        for (name, body) in templates {
            fs::write(paths.templates.join(name), body).unwrap();
        }
        for dir in paths.output_dirs() {
            fs::create_dir_all(dir).unwrap();
        }
        (tmp, paths)
    }

    fn snapshot() -> SnapshotDescriptor {
        SnapshotDescriptor::new("abc123", "latest.md", "GitHub", &SiteConfig::default())
    }

    #[test]
    fn ctime_matches_c_layout() {
        let t = NaiveDate::from_ymd_opt(2017, 10, 27)
            .unwrap()
            .and_hms_opt(13, 16, 35)
            .unwrap();
        assert_eq!(ctime(&t), "Fri Oct 27 13:16:35 2017");
    }

    #[test]
    fn ctime_pads_single_digit_day_with_space() {
        let t = NaiveDate::from_ymd_opt(2017, 10, 5)
            .unwrap()
            .and_hms_opt(9, 3, 0)
            .unwrap();
        assert_eq!(ctime(&t), "Thu Oct  5 09:03:00 2017");
    }

    #[test]
    fn cover_rendered_without_variables() {
        let (_tmp, paths) = site_with_templates(&[(COVER_TEMPLATE, "<h1>tosknight</h1>\n")]);
        let renderer = SiteRenderer::new(&paths, "now".to_string());

        let page = renderer.render_cover().unwrap();

        assert_eq!(page.path, paths.docs.join("index.html"));
        // A single trailing newline is dropped, as in Jinja
        assert_eq!(fs::read_to_string(&page.path).unwrap(), "<h1>tosknight</h1>");
    }

    #[test]
    fn source_item_receives_item_and_today() {
        let (_tmp, paths) = site_with_templates(&[(
            SOURCE_ITEM_TEMPLATE,
            "{{ item.displayName }}|{{ item.markdownURL }}|{{ today }}",
        )]);
        fs::create_dir_all(paths.docs_source.join("abc123")).unwrap();
        let renderer = SiteRenderer::new(&paths, "Fri Oct 27 13:16:35 2017".to_string());

        let page = renderer.render_source_item(&snapshot()).unwrap();

        assert_eq!(
            page.path,
            paths.docs_source.join("abc123/latest.index.html")
        );
        let html = fs::read_to_string(&page.path).unwrap();
        assert_eq!(
            html,
            "Latest version|https://github.com/tosknight/tosknight-storage/blob/master/abc123/latest.md|Fri Oct 27 13:16:35 2017"
        );
    }

    #[test]
    fn source_index_walks_elements() {
        let (_tmp, paths) = site_with_templates(&[(
            SOURCE_INDEX_TEMPLATE,
            "{% for e in elements %}\
             {% if e.type == 'start-category' %}[{{ e.content }}{% endif %}\
             {% if e.type == 'link' %} {{ e.content.name }}{% endif %}\
             {% if e.type == 'end-category' %}]{% endif %}\
             {% endfor %}",
        )]);
        let renderer = SiteRenderer::new(&paths, String::new());
        let s = snapshot();
        let elements = vec![
            RenderElement::StartCategory("GitHub"),
            RenderElement::StartList,
            RenderElement::Link(&s),
            RenderElement::EndList,
            RenderElement::EndCategory,
        ];

        let page = renderer.render_source_index(&elements).unwrap();

        assert_eq!(fs::read_to_string(page.path).unwrap(), "[GitHub latest]");
    }

    #[test]
    fn markers_without_payload_test_as_none() {
        let (_tmp, paths) = site_with_templates(&[(
            SOURCE_INDEX_TEMPLATE,
            "{% for e in elements %}{{ e.type }}={{ e.content is none }};{% endfor %}",
        )]);
        let renderer = SiteRenderer::new(&paths, String::new());
        let elements = vec![
            RenderElement::StartCategory("GitHub"),
            RenderElement::StartList,
            RenderElement::EndList,
            RenderElement::EndCategory,
        ];

        let page = renderer.render_source_index(&elements).unwrap();

        assert_eq!(
            fs::read_to_string(page.path).unwrap(),
            "start-category=false;start-list=true;end-list=true;end-category=true;"
        );
    }

    #[test]
    fn trim_blocks_enabled() {
        let (_tmp, paths) =
            site_with_templates(&[(COVER_TEMPLATE, "{% if true %}\nyes\n{% endif %}\n")]);
        let renderer = SiteRenderer::new(&paths, String::new());

        let page = renderer.render_cover().unwrap();
        assert_eq!(fs::read_to_string(page.path).unwrap(), "yes\n");
    }

    #[test]
    fn escape_filter_available() {
        let (_tmp, paths) =
            site_with_templates(&[(SOURCE_ITEM_TEMPLATE, "{{ item.category|e }}")]);
        fs::create_dir_all(paths.docs_source.join("abc123")).unwrap();
        let renderer = SiteRenderer::new(&paths, String::new());
        let s = SnapshotDescriptor::new(
            "abc123",
            "latest.md",
            "<b>AT&T</b>",
            &SiteConfig::default(),
        );

        let page = renderer.render_source_item(&s).unwrap();
        let html = fs::read_to_string(page.path).unwrap();
        assert!(html.starts_with("&lt;b&gt;AT&amp;T"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn missing_template_is_template_error() {
        let (_tmp, paths) = site_with_templates(&[]);
        let renderer = SiteRenderer::new(&paths, String::new());

        let err = renderer.render_cover().unwrap_err();
        assert!(matches!(
            err,
            RenderError::Template {
                name: COVER_TEMPLATE,
                ..
            }
        ));
    }

    #[test]
    fn unwritable_output_is_io_error() {
        let (_tmp, paths) = site_with_templates(&[(SOURCE_ITEM_TEMPLATE, "x")]);
        let renderer = SiteRenderer::new(&paths, String::new());

        // Category output directory was never created
        let err = renderer.render_source_item(&snapshot()).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }

    #[test]
    fn write_page_skips_identical_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.html");

        assert_eq!(write_page(&path, "a").unwrap(), WriteStatus::Written);
        assert_eq!(write_page(&path, "a").unwrap(), WriteStatus::Unchanged);
        assert_eq!(write_page(&path, "b").unwrap(), WriteStatus::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "b");
    }
}
