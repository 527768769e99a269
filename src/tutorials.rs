//! Markdown tutorials.
//!
//! Every `*.md` file in `<ui-dir>/tutorials/` becomes
//! `docs/tutorials/<stem>.html`, rendered through `tutorial_template.jinja`.
//! The page title is the first `# heading`; without one, the file stem with
//! dashes turned into spaces is used (`reading-a-diff.md` → "reading a diff").
//!
//! The directory is optional. A site without tutorials builds fine.

use crate::render::{GeneratedPage, RenderError, SiteRenderer, TUTORIAL_TEMPLATE};
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TutorialError {
    #[error("cannot read tutorial {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Serialize)]
pub struct Tutorial {
    pub title: String,
    /// File stem; the output file is `<slug>.html`.
    pub slug: String,
    pub body_html: String,
}

#[derive(Serialize)]
struct TutorialView<'a> {
    tutorial: &'a Tutorial,
    today: &'a str,
}

/// Load all tutorials in `dir`, sorted by file name.
///
/// Returns an empty list when `dir` does not exist.
pub fn collect_tutorials(dir: &Path) -> Result<Vec<Tutorial>, TutorialError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let io_err = |source| TutorialError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut md_files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_tutorial_file(p))
        .collect();
    md_files.sort();

    md_files.iter().map(|path| read_tutorial(path)).collect()
}

/// Visible `.md` files. Hidden files such as macOS `._*` resource forks are skipped.
fn is_tutorial_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true);
    let markdown = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false);
    !hidden && markdown
}

fn read_tutorial(path: &Path) -> Result<Tutorial, TutorialError> {
    let content = fs::read_to_string(path).map_err(|source| TutorialError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let slug = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = content
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .unwrap_or_else(|| slug.replace('-', " "));

    Ok(Tutorial {
        title,
        slug,
        body_html: markdown_to_html(&content),
    })
}

pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

/// Render each tutorial to `docs/tutorials/<slug>.html`.
pub fn render_tutorials(
    renderer: &SiteRenderer,
    tutorials: &[Tutorial],
) -> Result<Vec<GeneratedPage>, TutorialError> {
    let out_dir = &renderer.paths().docs_tutorials;
    let mut pages = Vec::with_capacity(tutorials.len());
    for tutorial in tutorials {
        let view = TutorialView {
            tutorial,
            today: renderer.today(),
        };
        let path = out_dir.join(format!("{}.html", tutorial.slug));
        pages.push(renderer.render_to(TUTORIAL_TEMPLATE, view, &path)?);
    }
    Ok(pages)
}
