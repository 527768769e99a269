//! CLI output formatting.
//!
//! Output leads with what was found or produced (category names, snapshot
//! labels) and shows filesystem locations as secondary context. Each command
//! has a pure `format_*` function returning lines, and a `print_*` wrapper
//! that writes them to stdout.
//!
//! ## Check
//!
//! ```text
//! Categories
//! 001 GitHub Terms of Service (3 snapshots)
//!     Source: abc123/
//!     URL: https://help.github.com/articles/github-terms-of-service/
//!     001 Backup at 2017-10-27-13:16:35
//!     002 Latest version
//!
//! Found 3 snapshots in 1 directory
//! ```
//!
//! ## Build
//!
//! ```text
//! Cover → index.html
//! 001 GitHub Terms of Service → source/abc123/
//!     001 Backup at 2017-10-27-13:16:35 → source/abc123/2017-10-27-13:16:35.index.html
//!     002 Latest version → source/abc123/latest.index.html (unchanged)
//! Index → source/index.html
//!
//! Tutorials
//! 001 Getting Started → tutorials/getting-started.html
//!
//! Generated 2 snapshot pages, 1 tutorial (3 written, 2 unchanged)
//! ```

use crate::generate::GenerateReport;
use crate::render::{GeneratedPage, WriteStatus};
use crate::scan::StorageManifest;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Output path relative to `docs/`, with a marker for untouched files.
fn page_target(page: &GeneratedPage, docs: &Path) -> String {
    let rel = page.path.strip_prefix(docs).unwrap_or(&page.path);
    match page.status {
        WriteStatus::Written => rel.display().to_string(),
        WriteStatus::Unchanged => format!("{} (unchanged)", rel.display()),
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_scan_output(manifest: &StorageManifest) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];

    for (i, scan) in manifest.categories.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            scan.category.name,
            plural(scan.snapshots.len(), "snapshot")
        ));
        lines.push(format!("    Source: {}/", scan.directory));
        lines.push(format!("    URL: {}", scan.category.url));
        for (j, snapshot) in scan.snapshots.iter().enumerate() {
            lines.push(format!(
                "    {} {}",
                format_index(j + 1),
                snapshot.display_name
            ));
        }
    }

    if manifest.categories.is_empty() {
        lines.push("    (none)".to_string());
    }

    let dirs = manifest.categories.len();
    lines.push(String::new());
    lines.push(format!(
        "Found {} in {} {}",
        plural(manifest.snapshot_count(), "snapshot"),
        dirs,
        if dirs == 1 { "directory" } else { "directories" }
    ));
    lines
}

pub fn print_scan_output(manifest: &StorageManifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// `docs` is the output root that page paths are shown relative to.
pub fn format_generate_output(report: &GenerateReport, docs: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Cover \u{2192} {}", page_target(&report.cover, docs)));

    for (i, category) in report.categories.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} source/{}/",
            format_index(i + 1),
            category.scan.category.name,
            category.scan.directory
        ));
        for (j, (snapshot, page)) in category
            .scan
            .snapshots
            .iter()
            .zip(&category.pages)
            .enumerate()
        {
            lines.push(format!(
                "    {} {} \u{2192} {}",
                format_index(j + 1),
                snapshot.display_name,
                page_target(page, docs)
            ));
        }
    }

    lines.push(format!("Index \u{2192} {}", page_target(&report.index, docs)));

    if !report.tutorials.is_empty() {
        lines.push(String::new());
        lines.push("Tutorials".to_string());
        for (i, (tutorial, page)) in report.tutorials.iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                tutorial.title,
                page_target(page, docs)
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} ({} written, {} unchanged)",
        plural(report.snapshot_page_count(), "snapshot page"),
        plural(report.tutorials.len(), "tutorial"),
        report.count(WriteStatus::Written),
        report.count(WriteStatus::Unchanged),
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport, docs: &Path) {
    for line in format_generate_output(report, docs) {
        println!("{}", line);
    }
}
