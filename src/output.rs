//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! ==> Generating 3 entries with 64 workers → docs
//! [==================================================] 100%
//! Generated 3 documents in 0.02s
//!     index.html: 3 links
//! ```
//!
//! A run with failed entries lists them after the summary:
//!
//! ```text
//! Generated 2 documents in 0.02s
//!     index.html: 3 links
//! Failed 1 entry
//!     坏
//! ```
//!
//! ## Check
//!
//! ```text
//! cedict_with_components.json
//!     Entries: 3
//!     Readings: 4
//!     Components: 5 (max depth 2)
//! ```
//!
//! ## Convert
//!
//! ```text
//! cedict_ts.u8 → cedict_with_components.json
//!     Entries: 2 (3 readings)
//!     Skipped lines: 1
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. The progress bar is drawn by
//! [`crate::progress::ProgressTracker`], which formats through here too.

use crate::cedict::ConvertReport;
use crate::dictionary::DictionaryStats;
use crate::generate::GenerateReport;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 entry` / `2 entries`.
fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Format a progress bar of `width` cells for `completed` out of `total`.
///
/// ```text
/// [=========================                         ]  50%
/// ```
///
/// An empty run (`total == 0`) counts as complete. Counts past `total` are
/// clamped.
pub fn format_progress_bar(completed: usize, total: usize, width: usize) -> String {
    let (done, total) = if total == 0 {
        (1, 1)
    } else {
        (completed.min(total), total)
    };
    let filled = done * width / total;
    let percent = done * 100 / total;
    format!(
        "[{}{}] {:>3}%",
        "=".repeat(filled),
        " ".repeat(width - filled),
        percent
    )
}

/// Format the line reported when one entry's document cannot be written.
pub fn format_entry_failure(path: &Path, error: &str) -> String {
    format!("Error creating file {}: {}", path.display(), error)
}

// ============================================================================
// Build
// ============================================================================

/// Format the header printed before dispatch starts.
pub fn format_build_header(entries: usize, workers: usize, output_dir: &Path) -> String {
    format!(
        "==> Generating {} with {} → {}",
        plural(entries, "entry", "entries"),
        plural(workers, "worker", "workers"),
        output_dir.display()
    )
}

/// Format the summary of a finished generation run.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Generated {} in {:.2}s",
        plural(report.generated, "document", "documents"),
        report.elapsed.as_secs_f64()
    )];
    if report.removed_stale > 0 {
        lines.push(format!(
            "{}Removed {}",
            indent(1),
            plural(report.removed_stale, "stale document", "stale documents")
        ));
    }
    lines.push(format!(
        "{}{}: {}",
        indent(1),
        crate::naming::INDEX_FILENAME,
        plural(report.index_links, "link", "links")
    ));

    if !report.failed.is_empty() {
        lines.push(format!(
            "Failed {}",
            plural(report.failed.len(), "entry", "entries")
        ));
        let mut failed = report.failed.clone();
        failed.sort();
        for headword in failed {
            lines.push(format!("{}{}", indent(1), headword));
        }
    }
    lines
}

/// Print generation summary to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the shape of a validated dictionary.
pub fn format_check_output(stats: &DictionaryStats, input: &Path) -> Vec<String> {
    vec![
        format!("{}", input.display()),
        format!("{}Entries: {}", indent(1), stats.entries),
        format!("{}Readings: {}", indent(1), stats.readings),
        format!(
            "{}Components: {} (max depth {})",
            indent(1),
            stats.components,
            stats.max_depth
        ),
    ]
}

/// Print check output to stdout.
pub fn print_check_output(stats: &DictionaryStats, input: &Path) {
    for line in format_check_output(stats, input) {
        println!("{}", line);
    }
}

// ============================================================================
// Convert
// ============================================================================

/// Format the result of converting a CEDICT file.
pub fn format_convert_output(report: &ConvertReport, source: &Path, target: &Path) -> Vec<String> {
    let mut lines = vec![
        format!("{} → {}", source.display(), target.display()),
        format!(
            "{}Entries: {} ({})",
            indent(1),
            report.entries,
            plural(report.readings, "reading", "readings")
        ),
    ];
    if !report.skipped.is_empty() {
        lines.push(format!("{}Skipped lines: {}", indent(1), report.skipped.len()));
        for line_number in report.skipped.iter().take(5) {
            lines.push(format!("{}line {}", indent(2), line_number));
        }
        if report.skipped.len() > 5 {
            lines.push(format!("{}…", indent(2)));
        }
    }
    lines
}

/// Print convert output to stdout.
pub fn print_convert_output(report: &ConvertReport, source: &Path, target: &Path) {
    for line in format_convert_output(report, source, target) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
