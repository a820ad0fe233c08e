//! Static page generation.
//!
//! Turns a loaded dictionary into one HTML document per root entry plus an
//! `index.html` linking all of them.
//!
//! ## Output Structure
//!
//! ```text
//! docs/
//! ├── index.html        # Grid of links to every entry
//! ├── 你好.html
//! ├── 好.html
//! └── ...
//! ```
//!
//! ## Run Shape
//!
//! ```text
//! caller thread     dispatcher: submit entry ─┬─ index.push(entry) ─ … ─ write index.html
//! pool (K threads)                            └─ render ─ write ─ send ProgressEvent
//! tracker thread    recv ProgressEvent ─ count ─ draw bar ─ …
//! ```
//!
//! ## Failure Tiers
//!
//! Loading the dictionary, creating the output directory, starting the pool,
//! and writing `index.html` are fatal and return an error. Failing to write a
//! single entry's document is not: the failure is reported through the
//! progress tracker, the entry still counts as completed, and the run goes on.

use crate::config::BuildConfig;
use crate::dictionary::{DictionaryError, load_dictionary};
use crate::dispatch::{DispatchError, Dispatcher};
use crate::index::IndexBuilder;
use crate::naming;
use crate::output;
use crate::progress::{ProgressEvent, ProgressTracker};
use crate::render::render_entry;
use crate::types::{Dictionary, DictionaryEntry};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteIndex {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("progress tracker stopped unexpectedly")]
    ProgressTracker,
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// Entries in the dictionary.
    pub total: usize,
    pub generated: usize,
    /// Headwords whose document could not be written.
    pub failed: Vec<String>,
    pub index_links: usize,
    /// `*.html` files removed from a previous run.
    pub removed_stale: usize,
    pub elapsed: Duration,
}

/// Load the dictionary at `input` and generate the site into `output_dir`.
///
/// The dictionary is loaded before the output directory is touched, so a bad
/// input leaves a previous build in place.
pub fn generate(
    input: &Path,
    output_dir: &Path,
    config: &BuildConfig,
) -> Result<GenerateReport, GenerateError> {
    let dictionary = load_dictionary(input)?;
    generate_dictionary(&dictionary, output_dir, config, io::stdout())
}

/// Generate the site for an already-loaded dictionary.
///
/// Progress and per-entry failures are written to `console`.
pub fn generate_dictionary<W: Write + Send>(
    dictionary: &Dictionary,
    output_dir: &Path,
    config: &BuildConfig,
    mut console: W,
) -> Result<GenerateReport, GenerateError> {
    let started = Instant::now();

    fs::create_dir_all(output_dir).map_err(|source| GenerateError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let removed_stale = if config.output.clean {
        remove_stale_documents(output_dir)
    } else {
        0
    };

    let dispatcher = Dispatcher::new(config.generation.workers)?;
    let total = dictionary.len();
    tracing::info!(entries = total, workers = dispatcher.workers(), output = %output_dir.display(), "generating");

    let header = output::format_build_header(total, dispatcher.workers(), output_dir);
    if let Err(err) = writeln!(console, "{header}") {
        tracing::warn!(%err, "failed to write build header");
    }

    let mut tracker = ProgressTracker::new(total, config.progress.width, console);
    if !config.progress.enabled {
        tracker = tracker.without_bar();
    }
    let mut index = IndexBuilder::new(config.index.pretty_urls);
    let (events, receiver) = mpsc::channel();

    let summary = thread::scope(|scope| {
        let progress = scope.spawn(move || tracker.run(receiver));
        dispatcher.run(
            dictionary.values(),
            |entry| {
                let event = generate_entry(entry, output_dir);
                if events.send(event).is_err() {
                    tracing::error!(headword = entry.headword(), "progress tracker is gone");
                }
            },
            |entry| index.push(entry),
        );
        // Closing the channel lets the tracker finish.
        drop(events);
        progress.join()
    })
    .map_err(|_| GenerateError::ProgressTracker)?;
    debug_assert_eq!(summary.completed, total);

    let index_path = output_dir.join(naming::INDEX_FILENAME);
    index
        .write(&index_path, &config.index)
        .map_err(|source| GenerateError::WriteIndex {
            path: index_path.clone(),
            source,
        })?;

    let report = GenerateReport {
        output_dir: output_dir.to_path_buf(),
        total,
        generated: summary.generated,
        failed: summary.failed,
        index_links: index.len(),
        removed_stale,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        generated = report.generated,
        failed = report.failed.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "generation finished"
    );
    Ok(report)
}

/// Render one entry and write it next to its siblings.
fn generate_entry(root: &DictionaryEntry, output_dir: &Path) -> ProgressEvent {
    let headword = root.headword().to_string();
    let path = output_dir.join(naming::document_filename(&headword));
    match write_entry_document(root, &path) {
        Ok(()) => ProgressEvent::Generated { headword },
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "document not written");
            ProgressEvent::Failed {
                headword,
                path,
                error: err.to_string(),
            }
        }
    }
}

/// Render `root` and write it to `path`.
pub fn write_entry_document(root: &DictionaryEntry, path: &Path) -> io::Result<()> {
    fs::write(path, render_entry(root).into_string())
}

/// Delete `*.html` files directly inside `output_dir`. Returns how many were
/// removed; anything that cannot be read or removed is logged and skipped.
fn remove_stale_documents(output_dir: &Path) -> usize {
    let mut removed = 0;
    for entry in WalkDir::new(output_dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%err, "failed to list output directory");
                continue;
            }
        };
        let is_document = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == naming::DOCUMENT_EXTENSION);
        if !is_document {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), %err, "failed to remove stale document")
            }
        }
    }
    removed
}

// ============================================================================
// Tests
// ============================================================================
