//! # cedict-pages
//!
//! Generates a static, browsable reference site from a Chinese dictionary
//! whose entries carry nested character decompositions. Each headword gets
//! its own HTML document; `index.html` links them all.
//!
//! # Pipeline
//!
//! ```text
//! cedict_ts.u8  ──convert──▶  cedict_with_components.json  ──build──▶  docs/
//!                                   (+ component data)                 ├── index.html
//!                                                                      ├── 你好.html
//!                                                                      └── …
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | The entry/component data model |
//! | [`dictionary`] | Loads the JSON dictionary and checks its invariants |
//! | [`render`] | Renders one entry's document, nested components included |
//! | [`dispatch`] | Runs per-entry jobs on a bounded worker pool |
//! | [`progress`] | Counts completed jobs and draws the progress bar |
//! | [`index`] | Builds the `index.html` link grid |
//! | [`generate`] | Ties a run together: output dir, dispatch, index, report |
//! | [`naming`] | Headword → filename and headword → link conventions |
//! | [`cedict`] | Converts CC-CEDICT text into the dictionary JSON |
//! | [`config`] | `config.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Writer Per Concern
//!
//! Worker jobs render and write their own file and nothing else. The progress
//! display belongs to a single tracker thread fed by a channel, and the index
//! page belongs to the submitting thread. No lock is shared between workers,
//! and the completion count is exact regardless of scheduling.
//!
//! ## Bounded Submission
//!
//! The worker count `K` caps both the pool size and the number of submitted
//! but unfinished jobs, so at most `K` rendered documents are held at once.
//! The dictionary itself and the index links are kept in memory for the whole
//! run. `K` is a config value (`generation.workers`) because the work is mostly
//! file I/O, where the best value depends on the disk rather than the CPU.
//!
//! ## Explicit-Stack Rendering
//!
//! Component trees have no depth limit in the data model. The renderer walks
//! them with an explicit stack, so a pathological entry costs heap, not call
//! stack.

pub mod cedict;
pub mod config;
pub mod dictionary;
pub mod dispatch;
pub mod generate;
pub mod index;
pub mod naming;
pub mod output;
pub mod progress;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
