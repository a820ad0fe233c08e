//! Shared test utilities for the cedict-pages test suite.
//!
//! Small builders for dictionary trees so tests read as the shape they
//! exercise rather than as nested struct literals.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let dictionary = dictionary_of(vec![
//!     entry("好", vec![
//!         component("女", vec![leaf("一", "yī", "one")]),
//!         leaf("子", "zǐ", "child"),
//!     ]),
//! ]);
//! ```

use crate::config::BuildConfig;
use crate::types::{Component, Dictionary, DictionaryEntry, Entry};

// =========================================================================
// Tree builders
// =========================================================================

/// Root entry with one reading (`"{simplified} pinyin"` / `"{simplified} gloss"`).
pub fn entry(simplified: &str, components: Vec<Component>) -> DictionaryEntry {
    DictionaryEntry {
        entry: Entry {
            simplified: simplified.to_string(),
            traditional: simplified.to_string(),
            pinyin: vec![format!("{simplified} pinyin")],
            definitions: vec![vec![format!("{simplified} gloss")]],
        },
        components,
    }
}

/// Component without readings of its own, wrapping `children`.
pub fn component(simplified: &str, children: Vec<Component>) -> Component {
    Component {
        text: simplified.to_string(),
        position: [0, 1],
        entry: Entry {
            simplified: simplified.to_string(),
            traditional: simplified.to_string(),
            pinyin: Vec::new(),
            definitions: Vec::new(),
        },
        components: children,
    }
}

/// Component with one reading and no children.
pub fn leaf(simplified: &str, pinyin: &str, gloss: &str) -> Component {
    Component {
        text: simplified.to_string(),
        position: [0, 1],
        entry: Entry {
            simplified: simplified.to_string(),
            traditional: simplified.to_string(),
            pinyin: vec![pinyin.to_string()],
            definitions: vec![vec![gloss.to_string()]],
        },
        components: Vec::new(),
    }
}

/// Key each root by its simplified form.
pub fn dictionary_of(entries: Vec<DictionaryEntry>) -> Dictionary {
    entries
        .into_iter()
        .map(|e| (e.headword().to_string(), e))
        .collect()
}

/// `n` distinct roots named `词0`, `词1`, …
pub fn numbered_entries(n: usize) -> Vec<DictionaryEntry> {
    (0..n)
        .map(|i| entry(&format!("词{i}"), vec![leaf("司", "sī", "to take charge of")]))
        .collect()
}

// =========================================================================
// Config
// =========================================================================

/// Default config with the given worker count.
pub fn build_config(workers: usize) -> BuildConfig {
    let mut config = BuildConfig::default();
    config.generation.workers = workers;
    config
}
