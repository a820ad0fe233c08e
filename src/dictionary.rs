//! Dictionary loading and invariant checks.
//!
//! The input is one JSON object mapping a key to a [`DictionaryEntry`]. It is
//! read once at startup; any failure here aborts the whole run before a single
//! document is written.
//!
//! ## Checked Invariants
//!
//! - Every entry (root or component, at any depth) has as many pinyin readings
//!   as definition sets.
//! - Root simplified forms are unique, since each one names an output file.
//! - Root simplified forms are usable as a single path segment and do not
//!   collide with `index.html`.

use crate::naming;
use crate::types::{Component, Dictionary, DictionaryEntry, Entry};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(
        "entry '{key}': '{simplified}' has {pinyin} pinyin readings but {definitions} definition sets"
    )]
    Misaligned {
        key: String,
        simplified: String,
        pinyin: usize,
        definitions: usize,
    },
    #[error("headword '{simplified}' is used by both '{first}' and '{second}'")]
    DuplicateHeadword {
        simplified: String,
        first: String,
        second: String,
    },
    #[error("entry '{key}': headword '{simplified}' cannot be used as a file name")]
    UnsafeHeadword { key: String, simplified: String },
}

/// Read, parse, and validate the dictionary at `path`.
pub fn load_dictionary(path: &Path) -> Result<Dictionary, DictionaryError> {
    let content = fs::read_to_string(path)?;
    let dictionary = parse_dictionary(&content)?;
    tracing::debug!(entries = dictionary.len(), path = %path.display(), "loaded dictionary");
    Ok(dictionary)
}

/// Parse and validate a dictionary from JSON text.
///
/// Component trees have no depth limit, so serde_json's recursion limit is
/// lifted and parsing runs on a stack that grows on demand.
pub fn parse_dictionary(json: &str) -> Result<Dictionary, DictionaryError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let dictionary = Dictionary::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    validate(&dictionary)?;
    Ok(dictionary)
}

/// Check the invariants the generator relies on.
///
/// Keys are visited in sorted order so the reported error is stable between
/// runs over the same input.
pub fn validate(dictionary: &Dictionary) -> Result<(), DictionaryError> {
    let mut keys: Vec<&String> = dictionary.keys().collect();
    keys.sort();

    let mut owners: HashMap<&str, &str> = HashMap::with_capacity(dictionary.len());
    for key in keys {
        let root = &dictionary[key];
        let simplified = root.headword();

        if !naming::is_usable_headword(simplified) {
            return Err(DictionaryError::UnsafeHeadword {
                key: key.clone(),
                simplified: simplified.to_string(),
            });
        }
        if let Some(first) = owners.insert(simplified, key.as_str()) {
            return Err(DictionaryError::DuplicateHeadword {
                simplified: simplified.to_string(),
                first: first.to_string(),
                second: key.clone(),
            });
        }
        check_alignment(key, root)?;
    }
    Ok(())
}

fn check_alignment(key: &str, root: &DictionaryEntry) -> Result<(), DictionaryError> {
    let misaligned = |entry: &Entry| DictionaryError::Misaligned {
        key: key.to_string(),
        simplified: entry.simplified.clone(),
        pinyin: entry.pinyin.len(),
        definitions: entry.definitions.len(),
    };

    if !root.entry.is_aligned() {
        return Err(misaligned(&root.entry));
    }
    let mut pending: Vec<&Component> = root.components.iter().collect();
    while let Some(component) = pending.pop() {
        if !component.entry.is_aligned() {
            return Err(misaligned(&component.entry));
        }
        pending.extend(&component.components);
    }
    Ok(())
}

/// Shape of a loaded dictionary, for the `check` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictionaryStats {
    pub entries: usize,
    pub components: usize,
    pub readings: usize,
    pub max_depth: usize,
}

pub fn dictionary_stats(dictionary: &Dictionary) -> DictionaryStats {
    dictionary
        .values()
        .fold(DictionaryStats::default(), |mut stats, root| {
            stats.entries += 1;
            stats.components += root.component_count();
            stats.readings += root.entry.pinyin.len();
            stats.max_depth = stats.max_depth.max(root.max_depth());
            stats
        })
}
