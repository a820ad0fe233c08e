//! Dictionary data model shared by loading, rendering, and indexing.
//!
//! The model mirrors the JSON input one-to-one. A run treats it as read-only:
//! it is built once by [`crate::dictionary::load_dictionary`] and then only
//! borrowed by the renderer, the dispatcher, and the index builder.
//!
//! Field names are lowercase. The capitalized names written by Go's
//! `encoding/json` for the same records (`Entry`, `Simplified`, …) are accepted
//! as aliases, and a `null` list reads as empty.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// All root entries keyed by headword. Iteration order is unspecified.
pub type Dictionary = HashMap<String, DictionaryEntry>;

/// Pronunciations and glosses for a headword or a component.
///
/// `pinyin[i]` is described by `definitions[i]`; each definition set holds
/// alternative glosses for that one reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(alias = "Simplified")]
    pub simplified: String,
    #[serde(alias = "Traditional")]
    pub traditional: String,
    #[serde(default, alias = "Pinyin", deserialize_with = "null_as_empty")]
    pub pinyin: Vec<String>,
    #[serde(default, alias = "Definitions", deserialize_with = "null_as_empty")]
    pub definitions: Vec<Vec<String>>,
}

impl Entry {
    /// Reading/gloss pairs in index order.
    pub fn readings(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.pinyin
            .iter()
            .zip(&self.definitions)
            .map(|(pinyin, glosses)| (pinyin.as_str(), glosses.as_slice()))
    }

    /// Whether the pinyin and definition lists line up.
    pub fn is_aligned(&self) -> bool {
        self.pinyin.len() == self.definitions.len()
    }
}

/// A decomposition unit of a headword, itself decomposable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(alias = "Text")]
    pub text: String,
    /// Opaque to rendering; carried through for consumers of the JSON.
    #[serde(default, alias = "Position")]
    pub position: [i64; 2],
    #[serde(alias = "Entry")]
    pub entry: Entry,
    #[serde(default, alias = "Components", deserialize_with = "null_as_empty")]
    pub components: Vec<Component>,
}

// Children are detached onto a heap worklist before each node is dropped, so
// freeing a tree never recurses once per level.
impl Drop for Component {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.components);
        while let Some(mut component) = pending.pop() {
            pending.append(&mut component.components);
        }
    }
}

impl Component {
    /// Label shown on the collapsible block for this component.
    pub fn label(&self) -> &str {
        if self.entry.simplified.is_empty() {
            &self.text
        } else {
            &self.entry.simplified
        }
    }
}

/// Root record for one headword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    #[serde(alias = "Entry")]
    pub entry: Entry,
    #[serde(default, alias = "Components", deserialize_with = "null_as_empty")]
    pub components: Vec<Component>,
}

impl DictionaryEntry {
    /// The simplified form, which also names the generated document.
    pub fn headword(&self) -> &str {
        &self.entry.simplified
    }

    /// Total number of components at every depth.
    pub fn component_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&Component> = self.components.iter().collect();
        while let Some(component) = pending.pop() {
            count += 1;
            pending.extend(&component.components);
        }
        count
    }

    /// Deepest component nesting level; 0 when there are no components.
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&Component, usize)> =
            self.components.iter().map(|c| (c, 1)).collect();
        while let Some((component, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(component.components.iter().map(|c| (c, depth + 1)));
        }
        deepest
    }
}

/// Go marshals a nil slice as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
