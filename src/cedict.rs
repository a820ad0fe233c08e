//! Conversion from CC-CEDICT text to the dictionary JSON the generator reads.
//!
//! CC-CEDICT has one reading per line:
//!
//! ```text
//! # comment
//! 長 长 [chang2] /long/length/
//! 長 长 [zhang3] /chief/head/to grow/
//! ```
//!
//! Lines sharing a simplified form are merged into one [`DictionaryEntry`]
//! with one pinyin/definition-set pair per distinct reading, in file order.
//! The traditional form of the first line wins. Converted entries have no
//! components; those come from a separate decomposition source.

use crate::types::{Dictionary, DictionaryEntry, Entry};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CedictError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One parsed CC-CEDICT line, borrowing from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CedictLine<'a> {
    pub traditional: &'a str,
    pub simplified: &'a str,
    pub pinyin: &'a str,
    pub glosses: Vec<&'a str>,
}

/// Result of a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertReport {
    pub entries: usize,
    pub readings: usize,
    /// 1-based numbers of lines that were neither comments nor valid entries.
    pub skipped: Vec<usize>,
}

/// Parse `TRAD SIMP [pin1 yin1] /gloss/gloss/`.
///
/// Returns `None` for anything that does not have all four parts.
pub fn parse_line(line: &str) -> Option<CedictLine<'_>> {
    let (traditional, rest) = line.trim_end().split_once(' ')?;
    let (simplified, rest) = rest.split_once(' ')?;
    let rest = rest.strip_prefix('[')?;
    let (pinyin, rest) = rest.split_once(']')?;
    let glosses = rest.strip_prefix(" /")?.strip_suffix('/')?;

    let glosses: Vec<&str> = glosses.split('/').filter(|g| !g.is_empty()).collect();
    if traditional.is_empty() || simplified.is_empty() || glosses.is_empty() {
        return None;
    }
    Some(CedictLine {
        traditional,
        simplified,
        pinyin: pinyin.trim(),
        glosses,
    })
}

/// Parse a whole CC-CEDICT file into a dictionary keyed by simplified form.
pub fn parse_cedict(text: &str) -> (Dictionary, ConvertReport) {
    let mut merged: BTreeMap<String, DictionaryEntry> = BTreeMap::new();
    let mut report = ConvertReport::default();

    for (number, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(parsed) = parse_line(trimmed) else {
            report.skipped.push(number + 1);
            continue;
        };

        let root = merged
            .entry(parsed.simplified.to_string())
            .or_insert_with(|| DictionaryEntry {
                entry: Entry {
                    simplified: parsed.simplified.to_string(),
                    traditional: parsed.traditional.to_string(),
                    pinyin: Vec::new(),
                    definitions: Vec::new(),
                },
                components: Vec::new(),
            });
        let entry = &mut root.entry;
        let glosses = parsed.glosses.iter().map(|g| g.to_string());
        match entry.pinyin.iter().position(|p| p == parsed.pinyin) {
            Some(existing) => entry.definitions[existing].extend(glosses),
            None => {
                entry.pinyin.push(parsed.pinyin.to_string());
                entry.definitions.push(glosses.collect());
            }
        }
    }

    report.entries = merged.len();
    report.readings = merged.values().map(|e| e.entry.pinyin.len()).sum();
    (merged.into_iter().collect(), report)
}

/// Convert the CC-CEDICT file at `input` into dictionary JSON at `output`.
///
/// Keys are written sorted so the same input always produces the same file.
pub fn convert(input: &Path, output: &Path) -> Result<ConvertReport, CedictError> {
    let text = fs::read_to_string(input)?;
    let (dictionary, report) = parse_cedict(&text);

    let sorted: BTreeMap<&String, &DictionaryEntry> = dictionary.iter().collect();
    let json = serde_json::to_string_pretty(&sorted)?;
    fs::write(output, json)?;

    if !report.skipped.is_empty() {
        tracing::warn!(count = report.skipped.len(), "skipped malformed CEDICT lines");
    }
    Ok(report)
}
