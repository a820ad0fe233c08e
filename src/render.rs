//! Per-entry document rendering.
//!
//! Each root entry becomes one HTML fragment: a heading block for the root,
//! followed by its readings, followed by one collapsible `<details>` block per
//! component. Components nest to whatever depth the data has.
//!
//! ## Layout
//!
//! ```text
//! <h1>好</h1>
//! <p>Simplified: 好</p>
//! <p>Traditional: 好</p><p>Pinyin: hǎo</p>
//! <p>Definition: good; well</p>
//! <details><summary>女</summary>
//! <p>Simplified: 女</p>
//! <p>Traditional: 女</p><p>Pinyin: nǚ</p>
//! <p>Definition: woman</p>
//! </details>
//! ```
//!
//! Line breaks are CR-LF. The heading block does not end with a line break;
//! each reading does. Existing generated sites depend on this exact byte
//! layout.
//!
//! ## Traversal
//!
//! Component trees are walked with an explicit stack of [`Frame`]s rather than
//! native recursion, so input depth never translates into call-stack depth.
//! Closing a `<details>` block is itself a frame, pushed beneath the
//! component's children so it runs after every descendant has been written.
//!
//! Rendering reads only the entry it is given and writes only to its own
//! buffer, so documents are byte-identical whether rendered alone or
//! alongside thousands of others.

use crate::types::{Component, DictionaryEntry, Entry};
use maud::{Markup, Render};

/// Separator placed between alternative glosses of one reading.
pub const DEFINITION_SEPARATOR: &str = "; ";

const CRLF: &str = "\r\n";
const DETAILS_CLOSE: &str = "</details>";

/// A renderable view over one root entry.
pub struct EntryDocument<'a> {
    root: &'a DictionaryEntry,
}

impl<'a> EntryDocument<'a> {
    pub fn new(root: &'a DictionaryEntry) -> Self {
        Self { root }
    }
}

enum Frame<'a> {
    Open(&'a Component),
    Close,
}

impl Render for EntryDocument<'_> {
    fn render_to(&self, buffer: &mut String) {
        let root = &self.root.entry;
        buffer.push_str("<h1>");
        root.simplified.render_to(buffer);
        buffer.push_str("</h1>");
        buffer.push_str(CRLF);
        write_entry_body(buffer, root);

        let mut stack: Vec<Frame<'_>> = self.root.components.iter().rev().map(Frame::Open).collect();
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Open(component) => {
                    buffer.push_str("<details><summary>");
                    component.label().render_to(buffer);
                    buffer.push_str("</summary>");
                    buffer.push_str(CRLF);
                    write_entry_body(buffer, &component.entry);

                    stack.push(Frame::Close);
                    stack.extend(component.components.iter().rev().map(Frame::Open));
                }
                Frame::Close => buffer.push_str(DETAILS_CLOSE),
            }
        }
    }
}

/// Names and readings, shared by the root and every component.
fn write_entry_body(buffer: &mut String, entry: &Entry) {
    buffer.push_str("<p>Simplified: ");
    entry.simplified.render_to(buffer);
    buffer.push_str("</p>");
    buffer.push_str(CRLF);
    buffer.push_str("<p>Traditional: ");
    entry.traditional.render_to(buffer);
    buffer.push_str("</p>");

    for (pinyin, glosses) in entry.readings() {
        buffer.push_str("<p>Pinyin: ");
        pinyin.render_to(buffer);
        buffer.push_str("</p>");
        buffer.push_str(CRLF);
        buffer.push_str("<p>Definition: ");
        glosses.join(DEFINITION_SEPARATOR).render_to(buffer);
        buffer.push_str("</p>");
        buffer.push_str(CRLF);
    }
}

/// Render the document for `root`.
pub fn render_entry(root: &DictionaryEntry) -> Markup {
    EntryDocument::new(root).render()
}
