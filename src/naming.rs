//! Headword → filename and headword → link conventions.
//!
//! Every generated document is named after its root entry's simplified form:
//!
//! - `你好` → `docs/你好.html` (on disk, unescaped)
//! - `你好` → `%E4%BD%A0%E5%A5%BD` (index link, percent-encoded)
//!
//! Both the writer in [`crate::generate`] and the [`crate::index`] builder go
//! through this module, so an index link always decodes back to the name of a
//! file the generator produced.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Extension of every generated document.
pub const DOCUMENT_EXTENSION: &str = "html";

/// Name of the navigation page inside the output directory.
pub const INDEX_FILENAME: &str = "index.html";

/// Characters left as-is in link targets: ASCII alphanumerics and the
/// RFC 3986 unreserved marks. Everything else, including every byte of a
/// multi-byte UTF-8 sequence, is `%XX`-encoded.
const LINK_TARGET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Whether a headword can be used verbatim as one path segment.
pub fn is_safe_segment(headword: &str) -> bool {
    !headword.is_empty()
        && headword != "."
        && headword != ".."
        && !headword.contains(['/', '\\', '\0'])
}

/// Whether a headword can name its own document: a safe segment that does
/// not collide with the index page.
pub fn is_usable_headword(headword: &str) -> bool {
    is_safe_segment(headword) && document_filename(headword) != INDEX_FILENAME
}

/// File name of the document generated for `headword`.
pub fn document_filename(headword: &str) -> String {
    format!("{headword}.{DOCUMENT_EXTENSION}")
}

/// Percent-encode a headword for use in an `href`.
pub fn encode_headword(headword: &str) -> String {
    utf8_percent_encode(headword, LINK_TARGET).to_string()
}

/// Link target for `headword` as seen from the index page.
///
/// With `pretty_urls` the extension is left off (`/你好` served from
/// `你好.html`), which is what static hosts like GitHub Pages resolve.
pub fn link_target(headword: &str, pretty_urls: bool) -> String {
    let encoded = encode_headword(headword);
    if pretty_urls {
        encoded
    } else {
        format!("{encoded}.{DOCUMENT_EXTENSION}")
    }
}
