//! The navigation page linking every generated document.
//!
//! Links are collected while the dispatcher submits entries, then rendered
//! once into `index.html` as a grid of tiles. The builder runs on the
//! submitting thread only; it shares nothing with the workers.

use crate::config::IndexConfig;
use crate::naming;
use crate::types::DictionaryEntry;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::io;
use std::path::Path;

const INDEX_CSS: &str = r#"
.grid-container {
    display: flex;
    flex-wrap: wrap;
}
.grid-item {
    width: 100px;
    height: 100px;
    display: flex;
    align-items: center;
    justify-content: center;
    border: 1px solid black;
    flex-grow: 1;
    text-align: center;
}
@media (max-width: 600px) {
    .grid-item {
        width: 50px;
        height: 50px;
    }
}
"#;

/// One tile on the index page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexLink {
    /// Headword as displayed.
    pub label: String,
    /// Percent-encoded `href`.
    pub target: String,
}

#[derive(Debug, Default)]
pub struct IndexBuilder {
    pretty_urls: bool,
    links: Vec<IndexLink>,
}

impl IndexBuilder {
    pub fn new(pretty_urls: bool) -> Self {
        Self {
            pretty_urls,
            links: Vec::new(),
        }
    }

    /// Add a link to the document generated for `entry`.
    pub fn push(&mut self, entry: &DictionaryEntry) {
        let headword = entry.headword();
        self.links.push(IndexLink {
            label: headword.to_string(),
            target: naming::link_target(headword, self.pretty_urls),
        });
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links ordered by headword, independent of submission order.
    pub fn links(&self) -> Vec<&IndexLink> {
        let mut links: Vec<&IndexLink> = self.links.iter().collect();
        links.sort();
        links
    }

    pub fn render(&self, config: &IndexConfig) -> Markup {
        html! {
            (DOCTYPE)
            html lang=(config.lang) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (config.title) }
                    style { (PreEscaped(INDEX_CSS)) }
                }
                body {
                    div.grid-container {
                        @for link in self.links() {
                            a.grid-item href=(link.target) { (link.label) }
                        }
                    }
                }
            }
        }
    }

    /// Render and write the page to `path`.
    pub fn write(&self, path: &Path, config: &IndexConfig) -> io::Result<()> {
        fs::write(path, self.render(config).into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::entry;
    use percent_encoding::percent_decode_str;
    use tempfile::TempDir;

    fn builder_with(headwords: &[&str], pretty_urls: bool) -> IndexBuilder {
        let mut builder = IndexBuilder::new(pretty_urls);
        for headword in headwords {
            builder.push(&entry(headword, vec![]));
        }
        builder
    }

    #[test]
    fn one_link_per_entry() {
        let builder = builder_with(&["你好", "好", "子"], true);
        let html = builder.render(&IndexConfig::default()).into_string();
        assert_eq!(builder.len(), 3);
        assert_eq!(html.matches(r#"class="grid-item""#).count(), 3);
    }

    #[test]
    fn link_targets_are_percent_encoded() {
        let builder = builder_with(&["你好"], true);
        let html = builder.render(&IndexConfig::default()).into_string();
        assert!(html.contains(r#"<a class="grid-item" href="%E4%BD%A0%E5%A5%BD">你好</a>"#));
    }

    #[test]
    fn link_targets_decode_to_headwords() {
        let headwords = ["你好", "卡拉OK", "A B"];
        let builder = builder_with(&headwords, true);
        for link in builder.links() {
            let decoded = percent_decode_str(&link.target).decode_utf8().unwrap();
            assert_eq!(decoded, link.label);
            assert!(headwords.contains(&link.label.as_str()));
        }
    }

    #[test]
    fn links_with_extension_when_not_pretty() {
        let builder = builder_with(&["好"], false);
        assert_eq!(builder.links()[0].target, "%E5%A5%BD.html");
    }

    #[test]
    fn links_sorted_regardless_of_push_order() {
        let forward = builder_with(&["c", "a", "b"], true);
        let backward = builder_with(&["b", "a", "c"], true);
        let config = IndexConfig::default();
        assert_eq!(
            forward.render(&config).into_string(),
            backward.render(&config).into_string()
        );
        let labels: Vec<_> = forward.links().iter().map(|l| l.label.clone()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn page_has_wrapper_and_config_title() {
        let config = IndexConfig {
            title: "CEDICT".into(),
            lang: "zh-Hans".into(),
            pretty_urls: true,
        };
        let html = builder_with(&[], true).render(&config).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="zh-Hans">"#));
        assert!(html.contains("<title>CEDICT</title>"));
        assert!(html.contains("initial-scale=1"));
        assert!(html.contains("@media (max-width: 600px)"));
        assert!(html.contains(r#"<div class="grid-container"></div>"#));
    }

    #[test]
    fn labels_are_escaped() {
        let builder = builder_with(&["<i>"], true);
        let html = builder.render(&IndexConfig::default()).into_string();
        assert!(html.contains(">&lt;i&gt;</a>"));
    }

    #[test]
    fn write_creates_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.html");
        builder_with(&["好"], true)
            .write(&path, &IndexConfig::default())
            .unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("%E5%A5%BD"));
    }
}
