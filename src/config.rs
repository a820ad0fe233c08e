//! Build configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's file, which only needs the keys it changes.
//! Command-line flags (`--workers`) are applied last.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [generation]
//! workers = 64              # Max documents generated at once
//!
//! [output]
//! clean = true              # Delete stale *.html before generating
//!
//! [index]
//! title = "Dictionary"      # <title> of index.html
//! lang = "zh"               # <html lang> of index.html
//! pretty_urls = true        # Link to "你好" rather than "你好.html"
//!
//! [progress]
//! enabled = true            # Draw the progress bar
//! width = 50                # Bar width in cells
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Concurrency of document generation.
    pub generation: GenerationConfig,
    /// Output directory housekeeping.
    pub output: OutputConfig,
    /// The `index.html` navigation page.
    pub index: IndexConfig,
    /// Progress bar display.
    pub progress: ProgressConfig,
}

impl BuildConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.workers == 0 {
            return Err(ConfigError::Validation(
                "generation.workers must be at least 1".into(),
            ));
        }
        if self.progress.width == 0 {
            return Err(ConfigError::Validation(
                "progress.width must be at least 1".into(),
            ));
        }
        if self.index.lang.trim().is_empty() {
            return Err(ConfigError::Validation(
                "index.lang must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Override the worker count from the command line.
    pub fn with_workers(mut self, workers: Option<usize>) -> Result<Self, ConfigError> {
        if let Some(workers) = workers {
            self.generation.workers = workers;
            self.validate()?;
        }
        Ok(self)
    }
}

/// Generation concurrency settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Maximum number of documents rendered and written at the same time.
    /// Writing is I/O bound, so this is not capped at the core count.
    pub workers: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { workers: 64 }
    }
}

/// Output directory settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Remove `*.html` left over from a previous run before generating.
    pub clean: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { clean: true }
    }
}

/// Index page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub title: String,
    pub lang: String,
    /// Omit the `.html` extension from links.
    pub pretty_urls: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            title: "Dictionary".to_string(),
            lang: "zh".to_string(),
            pretty_urls: true,
        }
    }
}

/// Progress bar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressConfig {
    pub enabled: bool,
    /// Bar width in cells.
    pub width: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 50,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(BuildConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BuildConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`, falling back to defaults if absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(path = %path.display(), ?config, "resolved config");
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# cedict-pages Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Generation
# ---------------------------------------------------------------------------
[generation]
# Maximum number of entry documents rendered and written at the same time.
# Overridden by --workers on the command line.
workers = 64

# ---------------------------------------------------------------------------
# Output directory
# ---------------------------------------------------------------------------
[output]
# Delete *.html files left over from a previous run before generating.
clean = true

# ---------------------------------------------------------------------------
# Index page
# ---------------------------------------------------------------------------
[index]
# <title> of index.html.
title = "Dictionary"

# <html lang="..."> of index.html.
lang = "zh"

# Link to "你好" instead of "你好.html". Static hosts such as GitHub Pages
# resolve extensionless links; plain file servers may not.
pretty_urls = true

# ---------------------------------------------------------------------------
# Progress bar
# ---------------------------------------------------------------------------
[progress]
# Draw a progress bar while generating.
enabled = true

# Bar width in cells.
width = 50
"##
}
