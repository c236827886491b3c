//! Pipeline configuration module.
//!
//! Handles loading, validating, and merging `vivero.toml`. Stock defaults are
//! overridden by the user file at the project root; every key is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! domain = "https://plantasyflores.online"  # Absolute links to this host become relative
//! language = "es"                          # Locale used for month names and labels
//!
//! [paths]
//! content_dir = "public/data"              # pages.json, posts.json, posts/<category>.json
//! calendar_dir = "public/data/calendar"    # global-config.json, <category>/index.json, ...
//! state_file = ".vivero-state.json"        # Favorites and preferences
//!
//! [calendar]
//! default_hemisphere = "northern"          # northern | southern
//!
//! [processing]
//! max_processes = 4                        # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Relative paths are resolved against the project root passed on the command
//! line. Unknown keys are rejected to catch typos early.

use crate::calendar::Hemisphere;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILENAME: &str = "vivero.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `vivero.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Public site identity.
    pub site: SiteConfig,
    /// Data locations.
    pub paths: PathsConfig,
    /// Calendar defaults.
    pub calendar: CalendarConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let domain = self.site.domain.to_ascii_lowercase();
        if !(domain.starts_with("http://") || domain.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "site.domain must start with http:// or https://".into(),
            ));
        }
        if self.site.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.language must not be empty".into(),
            ));
        }
        if self.calendar.default_hemisphere.parse::<Hemisphere>().is_err() {
            return Err(ConfigError::Validation(format!(
                "calendar.default_hemisphere must be northern or southern, got '{}'",
                self.calendar.default_hemisphere
            )));
        }
        Ok(())
    }

    /// The configured default hemisphere. Falls back to northern if the
    /// config was constructed without validation.
    pub fn default_hemisphere(&self) -> Hemisphere {
        self.calendar
            .default_hemisphere
            .parse()
            .unwrap_or(Hemisphere::Northern)
    }
}

/// Public site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute origin of the published site, without trailing slash.
    pub domain: String,
    /// Locale key for month names and labels.
    pub language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: "https://plantasyflores.online".to_string(),
            language: "es".to_string(),
        }
    }
}

impl SiteConfig {
    /// Domain with any trailing slash removed.
    pub fn origin(&self) -> &str {
        self.domain.trim_end_matches('/')
    }
}

/// Data locations, relative to the project root unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub content_dir: PathBuf,
    pub calendar_dir: PathBuf,
    pub state_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("public/data"),
            calendar_dir: PathBuf::from("public/data/calendar"),
            state_file: PathBuf::from(".vivero-state.json"),
        }
    }
}

impl PathsConfig {
    /// Resolve all paths against `root`, leaving absolute paths untouched.
    pub fn resolved(&self, root: &Path) -> PathsConfig {
        PathsConfig {
            content_dir: root.join(&self.content_dir),
            calendar_dir: root.join(&self.calendar_dir),
            state_file: root.join(&self.state_file),
        }
    }
}

/// Calendar defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    /// Hemisphere used when the user has no stored preference.
    pub default_hemisphere: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            default_hemisphere: "northern".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel resolution workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, never below one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PipelineConfig::default()).expect("default config must serialize")
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

/// Load `vivero.toml` from `root` as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `vivero.toml` in `root`, on top of stock defaults.
pub fn load_config(root: &Path) -> Result<PipelineConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Load config from an explicit file path (the `--config` flag).
pub fn load_config_file(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `vivero.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Vivero Configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Published origin. Links to this host are rewritten to relative paths.
domain = "https://plantasyflores.online"

# Locale used for month names and calendar labels.
language = "es"

# ---------------------------------------------------------------------------
# Paths (relative to the project root)
# ---------------------------------------------------------------------------
[paths]
# Split content: pages.json, posts.json, posts/<category>.json, collections.json
content_dir = "public/data"

# Calendar tiers: global-config.json, <category>/index.json, <category>/<plant>.json
calendar_dir = "public/data/calendar"

# Favorites and preferences.
state_file = ".vivero-state.json"

# ---------------------------------------------------------------------------
# Calendar
# ---------------------------------------------------------------------------
[calendar]
# Hemisphere used when no preference is stored: northern | southern
default_hemisphere = "northern"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers when resolving the whole site.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
