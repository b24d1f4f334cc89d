//! Configuration system for claridian.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults**: [`schema::ClaridianConfig::default()`]
//! 2. **User global config**: `~/.claridian/config.toml`
//! 3. **Project local config**: `.claridian.toml` in the current directory
//! 4. **Environment variables**: `CLARIDIAN_*` overrides (highest precedence)
//!
//! Layers are merged key by key: a file that only sets `scoring.timeout_ms`
//! leaves every other value from the previous layer in place.
//!
//! # Usage
//!
//! ```rust,ignore
//! use claridian::config;
//!
//! let cfg = config::load();
//! let client = ScoringClient::from_config(&cfg.scoring);
//! ```

pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::ClaridianConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. Unreadable or malformed files are skipped.
pub fn load() -> ClaridianConfig {
    let layers = [global_config_path(), project_config_path()];
    let mut config = load_layers(layers.iter().flatten().map(PathBuf::as_path));
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files over the defaults, in order.
fn load_layers<'a>(paths: impl Iterator<Item = &'a Path>) -> ClaridianConfig {
    let Ok(mut merged) = toml::Value::try_from(ClaridianConfig::default()) else {
        return ClaridianConfig::default();
    };

    for path in paths {
        if let Some(layer) = load_toml_value(path) {
            merge_values(&mut merged, layer);
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as a raw value tree, `None` if missing or malformed.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Deep-merge `overlay` into `base`: tables merge recursively, any other
/// value replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.claridian/`: config, log and nothing else.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claridian"))
}

/// Path to the user global config: `~/.claridian/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

/// Path to the project local config: `.claridian.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".claridian.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `CLARIDIAN_SCORING_URL`: scoring endpoint
/// - `CLARIDIAN_SCORING_TIMEOUT_MS`: request timeout (`0` = none)
/// - `CLARIDIAN_WEB_ADDR`: dashboard bind address
/// - `CLARIDIAN_LOGGING`: outcome log on/off (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut ClaridianConfig) {
    if let Ok(val) = std::env::var("CLARIDIAN_SCORING_URL")
        && !val.is_empty()
    {
        config.scoring.endpoint = val;
    }
    if let Ok(val) = std::env::var("CLARIDIAN_SCORING_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.scoring.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("CLARIDIAN_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("CLARIDIAN_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
pub(crate) fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.claridian/config.toml`.
///
/// Creates the directory if it doesn't exist. Returns an error if the file
/// already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.claridian/ directory")?;
    }

    fs::write(&path, ClaridianConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key in the global config file.
///
/// Supports dotted keys like `scoring.endpoint`. The key must exist in the
/// schema; the new value is parsed to the type of the current one.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(ClaridianConfig::default())
            .context("failed to serialize default config")?
    };

    // Make sure keys absent from a hand-trimmed file can still be set.
    let mut with_defaults = toml::Value::try_from(ClaridianConfig::default())
        .context("failed to serialize default config")?;
    merge_values(&mut with_defaults, root);
    root = with_defaults;

    set_toml_value(&mut root, key, value)?;

    // Reject values that no longer fit the schema (e.g. a string for a bool).
    let _: ClaridianConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': '{value}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("invalid config key '{key}'");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("'{key}' is a section, not a value"),
        None => anyhow::bail!("unknown config key '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
