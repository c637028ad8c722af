//! Laboratory configuration stored in `laboratory.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::io::json::JsonStyle;
use crate::locale::Locale;

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "laboratory.toml";

/// Laboratory configuration (TOML).
///
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LaboratoryConfig {
    /// Application folder holding translations and stored data.
    pub data_dir: PathBuf,

    /// Locale used when a command is not given one (e.g. `en`, `fr_CA`).
    pub default_locale: String,

    /// Write stored JSON pretty-printed.
    pub pretty_json: bool,

    /// Move the previous file to `backups/` before overwriting it.
    pub backups: bool,
}

impl Default for LaboratoryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            default_locale: "en".to_string(),
            pretty_json: true,
            backups: false,
        }
    }
}

impl LaboratoryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(anyhow!("data_dir must not be empty"));
        }
        if Locale::parse(&self.default_locale).is_none() {
            return Err(anyhow!(
                "default_locale is not a locale: '{}'",
                self.default_locale
            ));
        }
        Ok(())
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.data_dir.join("translations")
    }

    pub fn region_dir(&self) -> PathBuf {
        self.data_dir.join("region")
    }

    /// The configured default locale; falls back to English if invalid.
    pub fn locale(&self) -> Locale {
        Locale::parse(&self.default_locale).unwrap_or_else(Locale::english)
    }

    pub fn json_style(&self) -> JsonStyle {
        if self.pretty_json {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LaboratoryConfig::default()`.
pub fn load_config(path: &Path) -> Result<LaboratoryConfig> {
    if !path.exists() {
        let cfg = LaboratoryConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LaboratoryConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &LaboratoryConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
