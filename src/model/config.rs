use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::unit::Unit;

const DEFAULTS: &str = include_str!("../../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub movement: MovementConfig,
    pub layout: LayoutConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovementConfig {
    pub horizontal_unit: Unit,
    pub bulk_counts: [usize; 2],
    pub granular_subwords: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    pub column_width: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_toml("").expect("built-in default config is valid")
    }
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        match Self::user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::from_toml(""),
        }
    }

    /// Load defaults overlaid with the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let user_str = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&user_str).with_context(|| format!("in config {}", path.display()))
    }

    /// Defaults overlaid with `overrides`; keys missing from `overrides` keep
    /// their default value.
    pub fn from_toml(overrides: &str) -> Result<Self> {
        let mut merged: toml::Value = toml::from_str(DEFAULTS)?;
        let user: toml::Value = toml::from_str(overrides)?;
        merge(&mut merged, user);

        let config: AppConfig = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "granular-move")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        let unit = self.movement.horizontal_unit;
        if unit.is_vertical() || unit.is_line_boundary() {
            bail!("movement.horizontal_unit cannot be `{unit}`");
        }
        if self.movement.bulk_counts.contains(&0) {
            bail!("movement.bulk_counts must be positive");
        }
        let width = self.layout.column_width;
        if !width.is_finite() || width < 0.0 {
            bail!("layout.column_width must be a finite, non-negative number");
        }
        Ok(())
    }
}

fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
