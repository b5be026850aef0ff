//! Application configuration
//!
//! Stored in `~/.config/keybridge/config.yaml`:
//!
//! ```yaml
//! keymap_path: ~/dotfiles/keymap.json
//! extra_mapping_files:
//!   - ~/dotfiles/my-mappings.yaml
//! diff_style: structured
//! platform: linux
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::export::DiffStyle;
use crate::platform::Platform;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Universal keymap file; defaults to `keymap.json` in the config dir
    pub keymap_path: Option<PathBuf>,
    /// Mapping YAML appended to the bundled table
    pub extra_mapping_files: Vec<PathBuf>,
    pub diff_style: DiffStyle,
    /// Overrides the detected platform for shadowing checks
    pub platform: Option<Platform>,
}

impl AppConfig {
    /// Load config from disk, or return defaults if not found or invalid
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from `path`, failing on unreadable or malformed files
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        };
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Universal keymap location, configured or default
    pub fn keymap_file(&self) -> Option<PathBuf> {
        self.keymap_path
            .clone()
            .or_else(crate::config_paths::keymap_file)
    }

    /// Extra mapping files: configured ones, then the mappings dir
    pub fn mapping_files(&self) -> Vec<PathBuf> {
        let mut files = self.extra_mapping_files.clone();
        for file in crate::config_paths::mapping_files() {
            if !files.contains(&file) {
                files.push(file);
            }
        }
        files
    }

    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}
