//! Application settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use port_info::ScannerConfig;
use serde::{Deserialize, Serialize};

/// Output format for `list`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned columns
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Scanner configuration
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
    /// Probe busy/valid state when listing
    #[serde(default)]
    pub probe_on_list: bool,
    /// Delay between scans in `watch`, in milliseconds
    #[serde(default = "default_watch_interval")]
    pub watch_interval_ms: u64,
}

fn default_watch_interval() -> u64 {
    2000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            format: OutputFormat::default(),
            probe_on_list: false,
            watch_interval_ms: default_watch_interval(),
        }
    }
}

impl Settings {
    /// Get the XDG config directory for portscan
    /// Uses $XDG_CONFIG_HOME/portscan on Linux/macOS, falls back to ~/.config/portscan
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("portscan"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("portscan"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default path, falling back to defaults
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`; a missing or malformed file gives defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed settings file {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the default path
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = Self::settings_path().context("Could not determine settings path")?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }
}
