//! Persisted user settings
//!
//! Two user-facing knobs survive restarts: which assistant platform the
//! summarize relay targets, and the prompt text that precedes the transcript.
//! Stored as a small JSON file in the per-user config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default platform identifier used when nothing has been saved yet
pub const DEFAULT_PLATFORM: &str = "chatgpt";

/// Default summarization prompt used when nothing has been saved yet
pub const DEFAULT_PROMPT: &str = "Summarize this video clearly and concisely.";

/// User-chosen target platform and prompt template.
///
/// The platform is stored as its string identifier; unknown or stale values
/// are resolved to the baseline platform at lookup time rather than rejected
/// here, so an old settings file never blocks the relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_platform")]
    pub selected_platform: String,

    #[serde(default = "default_prompt")]
    pub custom_prompt: String,
}

fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selected_platform: default_platform(),
            custom_prompt: default_prompt(),
        }
    }
}

impl Settings {
    /// Location of the settings file under the platform config directory
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("No user config directory available")?;
        Ok(base.join("tubescribe").join("settings.json"))
    }

    /// Load settings from the default location.
    ///
    /// A missing file yields the defaults; a corrupt file is an error so the
    /// user's saved values are never silently clobbered.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    /// Persist settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    /// Persist settings to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write settings file {}", path.display()))
    }
}
