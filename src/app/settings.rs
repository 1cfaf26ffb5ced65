use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::encoder::{EncodeOptions, MAX_MARGIN_MODULES, MAX_WIDTH};

const DEFAULT_DEBOUNCE_MS: u64 = 300;
const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct PanelSettings {
    /// Quiet period after the last keystroke before encoding starts.
    pub(crate) debounce_ms: u64,
    pub(crate) qr: EncodeOptions,
    pub(crate) download: DownloadSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DownloadSettings {
    /// Directory offered by the save dialog, or written to directly.
    pub(crate) directory: Option<PathBuf>,
    pub(crate) ask_for_location: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            qr: EncodeOptions::default(),
            download: DownloadSettings::default(),
        }
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            directory: None,
            ask_for_location: true,
        }
    }
}

impl PanelSettings {
    pub(crate) fn load_or_default() -> Self {
        let Some(path) = settings_file_path() else {
            debug!("no config directory available, using default settings");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(?err, "failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read settings file {}", path.display())
                });
            }
        };

        let mut settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;
        settings.normalize();
        Ok(settings)
    }

    pub(crate) fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Directory downloads start in: the configured one, else the user's
    /// download folder.
    pub(crate) fn download_directory(&self) -> Option<PathBuf> {
        self.download.directory.clone().or_else(dirs::download_dir)
    }

    fn normalize(&mut self) {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            self.debounce_ms = MAX_DEBOUNCE_MS;
        }
        if self.qr.width == 0 {
            self.qr.width = EncodeOptions::default().width;
        }
        self.qr.width = self.qr.width.min(MAX_WIDTH);
        self.qr.margin_modules = self.qr.margin_modules.min(MAX_MARGIN_MODULES);
        if self
            .download
            .directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.download.directory = None;
        }
    }
}

fn settings_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qr-panel").join("settings.json"))
}
