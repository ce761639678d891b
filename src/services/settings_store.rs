//! Settings persistence across restarts

use std::{
    fs, io,
    path::{Path, PathBuf},
};
use anyhow::Context;
use tracing::{debug, info, warn};

use crate::state::{Settings, SettingsUpdate, TimerEvent, TimerObserver};

/// JSON file holding the last saved settings
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load previously saved settings.
    ///
    /// The result is a loose update so the controller applies its usual
    /// coercion; a missing or unreadable file yields `None`.
    pub fn load(&self) -> Option<SettingsUpdate> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No saved settings at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read settings from {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<SettingsUpdate>(&data) {
            Ok(update) => {
                info!("Loaded saved settings from {}", self.path.display());
                Some(update)
            }
            Err(e) => {
                warn!("Ignoring corrupt settings file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

impl TimerObserver for SettingsStore {
    fn notify(&mut self, event: &TimerEvent) -> Result<(), String> {
        match event {
            TimerEvent::SettingsChanged { settings } => self.save(settings).map_err(|e| format!("{:#}", e)),
            _ => Ok(()),
        }
    }
}
