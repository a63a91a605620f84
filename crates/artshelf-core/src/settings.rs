// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Settings persistence
//
// Settings are stored in a local JSON file. Favorites and comments live
// in the key-value store instead.

use crate::types::{AppError, AppSettings};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// In-memory cache of settings, persisted to disk on changes
pub struct SettingsStore {
    settings: RwLock<AppSettings>,
    file_path: PathBuf,
}

impl SettingsStore {
    /// Open the settings file in the platform config directory
    pub fn new() -> Result<Self, AppError> {
        Self::with_path(Self::get_settings_path()?)
    }

    /// Open a settings file at an explicit location
    pub fn with_path(file_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let file_path = file_path.into();
        tracing::info!("Settings file path: {:?}", file_path);

        let settings = if file_path.exists() {
            tracing::info!("Loading settings from disk");
            let content = fs::read_to_string(&file_path)
                .map_err(|e| AppError::FileIo(format!("Failed to read settings: {}", e)))?;

            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse settings, using defaults: {}", e);
                AppSettings::default()
            })
        } else {
            tracing::info!("No settings file found, using defaults");
            AppSettings::default()
        };

        let store = Self {
            settings: RwLock::new(settings),
            file_path,
        };

        if !store.file_path.exists() {
            tracing::info!("Creating initial settings file");
            store.persist()?;
        }

        Ok(store)
    }

    /// Get the path to the settings file
    fn get_settings_path() -> Result<PathBuf, AppError> {
        let config_dir = directories::ProjectDirs::from("com", "artshelf", "Artshelf")
            .ok_or_else(|| AppError::FileIo("Could not determine config directory".to_string()))?
            .config_dir()
            .to_path_buf();

        Ok(config_dir.join("settings.json"))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Persist settings to disk
    fn persist(&self) -> Result<(), AppError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::FileIo(format!("Failed to create config dir: {}", e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&self.get())
            .map_err(|e| AppError::Serialization(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.file_path, content)
            .map_err(|e| AppError::FileIo(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> AppSettings {
        self.settings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Update settings and persist to disk
    ///
    /// The previous settings are restored if the write fails.
    pub fn update(&self, new_settings: AppSettings) -> Result<(), AppError> {
        if new_settings.search_debounce_ms == 0 {
            return Err(AppError::InvalidConfig(
                "Search debounce must be at least 1ms".to_string(),
            ));
        }

        let previous = {
            let mut settings = self
                .settings
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::replace(&mut *settings, new_settings)
        };

        let result = self.persist();
        match &result {
            Ok(()) => tracing::info!("Settings persisted successfully"),
            Err(e) => {
                tracing::error!("Failed to persist settings: {}", e);
                *self
                    .settings
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = previous;
            }
        }
        result
    }
}
