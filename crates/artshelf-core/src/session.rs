// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Session context
//
// Everything a screen needs, built once and passed in explicitly.

use crate::catalog::{CatalogClient, CatalogSource};
use crate::comments::CommentsStore;
use crate::favorites::FavoritesStore;
use crate::screens::{DetailScreen, FavoritesScreen, HomeScreen};
use crate::storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use crate::types::{AppError, AppSettings, CatalogItem};
use std::sync::Arc;
use std::time::Duration;

/// Shared collaborators for one running app
#[derive(Clone)]
pub struct Session {
    settings: AppSettings,
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<dyn CatalogSource>,
}

impl Session {
    pub fn new(
        settings: AppSettings,
        store: Arc<dyn KeyValueStore>,
        catalog: Arc<dyn CatalogSource>,
    ) -> Self {
        Self {
            settings,
            store,
            catalog,
        }
    }

    /// File-backed store (settings override or platform data dir) and the
    /// HTTP catalog
    pub fn from_settings(settings: AppSettings) -> Result<Self, AppError> {
        let store = match &settings.data_dir {
            Some(dir) => FileKeyValueStore::new(dir)?,
            None => FileKeyValueStore::open_default()?,
        };
        let catalog = CatalogClient::from_settings(&settings)?;
        Ok(Self::new(settings, Arc::new(store), Arc::new(catalog)))
    }

    /// Nothing survives the process; handy for demos
    pub fn in_memory(settings: AppSettings) -> Result<Self, AppError> {
        let catalog = CatalogClient::from_settings(&settings)?;
        Ok(Self::new(
            settings,
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(catalog),
        ))
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// Fresh favorites handle with an empty snapshot
    pub fn favorites(&self) -> FavoritesStore {
        FavoritesStore::new(self.store.clone())
    }

    pub fn home_screen(&self) -> HomeScreen {
        HomeScreen::new(self.catalog.clone(), self.favorites())
    }

    /// Must be called inside a tokio runtime
    pub fn favorites_screen(&self) -> FavoritesScreen {
        FavoritesScreen::new(
            self.favorites(),
            Duration::from_millis(self.settings.search_debounce_ms),
        )
    }

    pub fn detail_screen(&self, item: CatalogItem) -> DetailScreen {
        let comments = CommentsStore::new(self.store.clone(), item.id.clone());
        DetailScreen::new(item, comments)
    }
}
