// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Home screen state
//
// Catalog listing with a brand picker and a heart per item.

use super::Notice;
use crate::catalog::CatalogSource;
use crate::favorites::FavoritesStore;
use crate::search;
use crate::types::CatalogItem;
use std::sync::Arc;

pub struct HomeScreen {
    catalog: Arc<dyn CatalogSource>,
    favorites: FavoritesStore,
    items: Vec<CatalogItem>,
    selected_brand: Option<String>,
    loading: bool,
}

impl HomeScreen {
    pub fn new(catalog: Arc<dyn CatalogSource>, favorites: FavoritesStore) -> Self {
        Self {
            catalog,
            favorites,
            items: Vec::new(),
            selected_brand: None,
            loading: false,
        }
    }

    /// Fetch the whole catalog
    ///
    /// On failure the previous listing stays and a notice is returned.
    pub async fn refresh_catalog(&mut self) -> Option<Notice> {
        self.loading = true;
        let result = self.catalog.fetch_all().await;
        self.loading = false;

        match result {
            Ok(items) => {
                self.items = items;
                None
            }
            Err(e) => {
                tracing::error!("Error fetching catalog: {}", e);
                Some(Notice::CatalogUnavailable)
            }
        }
    }

    /// Screen regained focus: favorites may have changed elsewhere
    pub async fn on_focus(&mut self) {
        self.favorites.load().await;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Restrict the listing to one brand; `None` shows all brands
    pub fn select_brand(&mut self, brand: Option<String>) {
        self.selected_brand = brand.filter(|b| !b.is_empty());
    }

    pub fn selected_brand(&self) -> Option<&str> {
        self.selected_brand.as_deref()
    }

    /// Choices for the brand picker
    pub fn brands(&self) -> Vec<String> {
        search::brands(&self.items)
    }

    pub fn visible_items(&self) -> Vec<&CatalogItem> {
        search::filter_by_brand(&self.items, self.selected_brand.as_deref())
    }

    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Heart tapped on a catalog item
    pub async fn add_favorite(&mut self, id: &str) -> Notice {
        let Some(item) = self.item(id).cloned() else {
            return Notice::UnknownItem;
        };

        match self.favorites.add(item).await {
            Ok(outcome) if outcome.already_present => Notice::AlreadyInFavorites,
            Ok(_) => Notice::AddedToFavorites,
            Err(_) => Notice::SaveFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};
    use crate::types::AppError;
    use async_trait::async_trait;

    struct FixedCatalog(Vec<CatalogItem>);

    #[async_trait]
    impl CatalogSource for FixedCatalog {
        async fn fetch_all(&self) -> Result<Vec<CatalogItem>, AppError> {
            Ok(self.0.clone())
        }
    }

    struct OfflineCatalog;

    #[async_trait]
    impl CatalogSource for OfflineCatalog {
        async fn fetch_all(&self) -> Result<Vec<CatalogItem>, AppError> {
            Err(AppError::Network("offline".to_string()))
        }
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("1", "Easel", "Meeden", 89.0),
            CatalogItem::new("2", "Gouache Set", "Arteza", 25.0),
            CatalogItem::new("3", "Palette", "Meeden", 9.0),
        ]
    }

    async fn screen(kv: Arc<dyn KeyValueStore>) -> HomeScreen {
        let mut home = HomeScreen::new(
            Arc::new(FixedCatalog(catalog())),
            FavoritesStore::new(kv),
        );
        assert_eq!(home.refresh_catalog().await, None);
        home.on_focus().await;
        home
    }

    #[tokio::test]
    async fn test_brand_picker() {
        let mut home = screen(Arc::new(MemoryKeyValueStore::new())).await;
        assert_eq!(home.brands(), vec!["Meeden", "Arteza"]);
        assert_eq!(home.visible_items().len(), 3);

        home.select_brand(Some("Meeden".to_string()));
        let ids: Vec<_> = home.visible_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        home.select_brand(Some(String::new()));
        assert_eq!(home.selected_brand(), None);
        assert_eq!(home.visible_items().len(), 3);
    }

    #[tokio::test]
    async fn test_add_favorite_twice() {
        let mut home = screen(Arc::new(MemoryKeyValueStore::new())).await;
        assert!(!home.is_favorite("2"));
        assert_eq!(home.add_favorite("2").await, Notice::AddedToFavorites);
        assert!(home.is_favorite("2"));
        assert_eq!(home.add_favorite("2").await, Notice::AlreadyInFavorites);
        assert_eq!(home.add_favorite("nope").await, Notice::UnknownItem);
    }

    #[tokio::test]
    async fn test_focus_picks_up_changes_from_other_screens() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut home = screen(kv.clone()).await;

        let mut elsewhere = FavoritesStore::new(kv);
        elsewhere.load().await;
        elsewhere.add(catalog()[0].clone()).await.unwrap();

        assert!(!home.is_favorite("1"));
        home.on_focus().await;
        assert!(home.is_favorite("1"));
    }

    #[tokio::test]
    async fn test_save_failure_notice() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let mut home = screen(kv.clone()).await;
        kv.set_fail_writes(true);
        assert_eq!(home.add_favorite("1").await, Notice::SaveFailed);
        assert!(!home.is_favorite("1"));
    }

    #[tokio::test]
    async fn test_catalog_failure_keeps_listing_empty() {
        let mut home = HomeScreen::new(
            Arc::new(OfflineCatalog),
            FavoritesStore::new(Arc::new(MemoryKeyValueStore::new())),
        );
        assert_eq!(home.refresh_catalog().await, Some(Notice::CatalogUnavailable));
        assert!(!home.is_loading());
        assert!(home.visible_items().is_empty());
    }
}
