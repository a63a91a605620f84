// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Favorites screen state
//
// Debounced search over the favorites list, per-item checkboxes and a
// confirmed bulk removal.

use super::Notice;
use crate::debounce::DebouncedQuery;
use crate::favorites::FavoritesStore;
use crate::search;
use crate::selection::SelectionSet;
use crate::types::CatalogItem;
use std::time::Duration;

/// Answer to "Remove Selected"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalRequest {
    /// Ask the user to confirm removing `count` items
    Confirm { count: usize },
    /// Nothing selected
    Rejected(Notice),
}

pub struct FavoritesScreen {
    favorites: FavoritesStore,
    items: Vec<CatalogItem>,
    query: DebouncedQuery,
    raw_query: String,
    selection: SelectionSet,
    awaiting_confirmation: bool,
    loading: bool,
}

impl FavoritesScreen {
    /// Must be called inside a tokio runtime (the search debounce runs on it)
    pub fn new(favorites: FavoritesStore, debounce: Duration) -> Self {
        Self {
            favorites,
            items: Vec::new(),
            query: DebouncedQuery::spawn(debounce),
            raw_query: String::new(),
            selection: SelectionSet::new(),
            awaiting_confirmation: false,
            loading: true,
        }
    }

    /// Screen regained focus: re-read favorites and drop stale selections
    pub async fn on_focus(&mut self) {
        self.loading = true;
        self.items = self.favorites.load().await;
        self.loading = false;
        self.selection
            .retain_present(self.items.iter().map(|item| item.id.as_str()));
    }

    /// Navigated away
    pub fn on_blur(&mut self) {
        self.selection.clear();
        self.awaiting_confirmation = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Full text of the search box after a keystroke
    pub fn type_query(&mut self, text: &str) {
        self.raw_query = text.to_string();
        self.query.input(text);
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    /// True while the search box has input that is not yet applied
    pub fn is_searching(&self) -> bool {
        self.query.is_pending()
    }

    /// Receiver that wakes whenever a search query settles
    pub fn search_updates(&self) -> tokio::sync::watch::Receiver<String> {
        self.query.subscribe()
    }

    /// Items to render, or `None` while loading or a search is settling
    pub fn visible_items(&self) -> Option<Vec<&CatalogItem>> {
        if self.loading || self.is_searching() {
            return None;
        }
        let query = self.query.current();
        Some(search::filter_by_text(&self.items, Some(query.as_str())))
    }

    fn visible_ids(&self) -> Vec<String> {
        self.visible_items()
            .unwrap_or_default()
            .into_iter()
            .map(|item| item.id.clone())
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn favorites_count(&self) -> usize {
        self.items.len()
    }

    /// Checkbox tapped
    pub fn toggle(&mut self, id: &str) {
        if self.items.iter().any(|item| item.id == id) {
            self.selection.toggle(id);
        }
    }

    /// "Select all" / "Deselect all" over what is currently listed
    pub fn toggle_all(&mut self) {
        let visible = self.visible_ids();
        self.selection.toggle_all(visible.iter().map(String::as_str));
    }

    pub fn all_selected(&self) -> bool {
        let visible = self.visible_ids();
        self.selection.all_selected(visible.iter().map(String::as_str))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// "Remove Selected" pressed
    pub fn request_removal(&mut self) -> RemovalRequest {
        if self.selection.is_empty() {
            self.awaiting_confirmation = false;
            return RemovalRequest::Rejected(Notice::ChooseItemsFirst);
        }
        self.awaiting_confirmation = true;
        RemovalRequest::Confirm {
            count: self.selection.len(),
        }
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    pub fn cancel_removal(&mut self) {
        self.awaiting_confirmation = false;
    }

    /// User acknowledged the confirmation dialog
    pub async fn confirm_removal(&mut self) -> Notice {
        if !self.awaiting_confirmation || self.selection.is_empty() {
            self.awaiting_confirmation = false;
            return Notice::ChooseItemsFirst;
        }
        self.awaiting_confirmation = false;

        match self.favorites.remove_many(self.selection.ids()).await {
            Ok(_) => {
                self.items = self.favorites.items();
                self.selection.clear();
                Notice::RemovedSelected
            }
            Err(e) => {
                tracing::error!("Error removing favorites: {}", e);
                Notice::SaveFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};
    use std::collections::HashSet;
    use std::sync::Arc;

    const WINDOW: Duration = Duration::from_millis(300);

    async fn seeded(kv: Arc<dyn KeyValueStore>, names: &[(&str, &str)]) -> FavoritesScreen {
        let mut store = FavoritesStore::new(kv.clone());
        store.load().await;
        for (id, name) in names {
            store.add(CatalogItem::new(*id, *name, "Arteza", 5.0)).await.unwrap();
        }

        let mut screen = FavoritesScreen::new(FavoritesStore::new(kv), WINDOW);
        screen.on_focus().await;
        screen
    }

    fn ids(screen: &FavoritesScreen) -> Vec<String> {
        screen
            .visible_items()
            .unwrap()
            .iter()
            .map(|item| item.id.clone())
            .collect()
    }

    fn abc() -> Vec<(&'static str, &'static str)> {
        vec![("A", "Acrylic Paint"), ("B", "Brush Set"), ("C", "Canvas Pad")]
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_selected_scenario() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut screen = seeded(kv.clone(), &abc()).await;

        screen.toggle("B");
        assert_eq!(screen.request_removal(), RemovalRequest::Confirm { count: 1 });
        assert_eq!(screen.confirm_removal().await, Notice::RemovedSelected);

        assert_eq!(ids(&screen), vec!["A", "C"]);
        assert!(screen.selection().is_empty());

        let mut reloaded = FavoritesStore::new(kv);
        assert_eq!(reloaded.load().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_selection_is_rejected() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let mut screen = seeded(kv.clone(), &abc()).await;
        let writes = kv.write_count();

        assert_eq!(
            screen.request_removal(),
            RemovalRequest::Rejected(Notice::ChooseItemsFirst)
        );
        assert_eq!(screen.confirm_removal().await, Notice::ChooseItemsFirst);
        assert_eq!(kv.write_count(), writes);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_everything() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut screen = seeded(kv, &abc()).await;

        screen.toggle("A");
        screen.request_removal();
        screen.cancel_removal();
        // Confirming after a cancel needs a fresh request
        assert_eq!(screen.confirm_removal().await, Notice::ChooseItemsFirst);
        assert_eq!(screen.favorites_count(), 3);
        assert!(screen.is_selected("A"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_removal_keeps_selection() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let mut screen = seeded(kv.clone(), &abc()).await;

        screen.toggle("C");
        screen.request_removal();
        kv.set_fail_writes(true);
        assert_eq!(screen.confirm_removal().await, Notice::SaveFailed);
        assert_eq!(screen.favorites_count(), 3);
        assert!(screen.is_selected("C"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_hides_results_until_settled() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut screen = seeded(kv, &abc()).await;
        assert_eq!(ids(&screen).len(), 3);

        screen.type_query("b");
        tokio::time::sleep(Duration::from_millis(100)).await;
        screen.type_query("BR");
        assert!(screen.is_searching());
        assert!(screen.visible_items().is_none());

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert!(!screen.is_searching());
        assert_eq!(ids(&screen), vec!["B"]);
        assert_eq!(screen.raw_query(), "BR");
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_all_over_search_results() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut screen = seeded(kv, &abc()).await;

        screen.type_query("a");
        tokio::time::sleep(Duration::from_millis(301)).await;
        // "Acrylic Paint", "Canvas Pad"; "Brush Set" has no 'a'
        screen.toggle_all();
        assert!(screen.all_selected());
        assert!(screen.is_selected("A"));
        assert!(!screen.is_selected("B"));
        assert!(screen.is_selected("C"));

        screen.toggle_all();
        assert!(screen.selection().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_drops_stale_selection() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut screen = seeded(kv.clone(), &abc()).await;
        screen.toggle("A");
        screen.toggle("B");

        let mut elsewhere = FavoritesStore::new(kv);
        elsewhere.load().await;
        elsewhere
            .remove_many(&HashSet::from(["A".to_string()]))
            .await
            .unwrap();

        screen.on_focus().await;
        assert!(!screen.is_selected("A"));
        assert!(screen.is_selected("B"));
        assert_eq!(ids(&screen), vec!["B", "C"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blur_clears_selection() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut screen = seeded(kv, &abc()).await;
        screen.toggle("A");
        screen.request_removal();
        screen.on_blur();
        assert!(screen.selection().is_empty());
        assert!(!screen.is_awaiting_confirmation());
    }
}
