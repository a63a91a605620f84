// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Local favorites storage
//
// Each favorite is its own record in the key-value store, so two screens
// touching different items never overwrite each other. The older layout
// kept the whole list in a single "favorites" blob; it is migrated on load.

use crate::storage::KeyValueStore;
use crate::types::{AppError, CatalogItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Key of the pre-record layout: a JSON array of catalog items
pub const LEGACY_FAVORITES_KEY: &str = "favorites";

/// Prefix of per-favorite record keys
pub const FAVORITE_RECORD_PREFIX: &str = "favorite-";

/// Store key for a favorite record
pub fn record_key(item_id: &str) -> String {
    format!("{}{}", FAVORITE_RECORD_PREFIX, item_id)
}

/// Persisted form of one favorite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub item: CatalogItem,
    pub added_at: DateTime<Utc>,
    /// Insertion order; ties are broken by item id
    pub seq: u64,
}

/// Result of [`FavoritesStore::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    pub already_present: bool,
}

/// Reads, mutates and persists the favorites collection
///
/// Holds a point-in-time copy of what is stored. Screens call [`load`]
/// whenever they regain focus, since another screen may have changed the
/// store in between.
///
/// [`load`]: FavoritesStore::load
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    records: Vec<FavoriteRecord>,
}

impl FavoritesStore {
    /// Create a handle with an empty snapshot. Call [`FavoritesStore::load`] before use.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            records: Vec::new(),
        }
    }

    /// Re-read every favorite from the store
    ///
    /// Never fails: unreadable or malformed data counts as "no favorites".
    pub async fn load(&mut self) -> Vec<CatalogItem> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();

        match self.store.keys_with_prefix(FAVORITE_RECORD_PREFIX).await {
            Ok(keys) => {
                for key in keys {
                    match self.read_record(&key).await {
                        Some(record) if seen.insert(record.item.id.clone()) => records.push(record),
                        _ => {}
                    }
                }

                let next_seq = records.iter().map(|r| r.seq + 1).max().unwrap_or(0);
                for record in self.migrate_legacy(&seen, next_seq).await {
                    if seen.insert(record.item.id.clone()) {
                        records.push(record);
                    }
                }
            }
            // Migration needs the key list to avoid clobbering records
            Err(e) => tracing::warn!("Failed to list favorites, treating as empty: {}", e),
        }

        records.sort_by(|a, b| {
            a.seq
                .cmp(&b.seq)
                .then_with(|| a.added_at.cmp(&b.added_at))
                .then_with(|| a.item.id.cmp(&b.item.id))
        });
        tracing::debug!("Loaded {} favorites", records.len());
        self.records = records;
        self.items()
    }

    async fn read_record(&self, key: &str) -> Option<FavoriteRecord> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<FavoriteRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed favorite {}: {}", key, e);
                None
            }
        }
    }

    /// Next free sequence number, looking at the store as well as the
    /// snapshot so another handle's additions are not reused
    async fn next_seq(&self) -> u64 {
        let mut next = self.records.iter().map(|r| r.seq + 1).max().unwrap_or(0);
        match self.store.keys_with_prefix(FAVORITE_RECORD_PREFIX).await {
            Ok(keys) => {
                for key in keys {
                    if let Some(record) = self.read_record(&key).await {
                        next = next.max(record.seq + 1);
                    }
                }
            }
            Err(e) => tracing::warn!("Failed to list favorites for ordering: {}", e),
        }
        next
    }

    /// Move entries of the legacy blob into records numbered from `first_seq`
    ///
    /// Returns the records that were written. Entries whose write failed
    /// stay in the blob for the next load; the blob is removed once it is
    /// empty. A malformed blob is left untouched.
    async fn migrate_legacy(&self, existing: &HashSet<String>, first_seq: u64) -> Vec<FavoriteRecord> {
        let raw = match self.store.get(LEGACY_FAVORITES_KEY).await {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read legacy favorites: {}", e);
                return Vec::new();
            }
        };

        let items: Vec<CatalogItem> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Ignoring malformed legacy favorites: {}", e);
                return Vec::new();
            }
        };

        tracing::info!("Migrating {} legacy favorites", items.len());
        let now = Utc::now();
        let mut migrated: Vec<FavoriteRecord> = Vec::new();
        let mut remaining: Vec<CatalogItem> = Vec::new();
        let mut seq = first_seq;
        for item in items {
            let duplicate = migrated.iter().any(|r| r.item.id == item.id)
                || remaining.iter().any(|i| i.id == item.id);
            if existing.contains(&item.id) || duplicate {
                continue;
            }
            let record = FavoriteRecord {
                item,
                added_at: now,
                seq,
            };
            seq += 1;
            match self.write_record(&record).await {
                Ok(()) => migrated.push(record),
                Err(e) => {
                    tracing::error!("Failed to migrate favorite {}: {}", record.item.id, e);
                    remaining.push(record.item);
                }
            }
        }

        let result = if remaining.is_empty() {
            self.store.remove(LEGACY_FAVORITES_KEY).await
        } else {
            match serde_json::to_string(&remaining) {
                Ok(content) => self.store.set(LEGACY_FAVORITES_KEY, &content).await,
                Err(e) => Err(e.into()),
            }
        };
        if let Err(e) = result {
            tracing::warn!("Failed to update legacy favorites blob: {}", e);
        }

        migrated
    }

    async fn write_record(&self, record: &FavoriteRecord) -> Result<(), AppError> {
        let content = serde_json::to_string(record)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize favorite: {}", e)))?;
        self.store.set(&record_key(&record.item.id), &content).await
    }

    /// Current snapshot, in insertion order
    pub fn items(&self) -> Vec<CatalogItem> {
        self.records.iter().map(|r| r.item.clone()).collect()
    }

    /// Whether an item with this identifier is in the snapshot
    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.item.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append an item unless one with the same identifier is already there
    ///
    /// On a failed write the snapshot is left as it was and the error is
    /// returned.
    pub async fn add(&mut self, item: CatalogItem) -> Result<AddOutcome, AppError> {
        if self.contains(&item.id) {
            return Ok(AddOutcome {
                already_present: true,
            });
        }

        // Another screen may have added it since our last load.
        if let Some(record) = self.read_record(&record_key(&item.id)).await {
            self.records.push(record);
            return Ok(AddOutcome {
                already_present: true,
            });
        }

        let seq = self.next_seq().await;
        let record = FavoriteRecord {
            item,
            added_at: Utc::now(),
            seq,
        };

        if let Err(e) = self.write_record(&record).await {
            tracing::error!("Failed to save favorite {}: {}", record.item.id, e);
            return Err(e);
        }

        tracing::info!("Added favorite {}", record.item.id);
        self.records.push(record);
        Ok(AddOutcome {
            already_present: false,
        })
    }

    /// Remove every favorite whose identifier is in `ids`
    ///
    /// Returns the new count. An empty `ids` is rejected without touching
    /// the store. If a removal fails, records removed earlier in the same
    /// call are written back and the snapshot is left unchanged.
    pub async fn remove_many(&mut self, ids: &HashSet<String>) -> Result<usize, AppError> {
        if ids.is_empty() {
            return Err(AppError::Validation("No favorites selected".to_string()));
        }

        let doomed: Vec<FavoriteRecord> = self
            .records
            .iter()
            .filter(|r| ids.contains(&r.item.id))
            .cloned()
            .collect();

        for (done, record) in doomed.iter().enumerate() {
            if let Err(e) = self.store.remove(&record_key(&record.item.id)).await {
                tracing::error!("Failed to remove favorite {}: {}", record.item.id, e);
                for restored in &doomed[..done] {
                    if let Err(e) = self.write_record(restored).await {
                        tracing::error!("Failed to restore favorite {}: {}", restored.item.id, e);
                    }
                }
                return Err(e);
            }
        }

        self.records.retain(|r| !ids.contains(&r.item.id));
        tracing::info!("Removed {} favorites, {} left", doomed.len(), self.records.len());
        Ok(self.records.len())
    }
}
