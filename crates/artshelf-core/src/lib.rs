// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Shared logic for all frontends
//
// This crate provides:
// - CatalogItem, AppSettings and AppError types
// - KeyValueStore with file and in-memory backends
// - FavoritesStore and CommentsStore on top of it
// - Text/brand/rating filters, search debounce and bulk selection
// - Per-screen state and the Session that wires it all together
//
// Frontend-specific code lives in separate crates.

pub mod catalog;
pub mod comments;
pub mod debounce;
pub mod favorites;
pub mod screens;
pub mod search;
pub mod selection;
pub mod session;
pub mod settings;
pub mod storage;
pub mod types;

// Re-export commonly used items
pub use catalog::{CatalogClient, CatalogSource};
pub use comments::CommentsStore;
pub use debounce::{DebounceState, DebounceTimer, DebouncedQuery};
pub use favorites::{AddOutcome, FavoritesStore};
pub use screens::{DetailScreen, FavoritesScreen, HomeScreen, Notice, RemovalRequest};
pub use search::{brands, filter_by_brand, filter_by_rating, filter_by_text};
pub use selection::SelectionSet;
pub use session::Session;
pub use settings::SettingsStore;
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use types::{AppError, AppSettings, CatalogItem, Comment, RatingFilter};
