// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Highest star rating a comment can carry
pub const MAX_RATING: u8 = 5;

/// A catalog entry as served by the catalog endpoint
///
/// Treated as an opaque value once fetched; identity is the `id` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    /// Display name. Some catalog rows ship without one.
    #[serde(rename = "artName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Grouping key used by the brand picker
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub price: f64,
    /// Image URI
    #[serde(default)]
    pub image: String,
    /// Discount fraction in 0.0..=1.0
    #[serde(default)]
    pub limited_time_deal: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glass_surface: Option<bool>,
}

impl CatalogItem {
    /// Minimal item, mostly useful for tests and fixtures
    pub fn new(id: impl Into<String>, name: impl Into<String>, brand: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            brand: brand.into(),
            price,
            image: String::new(),
            limited_time_deal: 0.0,
            description: None,
            glass_surface: None,
        }
    }

    /// Name to show, empty when the catalog omitted it
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Whether a limited-time deal applies
    pub fn has_deal(&self) -> bool {
        self.limited_time_deal > 0.0
    }

    /// Price before the deal, shown struck through on the detail screen
    pub fn original_price(&self) -> f64 {
        self.price + self.price * self.limited_time_deal
    }

    /// Deal as a whole percentage ("25% OFF")
    pub fn discount_percent(&self) -> u32 {
        (self.limited_time_deal.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// A user comment on a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub rating: u8,
}

/// Star filter for the comment list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingFilter {
    #[default]
    All,
    Stars(u8),
}

impl RatingFilter {
    /// Build a filter for an exact star count (1..=5)
    pub fn stars(rating: u8) -> Result<Self, AppError> {
        if (1..=MAX_RATING).contains(&rating) {
            Ok(Self::Stars(rating))
        } else {
            Err(AppError::Validation(format!(
                "Rating filter must be between 1 and {}, got {}",
                MAX_RATING, rating
            )))
        }
    }

    /// Check if a comment passes this filter
    pub fn matches(&self, comment: &Comment) -> bool {
        match self {
            Self::All => true,
            Self::Stars(n) => comment.rating == *n,
        }
    }
}

/// Application settings (frontend-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Catalog endpoint returning a JSON array of items
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    /// Quiescence window for the favorites search box
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Timeout for catalog requests
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Override for the local store directory. None means the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_catalog_url() -> String {
    "https://66e12e90c831c8811b53ff13.mockapi.io/api/v1/art".to_string()
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            search_debounce_ms: default_search_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: None,
        }
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}
