// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Per-item comments
//
// Comments for an item live under "comments-<itemId>" as one JSON array.
// Only the detail screen for that item writes it.

use crate::storage::KeyValueStore;
use crate::types::{AppError, Comment, MAX_RATING};
use std::sync::Arc;

/// Store key for an item's comment list
pub fn comments_key(item_id: &str) -> String {
    format!("comments-{}", item_id)
}

/// Comment list for a single catalog item
pub struct CommentsStore {
    store: Arc<dyn KeyValueStore>,
    item_id: String,
    comments: Vec<Comment>,
}

impl CommentsStore {
    pub fn new(store: Arc<dyn KeyValueStore>, item_id: impl Into<String>) -> Self {
        Self {
            store,
            item_id: item_id.into(),
            comments: Vec::new(),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Re-read the comment list. Absent or malformed data means no comments.
    pub async fn load(&mut self) -> &[Comment] {
        let key = comments_key(&self.item_id);
        self.comments = match self.store.get(&key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed comments for {}: {}", self.item_id, e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load comments for {}: {}", self.item_id, e);
                Vec::new()
            }
        };
        &self.comments
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Validate, append and persist a comment
    ///
    /// Text is trimmed and must be non-empty; rating must be 1..=5. Nothing
    /// is written when validation fails. On a failed write the list is left
    /// as it was.
    pub async fn add(&mut self, text: &str, rating: u8) -> Result<&Comment, AppError> {
        let text = text.trim();
        if text.is_empty() || rating == 0 {
            return Err(AppError::Validation(
                "Please enter both comment and rating".to_string(),
            ));
        }
        if rating > MAX_RATING {
            return Err(AppError::Validation(format!(
                "Rating must be at most {}",
                MAX_RATING
            )));
        }

        let mut updated = self.comments.clone();
        updated.push(Comment {
            text: text.to_string(),
            rating,
        });

        let content = serde_json::to_string(&updated)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize comments: {}", e)))?;
        if let Err(e) = self.store.set(&comments_key(&self.item_id), &content).await {
            tracing::error!("Error saving comment for {}: {}", self.item_id, e);
            return Err(e);
        }

        self.comments = updated;
        self.comments
            .last()
            .ok_or_else(|| AppError::NotFound("comment".to_string()))
    }

    /// Mean rating, if there are any comments
    pub fn average_rating(&self) -> Option<f64> {
        if self.comments.is_empty() {
            return None;
        }
        let sum: u32 = self.comments.iter().map(|c| u32::from(c.rating)).sum();
        Some(f64::from(sum) / self.comments.len() as f64)
    }
}
