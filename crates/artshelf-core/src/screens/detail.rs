// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Detail screen state

use super::Notice;
use crate::comments::CommentsStore;
use crate::search;
use crate::types::{AppError, CatalogItem, Comment, RatingFilter};

/// One catalog item with its comments
pub struct DetailScreen {
    item: CatalogItem,
    comments: CommentsStore,
    rating_filter: RatingFilter,
}

impl DetailScreen {
    pub fn new(item: CatalogItem, comments: CommentsStore) -> Self {
        Self {
            item,
            comments,
            rating_filter: RatingFilter::All,
        }
    }

    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    pub async fn load(&mut self) {
        self.comments.load().await;
    }

    /// "$12.00"
    pub fn price_label(&self) -> String {
        format!("${:.2}", self.item.price)
    }

    /// Pre-deal price, only when a deal applies
    pub fn original_price_label(&self) -> Option<String> {
        self.item
            .has_deal()
            .then(|| format!("${:.2}", self.item.original_price()))
    }

    /// "25% Off!", only when a deal applies
    pub fn deal_label(&self) -> Option<String> {
        self.item
            .has_deal()
            .then(|| format!("{}% Off!", self.item.discount_percent()))
    }

    pub fn set_rating_filter(&mut self, filter: RatingFilter) {
        self.rating_filter = filter;
    }

    pub fn rating_filter(&self) -> RatingFilter {
        self.rating_filter
    }

    pub fn visible_comments(&self) -> Vec<&Comment> {
        search::filter_by_rating(self.comments.comments(), self.rating_filter)
    }

    pub fn average_rating(&self) -> Option<f64> {
        self.comments.average_rating()
    }

    /// Submit the comment dialog
    pub async fn submit_comment(&mut self, text: &str, rating: u8) -> Notice {
        match self.comments.add(text, rating).await {
            Ok(_) => Notice::CommentSaved,
            Err(AppError::Validation(_)) => Notice::CommentIncomplete,
            Err(_) => Notice::SaveFailed,
        }
    }
}
