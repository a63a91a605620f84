// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Screen state
//
// Frontend-agnostic state behind each screen. Frontends render these and
// forward user events; failures come back as notices, never as errors.

mod detail;
mod favorites;
mod home;

pub use detail::DetailScreen;
pub use favorites::{FavoritesScreen, RemovalRequest};
pub use home::HomeScreen;

use std::fmt;

/// Short user-visible feedback, shown as a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AddedToFavorites,
    AlreadyInFavorites,
    RemovedSelected,
    ChooseItemsFirst,
    CommentSaved,
    CommentIncomplete,
    UnknownItem,
    SaveFailed,
    CatalogUnavailable,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::AddedToFavorites => "Added to favorite list",
            Self::AlreadyInFavorites => "Already in favorite list",
            Self::RemovedSelected => "Removed selected art tools",
            Self::ChooseItemsFirst => "Please choose the art tools to remove",
            Self::CommentSaved => "Comment saved",
            Self::CommentIncomplete => "Please enter both comment and rating",
            Self::UnknownItem => "No such art tool",
            Self::SaveFailed => "Could not save, please try again",
            Self::CatalogUnavailable => "Catalog unavailable, please try again",
        }
    }

    /// Whether the notice reports a failure rather than a success
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::ChooseItemsFirst
                | Self::CommentIncomplete
                | Self::UnknownItem
                | Self::SaveFailed
                | Self::CatalogUnavailable
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
