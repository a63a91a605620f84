// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Client-side filtering
//
// The catalog endpoint takes no query parameters, so every filter runs over
// lists that were already fetched.

use crate::types::{CatalogItem, Comment, RatingFilter};

/// Case-insensitive substring match on the display name
///
/// `None` or an empty query passes every item through in order. Items
/// without a name only match the empty query.
pub fn filter_by_text<'a>(items: &'a [CatalogItem], query: Option<&str>) -> Vec<&'a CatalogItem> {
    let needle = match query {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return items.iter().collect(),
    };

    items
        .iter()
        .filter(|item| {
            item.name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Exact brand match; `None` or "" means "All brands"
pub fn filter_by_brand<'a>(items: &'a [CatalogItem], brand: Option<&str>) -> Vec<&'a CatalogItem> {
    match brand {
        Some(b) if !b.is_empty() => items.iter().filter(|item| item.brand == b).collect(),
        _ => items.iter().collect(),
    }
}

/// Distinct brands in the order they first appear
pub fn brands(items: &[CatalogItem]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.iter().any(|b| b == &item.brand) {
            seen.push(item.brand.clone());
        }
    }
    seen
}

/// Comments matching a star filter
pub fn filter_by_rating(comments: &[Comment], filter: RatingFilter) -> Vec<&Comment> {
    comments.iter().filter(|c| filter.matches(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("1", "Red Brush", "Arteza", 12.0),
            CatalogItem::new("2", "Blue Canvas", "Winsor", 30.0),
            CatalogItem::new("3", "Brush Cleaner", "Arteza", 8.5),
        ]
    }

    fn ids(items: &[&CatalogItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_passes_everything() {
        let items = catalog();
        assert_eq!(ids(&filter_by_text(&items, Some(""))), vec!["1", "2", "3"]);
        assert_eq!(ids(&filter_by_text(&items, None)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_text_filter_ignores_case() {
        let items = vec![CatalogItem::new("1", "Red Brush", "Arteza", 12.0)];
        assert_eq!(ids(&filter_by_text(&items, Some("red"))), vec!["1"]);
        assert_eq!(ids(&filter_by_text(&items, Some("RUSH"))), vec!["1"]);
        assert!(filter_by_text(&items, Some("green")).is_empty());
    }

    #[test]
    fn test_text_filter_skips_nameless_items() {
        let mut items = catalog();
        items[1].name = None;
        assert_eq!(ids(&filter_by_text(&items, Some("b"))), vec!["1", "3"]);
        assert_eq!(filter_by_text(&items, Some("")).len(), 3);
    }

    #[test]
    fn test_brand_filter() {
        let items = catalog();
        assert_eq!(ids(&filter_by_brand(&items, Some("Arteza"))), vec!["1", "3"]);
        assert_eq!(filter_by_brand(&items, Some("")).len(), 3);
        assert_eq!(filter_by_brand(&items, None).len(), 3);
        assert!(filter_by_brand(&items, Some("arteza")).is_empty());
    }

    #[test]
    fn test_brands_first_seen_order() {
        assert_eq!(brands(&catalog()), vec!["Arteza", "Winsor"]);
        assert!(brands(&[]).is_empty());
    }

    #[test]
    fn test_rating_filter_over_comments() {
        let comments = vec![
            Comment { text: "great".into(), rating: 5 },
            Comment { text: "meh".into(), rating: 2 },
            Comment { text: "love it".into(), rating: 5 },
        ];
        assert_eq!(filter_by_rating(&comments, RatingFilter::All).len(), 3);
        let fives = filter_by_rating(&comments, RatingFilter::Stars(5));
        assert_eq!(fives.len(), 2);
        assert!(fives.iter().all(|c| c.rating == 5));
        assert!(filter_by_rating(&comments, RatingFilter::Stars(1)).is_empty());
    }
}
