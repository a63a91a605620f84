// SPDX-License-Identifier: AGPL-3.0
// Artshelf Shell - Plain-text views

use artshelf_core::{CatalogItem, DetailScreen, FavoritesScreen, HomeScreen, RatingFilter};
use std::fmt::Write;

fn price(item: &CatalogItem) -> String {
    format!("${:.2}", item.price)
}

pub fn home(screen: &HomeScreen) -> String {
    let mut out = String::new();
    if screen.is_loading() {
        return "Loading catalog...".to_string();
    }

    let brand = screen.selected_brand().unwrap_or("All brands");
    let _ = writeln!(out, "== Catalog ({}) ==", brand);

    let items = screen.visible_items();
    if items.is_empty() {
        let _ = writeln!(out, "No results found");
    }
    for item in items {
        let heart = if screen.is_favorite(&item.id) { "♥" } else { "♡" };
        let _ = write!(out, "{} [{}] {} | {} | {}", heart, item.id, item.display_name(), item.brand, price(item));
        if item.has_deal() {
            let _ = write!(out, " | {}% OFF", item.discount_percent());
        }
        out.push('\n');
    }

    let brands = screen.brands();
    if !brands.is_empty() {
        let _ = write!(out, "Brands: {}", brands.join(", "));
    }
    out.trim_end().to_string()
}

pub fn favorites(screen: &FavoritesScreen) -> String {
    if screen.is_loading() {
        return "Loading favorites...".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "== Favorites ({}) ==", screen.favorites_count());
    if !screen.raw_query().is_empty() {
        let _ = writeln!(out, "Search: {}", screen.raw_query());
    }

    match screen.visible_items() {
        None => {
            let _ = writeln!(out, "Searching...");
        }
        Some(items) if items.is_empty() => {
            let _ = writeln!(out, "No favorites found");
        }
        Some(items) => {
            for item in items {
                let mark = if screen.is_selected(&item.id) { "x" } else { " " };
                let _ = writeln!(out, "[{}] [{}] {} | {}", mark, item.id, item.display_name(), price(item));
            }
            let _ = writeln!(out, "{} selected", screen.selection().len());
        }
    }
    out.trim_end().to_string()
}

pub fn detail(screen: &DetailScreen) -> String {
    let item = screen.item();
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", item.display_name());
    let _ = writeln!(out, "Brand: {}", item.brand);
    if let Some(description) = &item.description {
        let _ = writeln!(out, "Description: {}", description);
    }

    let _ = write!(out, "{}", screen.price_label());
    if let Some(original) = screen.original_price_label() {
        let _ = write!(out, " (was {})", original);
    }
    out.push('\n');
    if let Some(deal) = screen.deal_label() {
        let _ = writeln!(out, "{} Limited Time Deal", deal);
    }

    let filter = match screen.rating_filter() {
        RatingFilter::All => "all".to_string(),
        RatingFilter::Stars(n) => format!("{} stars", n),
    };
    match screen.average_rating() {
        Some(avg) => {
            let _ = writeln!(out, "Comments ({}, average {:.1}):", filter, avg);
        }
        None => {
            let _ = writeln!(out, "Comments ({}):", filter);
        }
    }

    let comments = screen.visible_comments();
    if comments.is_empty() {
        let _ = writeln!(out, "No results found");
    }
    for comment in comments {
        let stars = "★".repeat(usize::from(comment.rating));
        let _ = writeln!(out, "{:<5} {}", stars, comment.text);
    }
    out.trim_end().to_string()
}
