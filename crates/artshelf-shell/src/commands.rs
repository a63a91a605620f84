// SPDX-License-Identifier: AGPL-3.0
// Artshelf Shell - Command parsing
//
// One line of input becomes one command. The screens decide whether a
// command makes sense where the user currently is.

use artshelf_core::RatingFilter;

/// Commands the UI can send to the session task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    ShowHome,
    ShowFavorites,
    ShowDetail { id: String },
    RefreshCatalog,
    FilterBrand { brand: Option<String> },
    AddFavorite { id: String },
    Search { text: String },
    ToggleSelection { id: String },
    ToggleAll,
    RequestRemoval,
    ConfirmRemoval,
    CancelRemoval,
    AddComment { rating: u8, text: String },
    FilterRating { filter: RatingFilter },
    Quit,
}

pub const HELP: &str = "\
Screens:   home | favorites | detail <id>
Home:      refresh | brand [name] | fav <id>
Favorites: search [text] | select <id> | select all | remove | yes | no
Detail:    comment <1-5> <text> | stars <1-5|all>
Other:     help | quit";

/// Parse one input line
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "home" => ShellCommand::ShowHome,
        "favorites" | "favs" => ShellCommand::ShowFavorites,
        "detail" => ShellCommand::ShowDetail {
            id: required(rest, "detail <id>")?,
        },
        "refresh" => ShellCommand::RefreshCatalog,
        "brand" => ShellCommand::FilterBrand {
            brand: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "fav" => ShellCommand::AddFavorite {
            id: required(rest, "fav <id>")?,
        },
        // The search box keeps whatever was typed, spaces included
        "search" => ShellCommand::Search {
            text: line[word.len()..].trim_start().to_string(),
        },
        "select" if rest.eq_ignore_ascii_case("all") => ShellCommand::ToggleAll,
        "select" => ShellCommand::ToggleSelection {
            id: required(rest, "select <id>")?,
        },
        "remove" => ShellCommand::RequestRemoval,
        "yes" | "y" | "ok" => ShellCommand::ConfirmRemoval,
        "no" | "n" | "cancel" => ShellCommand::CancelRemoval,
        "comment" => parse_comment(rest)?,
        "stars" => ShellCommand::FilterRating {
            filter: parse_rating_filter(rest)?,
        },
        "quit" | "exit" | "q" => ShellCommand::Quit,
        "" => return Err("Type 'help' for commands".to_string()),
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(command)
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_comment(rest: &str) -> Result<ShellCommand, String> {
    let usage = || "Usage: comment <1-5> <text>".to_string();
    let (rating, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let rating: u8 = rating.parse().map_err(|_| usage())?;
    // Range and empty-text checks belong to the detail screen
    Ok(ShellCommand::AddComment {
        rating,
        text: text.to_string(),
    })
}

fn parse_rating_filter(rest: &str) -> Result<RatingFilter, String> {
    if rest.is_empty() || rest.eq_ignore_ascii_case("all") {
        return Ok(RatingFilter::All);
    }
    let stars: u8 = rest
        .parse()
        .map_err(|_| "Usage: stars <1-5|all>".to_string())?;
    RatingFilter::stars(stars).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation() {
        assert_eq!(parse_line("home"), Ok(ShellCommand::ShowHome));
        assert_eq!(parse_line("  FAVORITES "), Ok(ShellCommand::ShowFavorites));
        assert_eq!(
            parse_line("detail 12"),
            Ok(ShellCommand::ShowDetail { id: "12".into() })
        );
        assert!(parse_line("detail").is_err());
    }

    #[test]
    fn test_brand_filter() {
        assert_eq!(
            parse_line("brand Winsor & Newton"),
            Ok(ShellCommand::FilterBrand {
                brand: Some("Winsor & Newton".into())
            })
        );
        assert_eq!(parse_line("brand"), Ok(ShellCommand::FilterBrand { brand: None }));
    }

    #[test]
    fn test_search_keeps_text() {
        assert_eq!(
            parse_line("search red brush"),
            Ok(ShellCommand::Search { text: "red brush".into() })
        );
        assert_eq!(parse_line("search"), Ok(ShellCommand::Search { text: String::new() }));
    }

    #[test]
    fn test_selection() {
        assert_eq!(parse_line("select all"), Ok(ShellCommand::ToggleAll));
        assert_eq!(
            parse_line("select B"),
            Ok(ShellCommand::ToggleSelection { id: "B".into() })
        );
        assert_eq!(parse_line("remove"), Ok(ShellCommand::RequestRemoval));
        assert_eq!(parse_line("y"), Ok(ShellCommand::ConfirmRemoval));
        assert_eq!(parse_line("no"), Ok(ShellCommand::CancelRemoval));
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            parse_line("comment 4 Nice and sturdy"),
            Ok(ShellCommand::AddComment {
                rating: 4,
                text: "Nice and sturdy".into()
            })
        );
        assert_eq!(
            parse_line("comment 0"),
            Ok(ShellCommand::AddComment {
                rating: 0,
                text: String::new()
            })
        );
        assert!(parse_line("comment great").is_err());
    }

    #[test]
    fn test_stars() {
        assert_eq!(
            parse_line("stars 5"),
            Ok(ShellCommand::FilterRating {
                filter: RatingFilter::Stars(5)
            })
        );
        assert_eq!(
            parse_line("stars all"),
            Ok(ShellCommand::FilterRating {
                filter: RatingFilter::All
            })
        );
        assert!(parse_line("stars 9").is_err());
    }

    #[test]
    fn test_unknown() {
        assert!(parse_line("dance").is_err());
        assert!(parse_line("").is_err());
    }
}
