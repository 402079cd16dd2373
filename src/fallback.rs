//! Placeholder articles shown whenever the live feed is unavailable.

use chrono::NaiveDate;

use crate::article::{estimate_read_time, format_long_date, DisplayArticle};

/// Every fallback article id starts with this, which is how the app tells
/// demo content from live content.
pub const FALLBACK_PREFIX: &str = "fallback-";

/// The fixed placeholder list: always exactly two entries, dated `today`.
pub fn fallback_articles(today: NaiveDate) -> Vec<DisplayArticle> {
    let date = format_long_date(today);

    vec![
        placeholder(
            1,
            "The Wire Is Down, But The Presses Keep Rolling",
            "Our news wire could not be reached. These demo stories keep the front page warm until it returns.",
            "The Night Editor",
            "top",
            &date,
            "The live news feed could not be reached, so the Gazette is running demo content. \
             Check your network connection and API key, then press r to try again. \
             Your bookmarks are stored locally and are unaffected.",
        ),
        placeholder(
            2,
            "How To Read The Retro Gazette",
            "A short guide to the front page: switch sections, flip the featured story, and save articles for later.",
            "The Gazette Desk",
            "general",
            &date,
            "Use Tab and Shift-Tab to switch sections. The featured panel rotates through the top three \
             stories on its own; press n to flip it yourself or 1, 2 and 3 to jump. Press Enter to open \
             a story in the reader, b to bookmark it, and o to open the original in your browser.",
        ),
    ]
}

/// Whether a list is the fallback set rather than live content.
pub fn is_fallback(articles: &[DisplayArticle]) -> bool {
    articles
        .first()
        .is_some_and(|a| a.id.starts_with(FALLBACK_PREFIX))
}

fn placeholder(
    n: u32,
    title: &str,
    excerpt: &str,
    author: &str,
    category: &str,
    date: &str,
    body: &str,
) -> DisplayArticle {
    DisplayArticle {
        id: format!("{FALLBACK_PREFIX}{n}"),
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        author: author.to_string(),
        date: date.to_string(),
        read_time: estimate_read_time(body),
        category: category.to_string(),
        image_url: None,
        body: body.to_string(),
        link: String::new(),
    }
}
