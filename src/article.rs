//! The display-ready article model and the provider → display transform.
//!
//! `DisplayArticle` is what every other part of the application works with.
//! The transform in [`DisplayArticle::from_provider`] is pure and total:
//! every optional provider field has a defined default, so the title,
//! excerpt, author, date and read-time of a display article are never empty.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::source::ProviderArticle;

/// Reading speed used for read-time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

pub const UNTITLED: &str = "Untitled";
pub const DEFAULT_AUTHOR: &str = "Staff Reporter";
pub const DEFAULT_CATEGORY: &str = "general";
pub const UNKNOWN_DATE: &str = "Date unavailable";
pub const BODY_PLACEHOLDER: &str =
    "The full text of this story is not available. Follow the source link to read it in full.";

/// A normalised, immutable article ready for rendering.
///
/// Built once per fetch and never mutated; the app replaces the whole list
/// when a new page arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayArticle {
    /// Provider identifier, also the bookmark key.
    pub id: String,
    pub title: String,
    /// Short teaser: the description, else the title.
    pub excerpt: String,
    pub author: String,
    /// Long-form date such as `January 5, 2024`.
    pub date: String,
    /// Such as `3 min read`.
    pub read_time: String,
    /// Primary category tag.
    pub category: String,
    pub image_url: Option<String>,
    /// Text shown in the reader.
    pub body: String,
    /// Canonical link to the original story.
    pub link: String,
}

impl DisplayArticle {
    /// Normalise a provider record.
    pub fn from_provider(article: &ProviderArticle) -> Self {
        let title = non_blank(&article.title)
            .unwrap_or(UNTITLED)
            .to_string();

        let description = article.description.as_deref().and_then(non_blank);
        let content = article.content.as_deref().and_then(non_blank);

        let excerpt = description.unwrap_or(&title).to_string();

        let author = article
            .creator
            .as_deref()
            .and_then(|names| names.iter().find_map(|n| non_blank(n)))
            .or_else(|| non_blank(&article.source_id))
            .unwrap_or(DEFAULT_AUTHOR)
            .to_string();

        let category = article
            .category
            .iter()
            .find_map(|c| non_blank(c))
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        let body = content
            .or(description)
            .unwrap_or(BODY_PLACEHOLDER)
            .to_string();

        Self {
            id: article.article_id.clone(),
            title,
            excerpt,
            author,
            date: format_publish_date(&article.pub_date),
            read_time: estimate_read_time(content.or(description).unwrap_or("")),
            category,
            image_url: article
                .image_url
                .as_deref()
                .and_then(non_blank)
                .map(String::from),
            body,
            link: article.link.clone(),
        }
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Estimate reading time as `ceil(words / 200)` minutes, never less than one.
pub fn estimate_read_time(text: &str) -> String {
    let words = text.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

/// Format a provider timestamp as a long-form US-English date.
///
/// Unparseable input is returned unchanged; blank input becomes
/// [`UNKNOWN_DATE`].
pub fn format_publish_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UNKNOWN_DATE.to_string();
    }

    match parse_publish_date(trimmed) {
        Some(date) => format_long_date(date),
        None => {
            tracing::debug!(raw, "Unrecognised publish date, showing it verbatim");
            raw.to_string()
        }
    }
}

/// `January 5, 2024`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn parse_publish_date(s: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| DateTime::parse_from_rfc2822(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn transforms_complete_record() {
        let provider = ProviderArticle {
            article_id: "abc".into(),
            title: "  Rail strike ends ".into(),
            description: Some("Trains run again.".into()),
            content: Some(words(450)),
            pub_date: "2024-01-05 09:30:00".into(),
            source_id: "wire".into(),
            creator: Some(vec!["".into(), "Grace Hopper".into()]),
            category: vec!["business".into(), "top".into()],
            image_url: Some("https://example.com/i.png".into()),
            link: "https://example.com/rail".into(),
        };

        let article = DisplayArticle::from_provider(&provider);
        assert_eq!(
            article,
            DisplayArticle {
                id: "abc".into(),
                title: "Rail strike ends".into(),
                excerpt: "Trains run again.".into(),
                author: "Grace Hopper".into(),
                date: "January 5, 2024".into(),
                read_time: "3 min read".into(),
                category: "business".into(),
                image_url: Some("https://example.com/i.png".into()),
                body: words(450),
                link: "https://example.com/rail".into(),
            }
        );
    }

    #[test]
    fn empty_record_gets_defaults() {
        let article = DisplayArticle::from_provider(&ProviderArticle::default());

        assert_eq!(article.title, UNTITLED);
        assert_eq!(article.excerpt, UNTITLED);
        assert_eq!(article.author, DEFAULT_AUTHOR);
        assert_eq!(article.date, UNKNOWN_DATE);
        assert_eq!(article.read_time, "1 min read");
        assert_eq!(article.category, DEFAULT_CATEGORY);
        assert_eq!(article.body, BODY_PLACEHOLDER);
        assert!(article.image_url.is_none());
    }

    #[test]
    fn author_falls_back_to_source_id() {
        let provider = ProviderArticle {
            source_id: "gazette".into(),
            creator: None,
            ..Default::default()
        };
        assert_eq!(DisplayArticle::from_provider(&provider).author, "gazette");
    }

    #[test]
    fn body_falls_back_to_description() {
        let provider = ProviderArticle {
            description: Some("Short teaser".into()),
            ..Default::default()
        };
        let article = DisplayArticle::from_provider(&provider);
        assert_eq!(article.body, "Short teaser");
        assert_eq!(article.excerpt, "Short teaser");
    }

    #[test]
    fn excerpt_falls_back_to_title() {
        let provider = ProviderArticle {
            title: "Headline only".into(),
            description: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(DisplayArticle::from_provider(&provider).excerpt, "Headline only");
    }

    #[test]
    fn read_time_rounds_up() {
        assert_eq!(estimate_read_time(&words(400)), "2 min read");
        assert_eq!(estimate_read_time(&words(401)), "3 min read");
        assert_eq!(estimate_read_time(&words(1)), "1 min read");
        assert_eq!(estimate_read_time(""), "1 min read");
    }

    #[test]
    fn formats_provider_timestamp() {
        assert_eq!(format_publish_date("2024-03-15 23:59:59"), "March 15, 2024");
    }

    #[test]
    fn formats_rfc3339_and_rfc2822() {
        assert_eq!(format_publish_date("2023-12-01T10:00:00Z"), "December 1, 2023");
        assert_eq!(
            format_publish_date("Mon, 01 Jan 2024 00:00:00 +0000"),
            "January 1, 2024"
        );
        assert_eq!(format_publish_date("2022-07-04"), "July 4, 2022");
    }

    #[test]
    fn unparseable_date_is_returned_verbatim() {
        assert_eq!(format_publish_date("yesterday-ish"), "yesterday-ish");
    }

    proptest! {
        #[test]
        fn required_display_fields_are_never_empty(
            title in ".{0,20}",
            description in proptest::option::of(".{0,40}"),
            content in proptest::option::of(".{0,80}"),
            pub_date in ".{0,20}",
            source_id in ".{0,10}",
            creator in proptest::option::of(proptest::collection::vec(".{0,10}", 0..3)),
            category in proptest::collection::vec(".{0,10}", 0..3),
        ) {
            let provider = ProviderArticle {
                article_id: "p".into(),
                title,
                description,
                content,
                pub_date,
                source_id,
                creator,
                category,
                image_url: None,
                link: String::new(),
            };
            let article = DisplayArticle::from_provider(&provider);

            prop_assert!(!article.title.trim().is_empty());
            prop_assert!(!article.excerpt.trim().is_empty());
            prop_assert!(!article.author.trim().is_empty());
            prop_assert!(!article.date.trim().is_empty());
            prop_assert!(article.read_time.ends_with(" min read"));
            prop_assert!(!article.body.trim().is_empty());
        }
    }
}
