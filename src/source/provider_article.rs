//! Wire types for the news provider's JSON payload.
//!
//! These mirror the provider's field names exactly and are read-only to the
//! rest of the application: the [`crate::article`] module turns them into
//! display-ready [`DisplayArticle`](crate::article::DisplayArticle)s.
//!
//! Every field carries a serde default, and the non-optional ones also read
//! an explicit `null` as empty, so an odd record (a `null` title, a missing
//! category list) still deserializes.

use serde::Deserialize;

/// A single article exactly as the provider sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderArticle {
    #[serde(deserialize_with = "null_as_default")]
    pub article_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub description: Option<String>,
    /// Full body text, when the provider plan includes it.
    pub content: Option<String>,
    /// Publication timestamp, usually `YYYY-MM-DD HH:MM:SS` in UTC.
    #[serde(rename = "pubDate", deserialize_with = "null_as_default")]
    pub pub_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_id: String,
    pub creator: Option<Vec<String>>,
    #[serde(deserialize_with = "null_as_default")]
    pub category: Vec<String>,
    pub image_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
}

/// The response envelope.
///
/// `results` is kept as raw JSON because on error the provider replaces the
/// article array with an `{ "message": ..., "code": ... }` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub results: serde_json::Value,
}

impl ProviderResponse {
    /// Best-effort error message from an error-flagged payload.
    pub fn error_message(&self) -> String {
        self.results
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| format!("provider reported status '{}'", self.status))
    }
}

/// `null` reads as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
