//! HTTP source for the newsdata.io "latest news" API.
//!
//! Every request asks for one fixed-size page of English-language articles,
//! optionally filtered to a single category.  The response envelope is
//! validated here; turning records into display articles (and deciding what
//! to show when there are none) happens further up in [`crate::loader`].

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{Category, FeedError, NewsSource, ProviderArticle, ProviderResponse};

/// Articles requested per page.  There is no pagination beyond this.
pub const PAGE_SIZE: u32 = 10;

/// Response language.
pub const LANGUAGE: &str = "en";

/// The newsdata.io source.
pub struct NewsDataSource {
    client: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
    label: String,
}

impl NewsDataSource {
    /// Create a new source.
    ///
    /// # Arguments
    ///
    /// * `endpoint`: full URL of the news endpoint, without query string
    ///   (e.g. `https://newsdata.io/api/1/news`).
    /// * `api_key`: the provider credential, sent as the `apikey` parameter.
    /// * `timeout`: upper bound for one whole request.
    pub fn new(endpoint: Url, api_key: SecretString, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("retro-news/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let label = endpoint.host_str().unwrap_or("newsdata").to_string();

        Ok(Self {
            client,
            endpoint,
            api_key,
            label,
        })
    }

    /// Build the request URL for `category`.
    ///
    /// [`Category::All`] omits the `category` parameter entirely.
    pub fn request_url(&self, category: Category) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("apikey", self.api_key.expose_secret());
            query.append_pair("language", LANGUAGE);
            query.append_pair("size", &PAGE_SIZE.to_string());
            if let Some(tag) = category.provider_tag() {
                query.append_pair("category", tag);
            }
        }
        url
    }

    /// Validate a response body and extract its article records.
    ///
    /// This is a pure function (no I/O) so the envelope rules can be tested
    /// without a server.
    pub fn parse_response(body: &[u8]) -> Result<Vec<ProviderArticle>, FeedError> {
        let envelope: ProviderResponse = serde_json::from_slice(body)?;

        if envelope.status != "success" {
            return Err(FeedError::Provider(envelope.error_message()));
        }

        tracing::trace!(total_results = ?envelope.total_results, "Provider page received");

        if envelope.results.is_null() {
            return Ok(Vec::new());
        }

        // Records are decoded one at a time so a malformed one is dropped
        // instead of taking the rest of the page with it.
        let records: Vec<serde_json::Value> = serde_json::from_value(envelope.results)?;
        let articles: Vec<ProviderArticle> = records
            .into_iter()
            .enumerate()
            .filter_map(|(position, record)| {
                match serde_json::from_value::<ProviderArticle>(record) {
                    Ok(article) => Some(article),
                    Err(e) => {
                        tracing::warn!(position, error = %e, "Skipping malformed provider record");
                        None
                    }
                }
            })
            .collect();

        Ok(articles)
    }
}

impl NewsSource for NewsDataSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch(&self, category: Category) -> Result<Vec<ProviderArticle>, FeedError> {
        // reqwest errors embed the request URL, which carries the API key.
        let response = self
            .client
            .get(self.request_url(category))
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(reqwest::Error::without_url)?;
        let articles = Self::parse_response(&body)?;

        tracing::debug!(
            source = %self.label,
            %category,
            count = articles.len(),
            "Fetched provider page"
        );

        Ok(articles)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
