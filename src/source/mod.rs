//! News source abstraction layer.
//!
//! This module defines the [`NewsSource`] trait, the provider wire types
//! ([`ProviderArticle`], [`ProviderResponse`]), the [`Category`] selector and
//! the error type every source reports.  The concrete HTTP implementation
//! lives in [`newsdata`].
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `guardian.rs`).
//! 2. Define a struct holding its configuration and implement [`NewsSource`].
//! 3. Convert the provider's records into [`ProviderArticle`] values (or add a
//!    second transform in [`crate::article`] if the shape differs too much).
//! 4. Construct it in `main.rs` in place of [`NewsDataSource`].
//!
//! Fallback handling, stale-response filtering and rendering are all
//! source-agnostic.

mod category;
mod newsdata;
mod provider_article;

pub use category::Category;
pub use newsdata::NewsDataSource;
pub use provider_article::{ProviderArticle, ProviderResponse};

use std::future::Future;

use thiserror::Error;

/// Everything that can go wrong while fetching one page of articles.
///
/// None of these escape the [`FeedLoader`](crate::loader::FeedLoader); they
/// are logged and replaced by the fallback list.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure (DNS, connection, TLS, timeout).
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Response with a non-2xx status code.
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Body was not JSON or did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Payload parsed but its `status` field was not `"success"`.
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Trait that every news source must implement.
///
/// [`fetch`](NewsSource::fetch) runs on the tokio runtime owned by `main`, so
/// implementations must be [`Send`] + [`Sync`] and return a `Send` future.
pub trait NewsSource: Send + Sync {
    /// Human-readable label used in log lines.
    fn name(&self) -> &str;

    /// Fetch one page of raw provider records for `category`.
    ///
    /// An empty page is `Ok(vec![])`, not an error; deciding what to show
    /// instead is the loader's job.
    fn fetch(
        &self,
        category: Category,
    ) -> impl Future<Output = Result<Vec<ProviderArticle>, FeedError>> + Send;
}
