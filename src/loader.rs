//! Background feed loading.
//!
//! [`FeedLoader`] turns one category selection into a list of display
//! articles and never fails: any source error, and an empty page, resolve to
//! the fallback list so the UI always has something to render.
//!
//! [`FeedWorker`] runs the loader on the tokio runtime and sends results to
//! the UI thread over an [`mpsc`] channel.  Each request carries a sequence
//! number chosen by the app; starting a new request aborts the previous
//! in-flight one, and the app discards any [`LoadMsg`] whose sequence number
//! is not the latest it issued.  Between the two, only the most recently
//! initiated fetch can ever update the screen.

use std::sync::mpsc;
use std::sync::Arc;

use chrono::Local;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::article::DisplayArticle;
use crate::fallback::fallback_articles;
use crate::source::{Category, NewsSource};

/// A finished load, sent from the worker to the UI thread.
#[derive(Debug)]
pub struct LoadMsg {
    /// Sequence number of the request that produced this result.
    pub seq: u64,
    pub category: Category,
    /// Never empty.
    pub articles: Vec<DisplayArticle>,
}

/// Fetch → validate → transform, with fallback on every failure path.
pub struct FeedLoader<S> {
    source: S,
}

impl<S: NewsSource> FeedLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Load one page for `category`.  Always returns a non-empty list.
    pub async fn fetch_articles(&self, category: Category) -> Vec<DisplayArticle> {
        match self.source.fetch(category).await {
            Ok(records) if records.is_empty() => {
                tracing::info!(
                    source = self.source.name(),
                    %category,
                    "Provider returned no articles, showing fallback"
                );
                fallback_articles(Local::now().date_naive())
            }
            Ok(records) => {
                tracing::info!(
                    source = self.source.name(),
                    %category,
                    count = records.len(),
                    "Loaded articles"
                );
                records.iter().map(DisplayArticle::from_provider).collect()
            }
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    %category,
                    error = %e,
                    "Feed fetch failed, showing fallback"
                );
                fallback_articles(Local::now().date_naive())
            }
        }
    }
}

/// Runs loads on the tokio runtime, one at a time.
pub struct FeedWorker<S> {
    loader: Arc<FeedLoader<S>>,
    runtime: Handle,
    tx: mpsc::Sender<LoadMsg>,
    in_flight: Option<JoinHandle<()>>,
}

impl<S: NewsSource + 'static> FeedWorker<S> {
    /// Create the worker.
    ///
    /// Returns a receiver that the main loop should drain on every tick.
    pub fn new(loader: FeedLoader<S>, runtime: Handle) -> (Self, mpsc::Receiver<LoadMsg>) {
        let (tx, rx) = mpsc::channel();
        let worker = Self {
            loader: Arc::new(loader),
            runtime,
            tx,
            in_flight: None,
        };
        (worker, rx)
    }

    /// Start loading `category`, cancelling whatever was still in flight.
    pub fn request(&mut self, seq: u64, category: Category) {
        self.cancel();

        let loader = Arc::clone(&self.loader);
        let tx = self.tx.clone();

        tracing::debug!(seq, %category, "Starting feed load");
        self.in_flight = Some(self.runtime.spawn(async move {
            let articles = loader.fetch_articles(category).await;
            // If the receiver is gone the UI has exited; nothing to do.
            let _ = tx.send(LoadMsg {
                seq,
                category,
                articles,
            });
        }));
    }
}

impl<S> FeedWorker<S> {
    fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                tracing::debug!("Cancelling superseded feed load");
            }
            handle.abort();
        }
    }
}

impl<S> Drop for FeedWorker<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{is_fallback, FALLBACK_PREFIX};
    use crate::source::{FeedError, NewsDataSource, ProviderArticle};
    use secrecy::SecretString;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// A source with a canned outcome per call.
    enum Scripted {
        Records(Vec<ProviderArticle>),
        HttpStatus(u16),
        Provider(&'static str),
    }

    impl NewsSource for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch(&self, _category: Category) -> Result<Vec<ProviderArticle>, FeedError> {
            match self {
                Scripted::Records(records) => Ok(records.clone()),
                Scripted::HttpStatus(code) => Err(FeedError::HttpStatus(*code)),
                Scripted::Provider(msg) => Err(FeedError::Provider(msg.to_string())),
            }
        }
    }

    /// Answers `Business` slowly and everything else immediately.
    struct SlowBusiness;

    impl NewsSource for SlowBusiness {
        fn name(&self) -> &str {
            "slow-business"
        }

        async fn fetch(&self, category: Category) -> Result<Vec<ProviderArticle>, FeedError> {
            if category == Category::Business {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            Ok(vec![record(category.label())])
        }
    }

    fn record(id: &str) -> ProviderArticle {
        ProviderArticle {
            article_id: id.to_string(),
            title: format!("Story {id}"),
            ..Default::default()
        }
    }

    fn newsdata_at(server: &MockServer) -> NewsDataSource {
        NewsDataSource::new(
            Url::parse(&format!("{}/api/1/news", server.uri())).unwrap(),
            SecretString::from("k"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    async fn recv(rx: &mpsc::Receiver<LoadMsg>) -> LoadMsg {
        for _ in 0..200 {
            if let Ok(msg) = rx.try_recv() {
                return msg;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no LoadMsg received");
    }

    #[tokio::test]
    async fn transforms_live_records() {
        let loader = FeedLoader::new(Scripted::Records(vec![record("a"), record("b")]));
        let articles = loader.fetch_articles(Category::All).await;

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, "a");
        assert_eq!(articles[1].title, "Story b");
        assert!(!is_fallback(&articles));
    }

    #[tokio::test]
    async fn every_failure_resolves_to_fallback() {
        for source in [
            Scripted::Records(vec![]),
            Scripted::HttpStatus(500),
            Scripted::Provider("quota exceeded"),
        ] {
            let articles = FeedLoader::new(source).fetch_articles(Category::Top).await;
            assert_eq!(articles.len(), 2);
            assert!(articles.iter().all(|a| a.id.starts_with(FALLBACK_PREFIX)));
        }
    }

    #[tokio::test]
    async fn empty_success_payload_yields_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":"success","totalResults":0,"results":[]}"#),
            )
            .mount(&server)
            .await;

        let articles = FeedLoader::new(newsdata_at(&server))
            .fetch_articles(Category::All)
            .await;

        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.id.starts_with(FALLBACK_PREFIX)));
    }

    #[tokio::test]
    async fn error_status_payload_yields_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"error","results":{"message":"The provided API key is not valid.","code":"Unauthorized"}}"#,
            ))
            .mount(&server)
            .await;

        let articles = FeedLoader::new(newsdata_at(&server))
            .fetch_articles(Category::Business)
            .await;
        assert!(is_fallback(&articles));
    }

    #[tokio::test]
    async fn server_error_and_garbage_yield_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let loader = FeedLoader::new(newsdata_at(&server));
        assert!(is_fallback(&loader.fetch_articles(Category::All).await));
        assert!(is_fallback(&loader.fetch_articles(Category::All).await));
    }

    #[tokio::test]
    async fn unreachable_host_yields_fallback() {
        let source = NewsDataSource::new(
            Url::parse("http://127.0.0.1:9/api/1/news").unwrap(),
            SecretString::from("k"),
            Duration::from_secs(2),
        )
        .unwrap();

        let articles = FeedLoader::new(source).fetch_articles(Category::All).await;
        assert!(is_fallback(&articles));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn worker_delivers_result_with_sequence_number() {
        let (mut worker, rx) = FeedWorker::new(FeedLoader::new(SlowBusiness), Handle::current());

        worker.request(7, Category::Science);
        let msg = recv(&rx).await;

        assert_eq!(msg.seq, 7);
        assert_eq!(msg.category, Category::Science);
        assert_eq!(msg.articles[0].id, "Science");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn new_request_cancels_superseded_one() {
        let (mut worker, rx) = FeedWorker::new(FeedLoader::new(SlowBusiness), Handle::current());

        worker.request(1, Category::Business);
        worker.request(2, Category::Health);

        let msg = recv(&rx).await;
        assert_eq!(msg.seq, 2);
        assert_eq!(msg.category, Category::Health);

        // The slow Business load would have finished by now had it not been aborted.
        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dropping_worker_aborts_in_flight_load() {
        let (mut worker, rx) = FeedWorker::new(FeedLoader::new(SlowBusiness), Handle::current());

        worker.request(1, Category::Business);
        drop(worker);

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(rx.try_recv().is_err());
    }
}
