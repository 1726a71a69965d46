//! One-shot page fetching for an explicit URL list.
//!
//! This is not a crawler: each listed URL gets a single GET, no links are
//! followed and nothing is retried. Up to `concurrency` requests are in flight
//! at once; bodies are handed back as strings so parsing happens on the
//! consuming side without holding a document across an await.

use crate::config::FetchConfig;
use crate::error::SinkError;
use crate::outputs::jsonl::JsonlSink;
use crate::pipeline::{Pipeline, RunStats};
use futures::stream::{self, Stream, StreamExt};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    concurrency: usize,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            concurrency: config.concurrency.max(1),
        })
    }

    /// GET one page; non-2xx statuses are errors.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str) -> reqwest::Result<String> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }

    /// Fetch every URL, yielding `(url, result)` in completion order.
    pub fn fetch_all(
        &self,
        urls: Vec<String>,
    ) -> impl Stream<Item = (String, reqwest::Result<String>)> + '_ {
        stream::iter(urls)
            .map(move |url| async move {
                let body = self.fetch(&url).await;
                (url, body)
            })
            .buffer_unordered(self.concurrency)
    }
}

/// Fetch `urls`, run each page through `pipeline` and append accepted
/// records to `sink`.
///
/// Fetch failures are logged and counted; only sink failures abort the run.
#[instrument(level = "info", skip_all, fields(site = pipeline.site_id(), urls = urls.len()))]
pub async fn run_site(
    fetcher: &Fetcher,
    pipeline: &mut Pipeline<'_>,
    urls: Vec<String>,
    sink: &mut JsonlSink,
) -> Result<RunStats, SinkError> {
    let mut pages = std::pin::pin!(fetcher.fetch_all(urls));
    while let Some((url, body)) = pages.next().await {
        match body {
            Ok(html) => {
                if let Some(record) = pipeline.process_html(&url, &html) {
                    sink.append(&record).await?;
                }
            }
            Err(e) => {
                error!(error = %e, %url, "Fetch failed");
                pipeline.record_fetch_failure();
            }
        }
    }
    let stats = *pipeline.stats();
    info!(accepted = stats.accepted, pages = stats.pages, "Finished fetching");
    Ok(stats)
}

/// Read a URL list: one per line, blank lines and `#` comments ignored.
/// Lines that are not absolute http(s) URLs are skipped with a warning.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn read_url_list(path: impl AsRef<Path>) -> Result<Vec<String>, SinkError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SinkError::io(path.display().to_string(), e))?;
    let urls = parse_url_list(&text);
    info!(count = urls.len(), "Read URL list");
    Ok(urls)
}

pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match Url::parse(line) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url.to_string()),
            _ => {
                warn!(line, "Skipping invalid URL");
                None
            }
        })
        .collect()
}
