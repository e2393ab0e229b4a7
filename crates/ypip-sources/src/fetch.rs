//! Retrieval of remote requirement files.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use ypip_core::config::FetchConfig;
use ypip_util::errors::{YpipError, YpipResult};

const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Blocking retrieval of a text document by URL.
pub trait Fetch: Send + Sync {
    /// Returns `Ok(None)` when the document does not exist (HTTP 404).
    /// Any other failure, including a timeout, is an error.
    fn fetch_text(&self, url: &str) -> YpipResult<Option<String>>;
}

/// HTTP fetcher backed by a blocking reqwest client.
pub struct HttpFetcher {
    client: Client,
    retries: u32,
}

impl HttpFetcher {
    /// Build a fetcher with the configured timeout, user agent and retry count.
    pub fn new(config: &FetchConfig) -> YpipResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| YpipError::fetch(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            retries: config.retries,
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch_text(&self, url: &str) -> YpipResult<Option<String>> {
        let attempts = self.retries + 1;
        let mut last_err = String::new();

        for attempt in 0..attempts {
            if attempt > 0 {
                tracing::debug!("Retrying {url} (attempt {})", attempt + 1);
                std::thread::sleep(RETRY_DELAY * attempt);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status == StatusCode::NOT_FOUND {
                        return Ok(None);
                    }
                    if status.is_server_error() {
                        last_err = format!("HTTP {status} from {url}");
                        continue;
                    }
                    if !status.is_success() {
                        return Err(YpipError::fetch(format!("HTTP {status} fetching {url}")));
                    }
                    let text = resp.text().map_err(|e| {
                        YpipError::fetch(format!("Failed to read response from {url}: {e}"))
                    })?;
                    return Ok(Some(text));
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_err = format!("{e}");
                    continue;
                }
                Err(e) => {
                    return Err(YpipError::fetch(format!("Request to {url} failed: {e}")));
                }
            }
        }

        Err(YpipError::fetch(format!(
            "Failed after {attempts} attempts for {url}: {last_err}"
        )))
    }
}

enum MemoryResponse {
    Body(String),
    Failure(String),
}

/// Fetcher answering from a fixed table of URLs.
///
/// Unknown URLs are reported as not found. Every request is recorded.
#[derive(Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, MemoryResponse>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .insert(url.into(), MemoryResponse::Body(body.into()));
        self
    }

    /// Fail fatally when `url` is requested.
    pub fn with_failure(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(url.into(), MemoryResponse::Failure(message.into()));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Fetch for MemoryFetcher {
    fn fetch_text(&self, url: &str) -> YpipResult<Option<String>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.responses.get(url) {
            Some(MemoryResponse::Body(body)) => Ok(Some(body.clone())),
            Some(MemoryResponse::Failure(message)) => Err(YpipError::fetch(message.clone())),
            None => Ok(None),
        }
    }
}
