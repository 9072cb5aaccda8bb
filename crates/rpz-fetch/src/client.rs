//! HTTP line-streaming client implementation.

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;
use reqwest::Client as HttpClient;
use rpz_core::{Result, RpzError};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;
use tracing::debug;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Downloader collaborator: streams a remote text resource line by line.
#[derive(Clone)]
pub struct LineFetcher {
    inner: Arc<FetcherInner>,
}

struct FetcherInner {
    http: HttpClient,
}

impl Default for LineFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFetcher {
    /// Create a fetcher with default settings.
    #[must_use]
    pub fn new() -> Self {
        LineFetcherBuilder::new().build()
    }

    /// Create a builder for custom configuration.
    #[must_use]
    pub fn builder() -> LineFetcherBuilder {
        LineFetcherBuilder::new()
    }

    /// Fetch `url` and return its body as a stream of lines.
    ///
    /// A transport failure or a non-success status is a fetch failure; the
    /// caller decides how fatal that is (for zone builds it aborts the run).
    pub async fn fetch(&self, url: &str) -> Result<LineStream> {
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RpzError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpzError::Http(format!("{url} answered {status}")));
        }

        let stream: ByteStream = Box::pin(
            response
                .bytes_stream()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
        );

        Ok(LineStream {
            lines: StreamReader::new(stream),
        })
    }
}

/// A body being decoded into lines as the consumer advances.
pub struct LineStream {
    lines: StreamReader<ByteStream, Bytes>,
}

impl LineStream {
    /// Next line of the body, or `None` at end-of-stream.
    ///
    /// Line terminators are stripped; a transport error mid-body surfaces
    /// here as [`RpzError::Http`].
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .lines
            .read_line(&mut line)
            .await
            .map_err(|e| RpzError::Http(e.to_string()))?;
        if n == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// Builder for configuring a [`LineFetcher`]
pub struct LineFetcherBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for LineFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFetcherBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("rpzgen/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the fetcher.
    #[must_use]
    pub fn build(self) -> LineFetcher {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .expect("Failed to build HTTP client");

        LineFetcher {
            inner: Arc::new(FetcherInner { http }),
        }
    }
}
