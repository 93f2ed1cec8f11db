use std::time::Duration;

use reqwest::blocking::Client;

/// Upper bound on a single registry request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed registry body: {0}")]
    Body(String),
}

/// Retrieves the raw catalog body for a URL.
///
/// Implementations block until the body is available or the request fails.
/// At most one call is made per resolve.
pub trait RegistryFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: RegistryFetcher + ?Sized> RegistryFetcher for &F {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher. No auth headers are sent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mcpt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("build http client: {e}")))?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl RegistryFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!("fetching registry from {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        response.text().map_err(|e| self.classify(e))
    }
}
