use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },
    #[error("{source}")]
    Send {
        #[source]
        source: reqwest::Error,
    },
}

impl RequestError {
    /// True when the request never left the client because it could not be built.
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::Build { .. })
    }
}

/// Issues a single GET request and reports the response status.
///
/// Any status the server answers with is a success here; only failures to
/// build or transmit the request are errors.
#[async_trait]
pub trait Requester: Send + Sync {
    async fn get(&self, url: &str) -> Result<StatusCode, RequestError>;
}

// =============================================================================
// HTTP Client
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct HttpRequester {
    client: Client,
}

impl HttpRequester {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Requester for HttpRequester {
    async fn get(&self, url: &str) -> Result<StatusCode, RequestError> {
        let target = Url::parse(url).map_err(|source| RequestError::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;

        let request = self
            .client
            .get(target)
            .build()
            .map_err(|source| RequestError::Build { source })?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| RequestError::Send { source })?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);

        // Releases the connection back to the client.
        drop(response);

        Ok(status)
    }
}
