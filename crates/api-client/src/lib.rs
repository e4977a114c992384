use crate::error::ApiError;
use async_trait::async_trait;
use configuration::ApiConfig;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

pub mod endpoints;
pub mod error;
pub mod responses;
// --- Public API ---
pub use endpoints::section_path;
pub use responses::Envelope;

/// The interface the analytics aggregator uses to reach the backend.
/// The underlying implementation (HTTP or mock) can be swapped out.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Performs an authorized GET of `path` and returns the parsed envelope.
    ///
    /// A non-2xx status or a body that is not an envelope is an error,
    /// whatever the body says.
    async fn get(&self, path: &str, token: &str) -> Result<Envelope, ApiError>;
}

/// A concrete implementation of the `ApiClient` over HTTP.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(api_config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(api_config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: api_config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    async fn get(&self, path: &str, token: &str) -> Result<Envelope, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "Sending GET request.");

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Request returned a non-success status.");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str::<Envelope>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}
