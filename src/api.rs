//! Remote novel API.
//!
//! [`NovelApi`] is the seam between the view model and the network: the
//! production implementation talks HTTP through `reqwest`, tests swap in an
//! in-memory fake.

use crate::config::{ApiConfig, HttpConfig};
use crate::error::ApiError;
use crate::images::CoverImage;
use crate::models::{self, Novel};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

/// Read access to the novel API.
#[async_trait]
pub trait NovelApi: Send + Sync {
    /// Fetches the whole catalog (`GET {base}/novels`).
    async fn fetch_catalog(&self) -> Result<Vec<Novel>, ApiError>;

    /// Fetches one novel with its chapters (`GET {base}/novels/{id}`).
    ///
    /// `Ok(None)` means the server answered but holds no such novel.
    async fn fetch_novel(&self, id: &str) -> Result<Option<Novel>, ApiError>;

    /// Fetches image bytes from an absolute URL.
    async fn fetch_image(&self, url: &str) -> Result<CoverImage, ApiError>;
}

/// Builds the shared HTTP client.
pub fn create_http_client(config: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs_f64(config.timeout_sec))
        .build()
}

/// [`NovelApi`] over HTTP, attaching the bearer token when one is stored.
pub struct HttpNovelApi {
    client: reqwest::Client,
    config: ApiConfig,
    token: Option<String>,
}

impl HttpNovelApi {
    pub fn new(client: reqwest::Client, config: ApiConfig, token: Option<String>) -> Self {
        Self {
            client,
            config,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        log::debug!("GET {}", url);
        let response = check_response_status(self.get(url).send().await?).await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl NovelApi for HttpNovelApi {
    async fn fetch_catalog(&self) -> Result<Vec<Novel>, ApiError> {
        let body = self.get_text(&self.config.novels_url()).await?;
        models::parse_catalog(&body)
    }

    async fn fetch_novel(&self, id: &str) -> Result<Option<Novel>, ApiError> {
        let body = self.get_text(&self.config.novel_url(id)).await?;
        models::parse_novel(&body)
    }

    async fn fetch_image(&self, url: &str) -> Result<CoverImage, ApiError> {
        log::debug!("GET {}", url);
        let response = check_response_status(self.get(url).send().await?).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = response.bytes().await?;

        Ok(CoverImage {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

/// Turns a non-success response into [`ApiError::Status`].
///
/// When the body is JSON with a `message` field, that message is used;
/// otherwise the status reason is.
pub async fn check_response_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
    })
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .filter(|m| !m.is_empty())
}
