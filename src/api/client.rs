//! HTTP client for the token backend.
//!
//! [`TokenBackend`] is the seam the TUI talks through; [`HttpTokenBackend`]
//! is the reqwest implementation used at runtime.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::instrument;
use url::Url;

use super::error::{ApiError, Result};
use super::models::{CreateTokenRequest, IssuedToken, PageQuery, TokenPage, UserSummary};
use crate::config::ApiConfig;

const TOKENS_PATH: &str = "api/v1/api_tokens";
const CURRENT_USER_PATH: &str = "api/v1/auth/current";

/// Operations the console needs from the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenBackend: Send + Sync {
    /// Issue a new token. The response carries the secret exactly once.
    async fn create_token(&self, request: CreateTokenRequest) -> Result<IssuedToken>;

    /// Fetch one page of token summaries. Never includes secrets.
    async fn list_tokens(&self, query: PageQuery) -> Result<TokenPage>;

    /// The signed-in user, shown in the header avatar.
    async fn current_user(&self) -> Result<UserSummary>;
}

/// reqwest-backed [`TokenBackend`].
#[derive(Clone)]
pub struct HttpTokenBackend {
    base_url: Url,
    access_token: Option<String>,
    auth_header: String,
    client: Client,
}

impl HttpTokenBackend {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            access_token: config.access_token.clone(),
            auth_header: config.auth_header.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) if !token.is_empty() => builder.header(self.auth_header.as_str(), token),
            _ => builder,
        }
    }

    /// Turn a response into `T`, mapping non-2xx statuses to [`ApiError::Status`].
    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            log::warn!("Backend returned {status}: {message}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"error": "..."}` or `{"message": "..."}`; anything else is
/// returned trimmed as-is.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    body.trim().to_string()
}

#[async_trait]
impl TokenBackend for HttpTokenBackend {
    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_token(&self, request: CreateTokenRequest) -> Result<IssuedToken> {
        let url = self.endpoint(TOKENS_PATH)?;
        let response = self
            .authorize(self.client.post(url))
            .json(&request)
            .send()
            .await?;
        let issued: IssuedToken = Self::decode(response).await?;
        log::info!("Issued API token '{}' ({})", issued.summary.name, issued.summary.uid);
        Ok(issued)
    }

    #[instrument(skip(self))]
    async fn list_tokens(&self, query: PageQuery) -> Result<TokenPage> {
        let url = self.endpoint(TOKENS_PATH)?;
        let response = self
            .authorize(self.client.get(url))
            .query(&[("start", query.start), ("count", query.count)])
            .send()
            .await?;
        let page: TokenPage = Self::decode(response).await?;
        log::debug!(
            "Listed {} of {} tokens from offset {}",
            page.items.len(),
            page.total,
            page.start
        );
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn current_user(&self) -> Result<UserSummary> {
        let url = self.endpoint(CURRENT_USER_PATH)?;
        let response = self.authorize(self.client.get(url)).send().await?;
        Self::decode(response).await
    }
}
