//! REST implementation of [`RemoteSync`].

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;

use super::{RemoteError, RemoteResult, RemoteSync};
use crate::sync::{MutationAction, PendingMutation};
use crate::util::{compact_text, is_http_url, normalize_text_option};

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Replays mutations against `{base_url}/{collection}[/{id}]`.
#[derive(Clone)]
pub struct HttpRemote {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl fmt::Debug for HttpRemote {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HttpRemote")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl HttpRemote {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> RemoteResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
            .build()?;

        Ok(Self {
            base_url,
            token: normalize_text_option(token),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// HTTP method and URL used to replay `mutation`
    pub fn endpoint(&self, mutation: &PendingMutation) -> (Method, String) {
        let collection_url = format!("{}/{}", self.base_url, mutation.kind.collection());
        let record_url = || {
            format!(
                "{collection_url}/{}",
                urlencoding::encode(&mutation.id.to_string())
            )
        };

        match mutation.action {
            MutationAction::Create => (Method::POST, collection_url.clone()),
            MutationAction::Update => (Method::PUT, record_url()),
            MutationAction::Delete => (Method::DELETE, record_url()),
        }
    }
}

impl RemoteSync for HttpRemote {
    async fn replay(&self, mutation: &PendingMutation) -> RemoteResult<()> {
        let (method, url) = self.endpoint(mutation);
        tracing::debug!("Replaying {} {} {}", mutation.action, method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(reqwest::header::ACCEPT, "application/json");
        if method != Method::DELETE {
            request = request.json(&mutation.data);
        }
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Api {
            status: status.as_u16(),
            message: parse_api_error(status, &body),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return message.trim().to_string();
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed
    }
}

fn normalize_base_url(raw: String) -> RemoteResult<String> {
    let base_url = normalize_text_option(Some(raw)).ok_or_else(|| {
        RemoteError::InvalidConfiguration("API base URL must not be empty".to_string())
    })?;
    if is_http_url(&base_url) {
        Ok(base_url.trim_end_matches('/').to_string())
    } else {
        Err(RemoteError::InvalidConfiguration(
            "API base URL must include http:// or https://".to_string(),
        ))
    }
}
