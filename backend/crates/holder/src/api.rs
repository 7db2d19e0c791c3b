//! HTTP client for the entry API

use crate::config::HolderConfig;
use crate::error::{HolderError, HolderResult};
use kernel::id::BookingId;
use qr_token::{SecretEnvelope, TokenBatch};
use serde::de::DeserializeOwned;

/// Server operations the holder depends on
#[trait_variant::make(TokenApi: Send)]
pub trait LocalTokenApi {
    /// Server-side issuance of the current and next slot tokens
    async fn issue_tokens(&self, booking_id: &BookingId) -> HolderResult<TokenBatch>;

    /// Signing secret for offline generation
    async fn fetch_secret(&self) -> HolderResult<SecretEnvelope>;
}

#[derive(Debug, Clone)]
pub struct HttpTokenApi {
    http: reqwest::Client,
    base_url: String,
    session_token: Option<String>,
}

impl HttpTokenApi {
    pub fn new(config: &HolderConfig) -> HolderResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_token: config.session_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, rb: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_token {
            Some(token) => rb.bearer_auth(token),
            None => rb,
        }
    }
}

impl TokenApi for HttpTokenApi {
    async fn issue_tokens(&self, booking_id: &BookingId) -> HolderResult<TokenBatch> {
        let url = self.url(&format!("bookings/{booking_id}/tokens"));
        let resp = self.authorize(self.http.post(url)).send().await?;
        classify(resp).await
    }

    async fn fetch_secret(&self) -> HolderResult<SecretEnvelope> {
        let resp = self.authorize(self.http.get(self.url("secret"))).send().await?;
        classify(resp).await
    }
}

/// Decode a success body, or turn a problem response into `HolderError::Server`
async fn classify<T: DeserializeOwned>(resp: reqwest::Response) -> HolderResult<T> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if status.is_success() {
        return serde_json::from_slice(&bytes).map_err(|e| HolderError::Server {
            status: status.as_u16(),
            detail: format!("undecodable body: {e}"),
        });
    }

    let detail = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());

    Err(HolderError::Server {
        status: status.as_u16(),
        detail,
    })
}
