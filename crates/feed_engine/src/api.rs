use std::time::Duration;

use feed_core::{PageData, QueryKey};
use futures_util::StreamExt;
use serde::Deserialize;
use url::Url;

use crate::{decode_page, FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Base URL of the API, e.g. `http://localhost:8000`.
    pub endpoint_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint_base: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait ItemsApi: Send + Sync {
    /// `GET <base>/items` for one query key.
    async fn fetch_page(&self, key: &QueryKey) -> Result<PageData, FetchError>;

    /// `GET <base>/health`; succeeds when the API answers `{"ok": true}`.
    async fn health(&self) -> Result<(), FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestItemsApi {
    settings: FetchSettings,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    ok: bool,
}

impl ReqwestItemsApi {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// Full request URL for `key`; `q` only appears when the key has a term.
    pub fn items_url(&self, key: &QueryKey) -> Result<Url, FetchError> {
        let mut url = self.endpoint("items")?;
        url.query_pairs_mut().extend_pairs(key.query_pairs());
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let base = self.settings.endpoint_base.trim().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_body(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ItemsApi for ReqwestItemsApi {
    async fn fetch_page(&self, key: &QueryKey) -> Result<PageData, FetchError> {
        let url = self.items_url(key)?;
        let body = self.get_body(url).await?;
        decode_page(&body)
    }

    async fn health(&self) -> Result<(), FetchError> {
        let url = self.endpoint("health")?;
        let body = self.get_body(url).await?;
        let health: HealthResponse = serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Malformed, err.to_string()))?;
        if health.ok {
            Ok(())
        } else {
            Err(FetchError::new(FailureKind::Malformed, "health probe reported ok=false"))
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Malformed, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
