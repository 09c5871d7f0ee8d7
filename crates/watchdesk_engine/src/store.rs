use desk_logging::{desk_debug, desk_warn};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use watchdesk_core::{CreatedWatch, DocumentsResponse, Watch, WatchId, WatchTimeline};

use crate::types::map_reqwest_error;
use crate::{ApiError, ClientSettings, FailureKind};

/// The backend that owns every watch and its scan history.
#[async_trait::async_trait]
pub trait WatchStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Watch>, ApiError>;

    /// Watch plus scan history. `Ok(None)` when the store does not know the id.
    async fn timeline(&self, id: &WatchId) -> Result<Option<WatchTimeline>, ApiError>;

    /// Creates the watch and runs its first scan. Rescans when the URL is
    /// already stored.
    async fn create_and_scan(&self, url: &str, title: &str) -> Result<CreatedWatch, ApiError>;

    /// `Ok(false)` when the store answered but refused.
    async fn delete(&self, id: &WatchId) -> Result<bool, ApiError>;

    async fn general_call(&self) -> Result<(), ApiError>;

    async fn watch(&self, id: &WatchId) -> Result<Option<Watch>, ApiError> {
        let timeline = self.timeline(id).await?;
        Ok(timeline.map(|t| t.reconciled().document.watch))
    }
}

#[derive(Serialize)]
struct CreateBody<'a> {
    url: &'a str,
    title: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReqwestWatchStore {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestWatchStore {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(settings.base_url.trim())
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// `base/seg1/seg2/`. The store's routes all end in a slash.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok((status, body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

#[async_trait::async_trait]
impl WatchStore for ReqwestWatchStore {
    async fn list(&self) -> Result<Vec<Watch>, ApiError> {
        let url = self.endpoint(&["documents"]);
        desk_debug!("GET {url}");
        let response: DocumentsResponse = self.send_json(self.client.get(url)).await?;
        Ok(response.documents)
    }

    async fn timeline(&self, id: &WatchId) -> Result<Option<WatchTimeline>, ApiError> {
        let key = id.as_key();
        let url = self.endpoint(&["documents", &key]);
        desk_debug!("GET {url}");
        let (status, body) = self.send(self.client.get(url)).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }
        decode(&body).map(Some)
    }

    async fn create_and_scan(&self, url: &str, title: &str) -> Result<CreatedWatch, ApiError> {
        let endpoint = self.endpoint(&["createDocumentAndScan"]);
        desk_debug!("POST {endpoint} url={url}");
        let request = self.client.post(endpoint).json(&CreateBody { url, title });
        self.send_json(request).await
    }

    async fn delete(&self, id: &WatchId) -> Result<bool, ApiError> {
        let key = id.as_key();
        let url = self.endpoint(&["documents", &key]);
        desk_debug!("DELETE {url}");
        let (status, body) = self.send(self.client.delete(url)).await?;
        if !status.is_success() {
            desk_warn!("Delete of watch {id} refused with {status}: {body}");
        }
        Ok(status.is_success())
    }

    async fn general_call(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["makeGeneralCall"]);
        desk_debug!("POST {url}");
        let request = self.client.post(url).json(&serde_json::json!({}));
        let _: serde_json::Value = self.send_json(request).await?;
        Ok(())
    }
}
