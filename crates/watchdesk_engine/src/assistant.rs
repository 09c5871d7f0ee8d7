use desk_logging::desk_debug;
use serde::{Deserialize, Serialize};
use watchdesk_core::{AssistantReply, ChatTurn};

use crate::types::map_reqwest_error;
use crate::{ApiError, ClientSettings, FailureKind};

/// One question for the conversational assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    pub message: String,
    pub session_history: Vec<ChatTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyBody {
    text: String,
    #[serde(default)]
    found_url: Option<String>,
}

#[async_trait::async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, request: AssistantRequest) -> Result<AssistantReply, ApiError>;
}

/// Posts questions to a hosted assistant service.
#[derive(Debug, Clone)]
pub struct HttpAssistant {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpAssistant {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        let endpoint = settings
            .assistant_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToOwned::to_owned);
        Ok(Self { client, endpoint })
    }
}

#[async_trait::async_trait]
impl Assistant for HttpAssistant {
    async fn ask(&self, request: AssistantRequest) -> Result<AssistantReply, ApiError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Err(ApiError::new(
                FailureKind::NotConfigured,
                "the assistant service is not configured",
            ));
        };
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        desk_debug!(
            "POST {endpoint} ({} history turns)",
            request.session_history.len()
        );

        let response = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }
        let reply: ReplyBody = serde_json::from_str(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        Ok(AssistantReply {
            text: reply.text,
            found_url: reply.found_url,
        })
    }
}
