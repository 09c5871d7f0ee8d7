use std::fmt;

use watchdesk_core::{
    AssistantReply, CreatedWatch, FrameVerdict, MessageId, ViewId, Watch, WatchId, WatchTimeline,
};

/// Results coming back from the engine thread, tagged like the effect that
/// asked for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    WatchListLoaded {
        view: ViewId,
        result: Result<Vec<Watch>, ApiError>,
    },
    WatchLoaded {
        view: ViewId,
        id: WatchId,
        result: Result<Option<Watch>, ApiError>,
    },
    TimelineLoaded {
        view: ViewId,
        id: WatchId,
        /// True for the delayed refetch after a scan trigger.
        refresh: bool,
        result: Result<Option<WatchTimeline>, ApiError>,
    },
    WatchCreated {
        view: ViewId,
        result: Result<CreatedWatch, ApiError>,
    },
    ScanTriggered {
        view: ViewId,
        id: WatchId,
        result: Result<bool, ApiError>,
    },
    WatchDeleted {
        view: ViewId,
        id: WatchId,
        result: Result<bool, ApiError>,
    },
    AssistantReplied {
        view: ViewId,
        tool_id: MessageId,
        result: Result<AssistantReply, ApiError>,
    },
    FrameProbed {
        view: ViewId,
        revision: u64,
        verdict: FrameVerdict,
    },
    GeneralCallFinished {
        view: ViewId,
        result: Result<(), ApiError>,
    },
}

/// A failed backend call. `message` is what the user gets to read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds the error for a non-2xx response, preferring the backend's
    /// own `{"error": "..."}` text.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|e| e.as_str())
                    .map(ToOwned::to_owned)
            })
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| status.to_string());
        Self::new(FailureKind::HttpStatus(status.as_u16()), message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    NotConfigured,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::NotConfigured => write!(f, "not configured"),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, "The request timed out");
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{ApiError, FailureKind};

    #[test]
    fn backend_error_body_is_unwrapped() {
        let err = ApiError::from_status(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error": "URL and title are required"}"#,
        );
        assert_eq!(err.kind, FailureKind::HttpStatus(400));
        assert_eq!(err.to_string(), "URL and title are required");
    }

    #[test]
    fn plain_bodies_fall_back_to_status_text() {
        let err = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.kind, FailureKind::HttpStatus(502));
        assert_eq!(err.message, "502 Bad Gateway");
    }
}
