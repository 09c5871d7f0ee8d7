use std::time::Duration;

use crate::chat::{ChatTurn, MessageId};
use crate::model::{Watch, WatchId};
use crate::ViewId;

/// Requests for the outside world. Results come back as [`crate::Msg`]s
/// tagged with the same `view`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchWatchList {
        view: ViewId,
    },
    FetchWatch {
        view: ViewId,
        id: WatchId,
    },
    FetchTimeline {
        view: ViewId,
        id: WatchId,
    },
    /// Sleep, then refetch the timeline. Answered by `TimelineRefreshed`.
    RefreshTimelineAfter {
        view: ViewId,
        id: WatchId,
        delay: Duration,
    },
    CreateWatch {
        view: ViewId,
        url: String,
        title: String,
    },
    TriggerScan {
        view: ViewId,
        target: ScanTarget,
    },
    DeleteWatch {
        view: ViewId,
        id: WatchId,
    },
    AskAssistant {
        view: ViewId,
        tool_id: MessageId,
        message: String,
        history: Vec<ChatTurn>,
        site_url: Option<String>,
    },
    ProbeFrame {
        view: ViewId,
        revision: u64,
        url: String,
    },
    StartGeneralCall {
        view: ViewId,
    },
    OpenExternal {
        url: String,
    },
    Notify(Notification),
}

/// A stored watch to rescan. Only buildable from a [`Watch`], never a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    id: WatchId,
    url: String,
    title: String,
}

impl ScanTarget {
    pub fn id(&self) -> &WatchId {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl From<&Watch> for ScanTarget {
    fn from(watch: &Watch) -> Self {
        Self {
            id: watch.id.clone(),
            url: watch.url.clone(),
            title: watch.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Transient toast text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}
