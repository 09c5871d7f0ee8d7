use crate::chat::{AssistantReply, MessageId};
use crate::model::{CreatedWatch, ScanId, Watch, WatchId, WatchTimeline};
use crate::preview::FrameVerdict;
use crate::route::Route;
use crate::state::InputMode;
use crate::ViewId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Leave the current screen for another one.
    Navigate(Route),

    /// User edited the URL box.
    UrlInputChanged(String),
    /// User switched between direct URL entry and the assistant.
    InputModeSelected(InputMode),
    /// User asked for a preview of the current URL.
    PreviewClicked,
    /// Probe result for a preview request.
    PreviewVerdict {
        view: ViewId,
        revision: u64,
        verdict: FrameVerdict,
    },
    /// The embedded preview surface failed to load the current URL.
    PreviewSurfaceFailed { reason: String },
    /// User wants the current URL in a browser tab.
    OpenExternalClicked,
    /// User clicked Start Monitoring for the typed URL.
    StartMonitoringClicked,

    /// Watch store answered a list fetch.
    WatchListLoaded {
        view: ViewId,
        result: Result<Vec<Watch>, String>,
    },
    /// User clicked delete on a row. Opens the confirmation.
    DeleteRequested(WatchId),
    DeleteCancelled,
    DeleteConfirmed,
    DeleteFinished {
        view: ViewId,
        id: WatchId,
        result: Result<bool, String>,
    },
    /// User asked for a new scan of a listed watch.
    RescanRequested(WatchId),
    /// User asked for a new scan of the watch on screen.
    TriggerScanClicked,
    ScanTriggered {
        view: ViewId,
        id: WatchId,
        result: Result<bool, String>,
    },
    GeneralCallClicked,
    GeneralCallFinished { view: ViewId },

    /// User sent text to the assistant.
    ChatSubmitted(String),
    AssistantReplied {
        view: ViewId,
        tool_id: MessageId,
        result: Result<AssistantReply, String>,
    },
    /// User confirmed tracking the URL an assistant message found.
    TrackFoundUrl(MessageId),

    WatchLoaded {
        view: ViewId,
        id: WatchId,
        result: Result<Option<Watch>, String>,
    },
    /// User asked to start monitoring the draft on the live screen.
    CreateRequested,
    CreateFinished {
        view: ViewId,
        result: Result<CreatedWatch, String>,
    },

    TimelineLoaded {
        view: ViewId,
        id: WatchId,
        result: Result<Option<WatchTimeline>, String>,
    },
    /// Delayed refetch after a scan trigger.
    TimelineRefreshed {
        view: ViewId,
        id: WatchId,
        result: Result<Option<WatchTimeline>, String>,
    },
    EntrySelected(ScanId),
}
