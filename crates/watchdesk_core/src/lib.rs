//! Watchdesk core: pure state machine, data model and view-model helpers.
mod chat;
mod effect;
mod health;
mod model;
mod msg;
mod preview;
mod route;
mod state;
mod timeline;
mod update;
mod url_check;
mod view_model;

pub use chat::{
    AssistantReply, ChatMessage, ChatRole, ChatTranscript, ChatTurn, MessageId, PendingAsk,
    THINKING_TEXT,
};
pub use effect::{Effect, Notification, ScanTarget, Severity};
pub use health::{Health, StatusTone};
pub use model::{
    ChangeSet, CreatedWatch, DocumentsResponse, LatestScan, RecordId, ScanHistory, ScanId,
    TimelineDocument, Watch, WatchDraft, WatchId, WatchRecord, WatchTimeline,
};
pub use msg::Msg;
pub use preview::{FrameVerdict, PreviewState, UrlInput};
pub use route::{LiveTarget, Route};
pub use state::{
    AppState, CreateFlow, DetailScreen, InputMode, LandingScreen, LiveScreen, Loadable, Screen,
    TimelineScreen, ViewId, CHAT_GREETING, CREATE_CONFIRM_ATTEMPTS, RECENT_WATCH_LIMIT,
};
pub use timeline::{Timeline, SCAN_REFRESH_DELAY};
pub use update::update;
pub use url_check::{check_url, domain_of, is_valid_url, UrlCheck, INVALID_URL_MESSAGE};
pub use view_model::{
    format_time_ago, AppViewModel, ChangeListView, DetailView, EntryDetailView, LiveView,
    LandingView, ScanSummaryView, ScreenView, TimelineEntryView, TimelineReadyView, TimelineView,
    WatchRowView, WatchSummaryView, ENTRY_DESCRIPTION_LIMIT,
};
