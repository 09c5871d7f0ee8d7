use chrono::{DateTime, NaiveDateTime, Utc};

use crate::chat::ChatMessage;
use crate::health::{Health, StatusTone};
use crate::model::{ChangeSet, LatestScan, ScanHistory, ScanId, Watch, WatchId, WatchRecord};
use crate::preview::PreviewState;
use crate::state::{
    CreateFlow, DetailScreen, InputMode, LandingScreen, LiveScreen, Loadable, TimelineScreen,
};
use crate::url_check::domain_of;
use crate::{AppState, Screen};

/// Entry descriptions longer than this are cut and get an ellipsis.
pub const ENTRY_DESCRIPTION_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub path: String,
    pub screen: ScreenView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    Landing(LandingView),
    Detail(DetailView),
    Live(LiveView),
    Timeline(TimelineView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingView {
    pub mode: InputMode,
    pub url_text: String,
    pub url_error: Option<&'static str>,
    pub preview: PreviewState,
    pub blocked_reason: Option<String>,
    pub can_preview: bool,
    pub can_start_monitoring: bool,
    /// `None` while the first list fetch is outstanding.
    pub recent: Option<Vec<WatchRowView>>,
    pub confirm_delete: Option<WatchId>,
    pub chat: Vec<ChatMessage>,
    pub chat_pending: bool,
    pub general_call_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRowView {
    pub id: WatchId,
    pub title: String,
    pub domain: String,
    pub url: String,
    pub status: String,
    pub tone: StatusTone,
    pub health: Health,
    pub health_label: &'static str,
    pub health_description: String,
    pub time_ago: Option<String>,
    pub deleting: bool,
    pub rescanning: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Loading,
    NotFound,
    Ready(WatchSummaryView),
}

/// Metadata block shared by the detail and live screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSummaryView {
    pub id: WatchId,
    pub title: String,
    pub desc: String,
    pub url: String,
    pub domain: String,
    pub status: String,
    pub tone: StatusTone,
    pub health: Health,
    pub health_label: &'static str,
    pub health_description: String,
    pub created_ago: Option<String>,
    pub latest_scan: Option<ScanSummaryView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummaryView {
    pub scanned_ago: Option<String>,
    pub change_summary: Option<String>,
    pub current_summary: Option<String>,
    pub changes: ChangeListView,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeListView {
    pub additions: Vec<String>,
    pub deletions: Vec<String>,
    pub modifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveView {
    pub title: String,
    pub url: String,
    pub domain: String,
    /// `None` while a persisted watch is loading.
    pub watch: Option<WatchSummaryView>,
    pub is_draft: bool,
    pub can_create: bool,
    pub creating: bool,
    pub can_scan: bool,
    pub scanning: bool,
    pub preview: PreviewState,
    pub blocked_reason: Option<String>,
    pub chat: Vec<ChatMessage>,
    pub chat_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineView {
    Loading,
    NotFound,
    Ready(TimelineReadyView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineReadyView {
    pub watch: WatchSummaryView,
    pub category: Option<String>,
    pub total_scans: u64,
    pub entries: Vec<TimelineEntryView>,
    pub selected: Option<EntryDetailView>,
    pub scanning: bool,
    pub refresh_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntryView {
    pub id: ScanId,
    pub title: &'static str,
    pub badge: &'static str,
    pub description: String,
    pub time_ago: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetailView {
    pub id: ScanId,
    pub date: String,
    pub health: Health,
    pub change_summary: Option<String>,
    pub current_summary: Option<String>,
    pub raw_content_preview: Option<String>,
    pub changes: ChangeListView,
}

pub(crate) fn build(state: &AppState, now: DateTime<Utc>) -> AppViewModel {
    let screen = match state.screen() {
        Screen::Landing(landing) => ScreenView::Landing(landing_view(landing, now)),
        Screen::Detail(detail) => ScreenView::Detail(detail_view(detail, now)),
        Screen::Live(live) => ScreenView::Live(live_view(live, now)),
        Screen::Timeline(screen) => ScreenView::Timeline(timeline_view(screen, now)),
    };
    AppViewModel {
        path: state.route().to_path(),
        screen,
        dirty: state.is_dirty(),
    }
}

fn landing_view(landing: &LandingScreen, now: DateTime<Utc>) -> LandingView {
    let input = &landing.input;
    let recent = landing.recent.ready().map(|watches| {
        watches
            .iter()
            .map(|watch| {
                let health = Health::of(watch);
                WatchRowView {
                    id: watch.id.clone(),
                    title: watch.title.clone(),
                    domain: domain_of(&watch.url),
                    url: watch.url.clone(),
                    status: watch.status.clone(),
                    tone: StatusTone::for_status(&watch.status),
                    health,
                    health_label: health.label(),
                    health_description: health.describe(watch.latest_scan.as_ref()),
                    time_ago: format_time_ago(&watch.created_date, now),
                    deleting: landing.deleting.contains(&watch.id),
                    rescanning: landing.rescanning.contains(&watch.id),
                }
            })
            .collect()
    });

    LandingView {
        mode: landing.mode,
        url_text: input.text().to_string(),
        url_error: input.check().error_message(),
        preview: input.preview(),
        blocked_reason: input.blocked_reason().map(ToOwned::to_owned),
        can_preview: input.can_preview(),
        can_start_monitoring: input.check().is_valid(),
        recent,
        confirm_delete: landing.confirm_delete.clone(),
        chat: landing.chat.messages().to_vec(),
        chat_pending: landing.chat.is_pending(),
        general_call_enabled: !landing.general_call_pending,
    }
}

fn detail_view(detail: &DetailScreen, now: DateTime<Utc>) -> DetailView {
    match &detail.watch {
        Loadable::Loading => DetailView::Loading,
        Loadable::Unavailable => DetailView::NotFound,
        Loadable::Ready(watch) => DetailView::Ready(watch_summary(watch, now)),
    }
}

fn live_view(live: &LiveScreen, now: DateTime<Utc>) -> LiveView {
    let record = live.record.ready();
    let persisted = record.and_then(WatchRecord::persisted);
    let url = record.map(|r| r.url().to_string()).unwrap_or_default();
    let creating = live.creating != CreateFlow::Idle;
    LiveView {
        title: record.map(|r| r.title().to_string()).unwrap_or_default(),
        domain: domain_of(&url),
        url,
        watch: persisted.map(|w| watch_summary(w, now)),
        is_draft: record.is_some_and(WatchRecord::is_draft),
        can_create: record.is_some_and(WatchRecord::is_draft) && !creating,
        creating,
        can_scan: persisted.is_some() && !live.scanning,
        scanning: live.scanning,
        preview: live.preview.preview(),
        blocked_reason: live.preview.blocked_reason().map(ToOwned::to_owned),
        chat: live.chat.messages().to_vec(),
        chat_pending: live.chat.is_pending(),
    }
}

fn timeline_view(screen: &TimelineScreen, now: DateTime<Utc>) -> TimelineView {
    let timeline = match &screen.timeline {
        Loadable::Loading => return TimelineView::Loading,
        Loadable::Unavailable => return TimelineView::NotFound,
        Loadable::Ready(timeline) => timeline,
    };
    let selected_id = timeline.selected_id();
    let entries = timeline
        .entries()
        .iter()
        .map(|entry| TimelineEntryView {
            id: entry.id.clone(),
            title: if entry.changes {
                "Content Updated"
            } else {
                "Periodic Check"
            },
            badge: if entry.changes { "changed" } else { "captured" },
            description: entry_description(entry),
            time_ago: format_time_ago(&entry.date, now),
            selected: selected_id == Some(&entry.id),
        })
        .collect();

    TimelineView::Ready(TimelineReadyView {
        watch: watch_summary(timeline.watch(), now),
        category: timeline.category().map(ToOwned::to_owned),
        total_scans: timeline.total_scans(),
        entries,
        selected: timeline.selected_entry().map(entry_detail),
        scanning: screen.scanning,
        refresh_pending: screen.refresh_pending,
    })
}

fn watch_summary(watch: &Watch, now: DateTime<Utc>) -> WatchSummaryView {
    let health = Health::of(watch);
    WatchSummaryView {
        id: watch.id.clone(),
        title: watch.title.clone(),
        desc: watch.desc.clone(),
        url: watch.url.clone(),
        domain: domain_of(&watch.url),
        status: watch.status.clone(),
        tone: StatusTone::for_status(&watch.status),
        health,
        health_label: health.label(),
        health_description: health.describe(watch.latest_scan.as_ref()),
        created_ago: format_time_ago(&watch.created_date, now),
        latest_scan: watch
            .latest_scan
            .as_ref()
            .map(|scan| scan_summary(scan, now)),
    }
}

fn scan_summary(scan: &LatestScan, now: DateTime<Utc>) -> ScanSummaryView {
    ScanSummaryView {
        scanned_ago: format_time_ago(&scan.scan_date, now),
        change_summary: non_blank(scan.change_summary.as_deref()),
        current_summary: non_blank(scan.current_summary.as_deref()),
        changes: change_list(scan.effective_changes()),
    }
}

fn entry_detail(entry: &ScanHistory) -> EntryDetailView {
    EntryDetailView {
        id: entry.id.clone(),
        date: entry.date.clone(),
        health: Health::from_scan(Some(&LatestScan::from(entry))),
        change_summary: non_blank(entry.change_summary.as_deref()),
        current_summary: non_blank(entry.current_summary.as_deref()),
        raw_content_preview: non_blank(entry.raw_content_preview.as_deref()),
        changes: change_list(entry.effective_changes()),
    }
}

fn change_list(changes: ChangeSet<'_>) -> ChangeListView {
    ChangeListView {
        additions: changes.additions.to_vec(),
        deletions: changes.deletions.to_vec(),
        modifications: changes.modifications.to_vec(),
    }
}

fn entry_description(entry: &ScanHistory) -> String {
    let text = if entry.changes {
        entry.change_summary.as_deref()
    } else {
        entry.current_summary.as_deref()
    };
    let text = non_blank(text).unwrap_or_else(|| {
        if entry.changes {
            "Changes detected on the page".to_string()
        } else {
            "No changes detected".to_string()
        }
    });
    truncate_chars(&text, ENTRY_DESCRIPTION_LIMIT)
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Relative label for an ISO-8601 timestamp: "Just now", "{h}h ago" or
/// "{d}d ago". Timestamps without an offset are read as UTC.
pub fn format_time_ago(date: &str, now: DateTime<Utc>) -> Option<String> {
    let date = date.trim();
    let at = match DateTime::parse_from_rfc3339(date) {
        Ok(at) => at.with_timezone(&Utc),
        Err(_) => NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()?
            .and_utc(),
    };
    let hours = (now - at).num_hours();
    Some(if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        format!("{}d ago", hours / 24)
    })
}
