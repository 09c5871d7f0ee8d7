use std::sync::Once;

use pretty_assertions::assert_eq;
use watchdesk_core::{
    update, AppState, Effect, Msg, Route, ScanHistory, ScanId, ScanTarget, ScreenView,
    TimelineDocument, TimelineView, ViewId, Watch, WatchId, WatchTimeline, SCAN_REFRESH_DELAY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(desk_logging::initialize_for_tests);
}

fn entry(id: u64, changes: bool) -> ScanHistory {
    ScanHistory {
        id: ScanId::from(id),
        date: format!("2024-03-0{}T10:00:00Z", (id % 9) + 1),
        changes,
        change_level: changes.then(|| "minor".to_string()),
        change_summary: changes.then(|| format!("summary {id}")),
        current_summary: Some(format!("page {id}")),
        raw_content_preview: None,
        additions: vec![format!("added in {id}")],
        deletions: Vec::new(),
        modifications: Vec::new(),
    }
}

fn watch() -> Watch {
    Watch {
        id: WatchId::from(7),
        title: "Docs".to_string(),
        desc: String::new(),
        url: "https://docs.example.com".to_string(),
        status: "active".to_string(),
        created_date: "2024-03-01T00:00:00Z".to_string(),
        latest_scan: None,
    }
}

fn response(ids: &[u64]) -> WatchTimeline {
    WatchTimeline {
        document: TimelineDocument {
            watch: watch(),
            category: Some("docs".to_string()),
            scan_count: Some(ids.len() as u64),
            scan_history: ids.iter().map(|id| entry(*id, *id % 2 == 0)).collect(),
        },
        total_scans: ids.len() as u64,
    }
}

fn open_timeline(ids: &[u64]) -> (AppState, ViewId) {
    init_logging();
    let id = WatchId::from(7);
    let (state, effects) = update(AppState::new(), Msg::Navigate(Route::Timeline(id.clone())));
    let view = state.view_id();
    assert_eq!(effects, vec![Effect::FetchTimeline { view, id: id.clone() }]);
    let (state, _) = update(
        state,
        Msg::TimelineLoaded {
            view,
            id,
            result: Ok(Some(response(ids))),
        },
    );
    (state, view)
}

fn ready(state: &AppState) -> watchdesk_core::TimelineReadyView {
    match state.view(chrono::Utc::now()).screen {
        ScreenView::Timeline(TimelineView::Ready(view)) => view,
        other => panic!("timeline not ready: {other:?}"),
    }
}

fn selected(state: &AppState) -> Option<ScanId> {
    ready(state).selected.map(|entry| entry.id)
}

#[test]
fn newest_entry_is_selected_by_default() {
    let (state, _) = open_timeline(&[10, 11, 12]);
    assert_eq!(selected(&state), Some(ScanId::from(10)));
}

#[test]
fn latest_scan_is_reconciled_from_history() {
    let (state, _) = open_timeline(&[12, 11]);
    let view = ready(&state);
    let latest = view.watch.latest_scan.expect("reconciled latest scan");

    assert_eq!(latest.change_summary.as_deref(), Some("summary 12"));
}

#[test]
fn unchanged_entries_show_no_change_lists() {
    let (state, _) = open_timeline(&[11]);
    let detail = ready(&state).selected.expect("selected entry");

    assert!(detail.changes.additions.is_empty());
    assert_eq!(ready(&state).entries[0].title, "Periodic Check");
    assert_eq!(ready(&state).entries[0].badge, "captured");
}

#[test]
fn older_selection_survives_refresh() {
    let (state, view) = open_timeline(&[0, 1, 2]);
    let (state, _) = update(state, Msg::EntrySelected(ScanId::from(2)));
    assert_eq!(selected(&state), Some(ScanId::from(2)));

    let (state, _) = update(
        state,
        Msg::TimelineRefreshed {
            view,
            id: WatchId::from(7),
            result: Ok(Some(response(&[3, 0, 1, 2]))),
        },
    );

    assert_eq!(ready(&state).entries.len(), 4);
    assert_eq!(selected(&state), Some(ScanId::from(2)));
}

#[test]
fn head_selection_follows_new_entry() {
    let (state, view) = open_timeline(&[0, 1, 2]);
    let (state, _) = update(
        state,
        Msg::TimelineRefreshed {
            view,
            id: WatchId::from(7),
            result: Ok(Some(response(&[3, 0, 1, 2]))),
        },
    );

    assert_eq!(selected(&state), Some(ScanId::from(3)));
}

#[test]
fn scan_trigger_schedules_a_delayed_refresh() {
    let (state, view) = open_timeline(&[0]);
    let (state, effects) = update(state, Msg::TriggerScanClicked);
    assert_eq!(
        effects,
        vec![Effect::TriggerScan {
            view,
            target: ScanTarget::from(&watch()),
        }]
    );
    assert!(ready(&state).scanning);

    let (state, effects) = update(state, Msg::TriggerScanClicked);
    assert!(effects.is_empty(), "button disabled while in flight");

    let (state, effects) = update(
        state,
        Msg::ScanTriggered {
            view,
            id: WatchId::from(7),
            result: Ok(true),
        },
    );
    assert_eq!(
        effects[0],
        Effect::RefreshTimelineAfter {
            view,
            id: WatchId::from(7),
            delay: SCAN_REFRESH_DELAY,
        }
    );
    let after = ready(&state);
    assert!(!after.scanning);
    assert!(after.refresh_pending);
    assert_eq!(after.entries.len(), 1, "no synthetic entry");
}

#[test]
fn failed_refresh_keeps_current_entries() {
    let (state, view) = open_timeline(&[0, 1]);
    let (state, _) = update(
        state,
        Msg::TimelineRefreshed {
            view,
            id: WatchId::from(7),
            result: Err("timeout".to_string()),
        },
    );

    assert_eq!(ready(&state).entries.len(), 2);
}

#[test]
fn refresh_after_navigation_is_dropped() {
    let (state, view) = open_timeline(&[0]);
    let (state, _) = update(state, Msg::Navigate(Route::Timeline(WatchId::from(7))));
    let (state, effects) = update(
        state,
        Msg::TimelineLoaded {
            view,
            id: WatchId::from(7),
            result: Ok(Some(response(&[5, 0]))),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.view(chrono::Utc::now()).screen,
        ScreenView::Timeline(TimelineView::Loading)
    );
}

#[test]
fn missing_watch_shows_not_found() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::Timeline(WatchId::from("gone"))));
    let view = state.view_id();
    let (state, _) = update(
        state,
        Msg::TimelineLoaded {
            view,
            id: WatchId::from("gone"),
            result: Ok(None),
        },
    );

    assert_eq!(
        state.view(chrono::Utc::now()).screen,
        ScreenView::Timeline(TimelineView::NotFound)
    );
}
