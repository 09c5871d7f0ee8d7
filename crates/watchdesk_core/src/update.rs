use crate::chat::{ChatTranscript, MessageId};
use crate::effect::{Effect, Notification, ScanTarget};
use crate::model::{WatchRecord, WatchId};
use crate::preview::{FrameVerdict, UrlInput};
use crate::route::{LiveTarget, Route};
use crate::state::{
    site_greeting, CreateFlow, InputMode, LandingScreen, Loadable, CREATE_CONFIRM_ATTEMPTS,
    CHAT_GREETING,
};
use crate::timeline::{Timeline, SCAN_REFRESH_DELAY};
use crate::url_check::domain_of;
use crate::{AppState, Msg, Screen, ViewId};

/// What a message did to the state.
enum Outcome {
    /// Stale, disabled, or not meant for the current screen.
    Ignored,
    /// Requests only; nothing visible changed.
    Effects(Vec<Effect>),
    Changed(Vec<Effect>),
}

impl Outcome {
    fn changed() -> Self {
        Outcome::Changed(Vec::new())
    }

    fn changed_if(applied: bool) -> Self {
        if applied {
            Outcome::changed()
        } else {
            Outcome::Ignored
        }
    }
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let outcome = match msg {
        Msg::Navigate(route) => Outcome::Changed(state.navigate(route)),
        Msg::UrlInputChanged(text) => match landing_mut(&mut state) {
            Some(landing) => {
                landing.input.set_text(text);
                Outcome::changed()
            }
            None => Outcome::Ignored,
        },
        Msg::InputModeSelected(mode) => select_input_mode(&mut state, mode),
        Msg::PreviewClicked => preview_clicked(&mut state),
        Msg::PreviewVerdict {
            view,
            revision,
            verdict,
        } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                match preview_mut(&mut state) {
                    Some(preview) => Outcome::changed_if(preview.apply_verdict(revision, verdict)),
                    None => Outcome::Ignored,
                }
            }
        }
        Msg::PreviewSurfaceFailed { reason } => match preview_mut(&mut state) {
            Some(preview) => {
                let revision = preview.revision();
                Outcome::changed_if(preview.apply_verdict(revision, FrameVerdict::Refused { reason }))
            }
            None => Outcome::Ignored,
        },
        Msg::OpenExternalClicked => open_external(&state),
        Msg::StartMonitoringClicked => start_monitoring(&mut state),
        Msg::WatchListLoaded { view, result } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                watch_list_loaded(&mut state, view, result.unwrap_or_default())
            }
        }
        Msg::DeleteRequested(id) => delete_requested(&mut state, id),
        Msg::DeleteCancelled => match landing_mut(&mut state) {
            Some(landing) => Outcome::changed_if(landing.confirm_delete.take().is_some()),
            None => Outcome::Ignored,
        },
        Msg::DeleteConfirmed => delete_confirmed(&mut state),
        Msg::DeleteFinished { view, id, result } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                delete_finished(&mut state, view, id, result)
            }
        }
        Msg::RescanRequested(id) => rescan_requested(&mut state, id),
        Msg::TriggerScanClicked => trigger_scan_clicked(&mut state),
        Msg::ScanTriggered { view, id, result } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                scan_triggered(&mut state, view, id, result)
            }
        }
        Msg::GeneralCallClicked => {
            let view = state.view_id;
            match landing_mut(&mut state) {
                Some(landing) if !landing.general_call_pending => {
                    landing.general_call_pending = true;
                    Outcome::Changed(vec![Effect::StartGeneralCall { view }])
                }
                _ => Outcome::Ignored,
            }
        }
        Msg::GeneralCallFinished { view } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                match landing_mut(&mut state) {
                    Some(landing) => {
                        Outcome::changed_if(std::mem::take(&mut landing.general_call_pending))
                    }
                    None => Outcome::Ignored,
                }
            }
        }
        Msg::ChatSubmitted(text) => chat_submitted(&mut state, &text),
        Msg::AssistantReplied {
            view,
            tool_id,
            result,
        } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                match chat_mut(&mut state) {
                    Some(chat) => Outcome::changed_if(chat.complete(tool_id, result)),
                    None => Outcome::Ignored,
                }
            }
        }
        Msg::TrackFoundUrl(message_id) => track_found_url(&mut state, message_id),
        Msg::WatchLoaded { view, id, result } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                watch_loaded(&mut state, id, result)
            }
        }
        Msg::CreateRequested => create_requested(&mut state),
        Msg::CreateFinished { view, result } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                create_finished(&mut state, view, result)
            }
        }
        Msg::TimelineLoaded { view, id, result } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                match &mut state.screen {
                    Screen::Timeline(screen) if screen.id == id => {
                        screen.timeline = match result {
                            Ok(Some(response)) => Loadable::Ready(Timeline::from_response(response)),
                            Ok(None) | Err(_) => Loadable::Unavailable,
                        };
                        Outcome::changed()
                    }
                    _ => Outcome::Ignored,
                }
            }
        }
        Msg::TimelineRefreshed { view, id, result } => {
            if !state.is_current(view) {
                Outcome::Ignored
            } else {
                match &mut state.screen {
                    Screen::Timeline(screen) if screen.id == id => {
                        screen.refresh_pending = false;
                        // A failed background refresh keeps what is on screen.
                        if let Ok(Some(response)) = result {
                            match screen.timeline.ready_mut() {
                                Some(timeline) => timeline.refresh(response),
                                None => {
                                    screen.timeline =
                                        Loadable::Ready(Timeline::from_response(response))
                                }
                            }
                        }
                        Outcome::changed()
                    }
                    _ => Outcome::Ignored,
                }
            }
        }
        Msg::EntrySelected(scan_id) => match &mut state.screen {
            Screen::Timeline(screen) => match screen.timeline.ready_mut() {
                Some(timeline) => Outcome::changed_if(timeline.select(&scan_id)),
                None => Outcome::Ignored,
            },
            _ => Outcome::Ignored,
        },
    };

    let effects = match outcome {
        Outcome::Ignored => Vec::new(),
        Outcome::Effects(effects) => effects,
        Outcome::Changed(effects) => {
            state.mark_dirty();
            effects
        }
    };
    (state, effects)
}

fn landing_mut(state: &mut AppState) -> Option<&mut LandingScreen> {
    match &mut state.screen {
        Screen::Landing(landing) => Some(landing),
        _ => None,
    }
}

/// The preview surface of the current screen, if it has one.
fn preview_mut(state: &mut AppState) -> Option<&mut UrlInput> {
    match &mut state.screen {
        Screen::Landing(landing) => Some(&mut landing.input),
        Screen::Live(live) => Some(&mut live.preview),
        _ => None,
    }
}

fn chat_mut(state: &mut AppState) -> Option<&mut ChatTranscript> {
    match &mut state.screen {
        Screen::Landing(landing) => Some(&mut landing.chat),
        Screen::Live(live) => Some(&mut live.chat),
        _ => None,
    }
}

fn select_input_mode(state: &mut AppState, mode: InputMode) -> Outcome {
    let Some(landing) = landing_mut(state) else {
        return Outcome::Ignored;
    };
    if landing.mode == mode {
        return Outcome::Ignored;
    }
    landing.mode = mode;
    if mode == InputMode::Chat && landing.chat.is_empty() {
        landing.chat = ChatTranscript::with_greeting(CHAT_GREETING);
    }
    Outcome::changed()
}

fn preview_clicked(state: &mut AppState) -> Outcome {
    let view = state.view_id;
    let Some(landing) = landing_mut(state) else {
        return Outcome::Ignored;
    };
    match landing.input.begin_preview() {
        Some((revision, url)) => Outcome::Changed(vec![Effect::ProbeFrame {
            view,
            revision,
            url,
        }]),
        None => Outcome::Ignored,
    }
}

fn open_external(state: &AppState) -> Outcome {
    let url = match &state.screen {
        Screen::Landing(landing) => landing.input.valid_url(),
        Screen::Detail(detail) => detail.watch.ready().map(|w| w.url.clone()),
        Screen::Live(live) => live.record.ready().map(|r| r.url().to_string()),
        Screen::Timeline(screen) => screen.timeline.ready().map(|t| t.watch().url.clone()),
    };
    match url {
        Some(url) => Outcome::Effects(vec![Effect::OpenExternal { url }]),
        None => Outcome::Ignored,
    }
}

fn start_monitoring(state: &mut AppState) -> Outcome {
    let Some(url) = landing_mut(state).and_then(|landing| landing.input.valid_url()) else {
        return Outcome::Ignored;
    };
    let mut effects = vec![Effect::Notify(Notification::info(
        "Starting to watch",
        domain_of(&url),
    ))];
    effects.extend(state.navigate(Route::Live(LiveTarget::Draft { url })));
    Outcome::Changed(effects)
}

fn watch_list_loaded(state: &mut AppState, view: ViewId, watches: Vec<crate::Watch>) -> Outcome {
    match &mut state.screen {
        Screen::Landing(landing) => {
            landing.set_recent(watches);
            Outcome::changed()
        }
        Screen::Live(live) => {
            let CreateFlow::Confirming { url, id, attempts } = &mut live.creating else {
                return Outcome::Ignored;
            };
            if watches.iter().any(|w| &w.id == id) {
                let domain = domain_of(url);
                state.enter_landing_with(watches);
                return Outcome::Changed(vec![Effect::Notify(Notification::info(
                    "Watch created",
                    format!("Now monitoring {domain}"),
                ))]);
            }
            if *attempts < CREATE_CONFIRM_ATTEMPTS {
                *attempts += 1;
                return Outcome::Changed(vec![Effect::FetchWatchList { view }]);
            }
            live.creating = CreateFlow::Idle;
            Outcome::Changed(vec![Effect::Notify(Notification::error(
                "Watch not listed yet",
                "The watch was created but the store does not list it yet.",
            ))])
        }
        _ => Outcome::Ignored,
    }
}

fn delete_requested(state: &mut AppState, id: WatchId) -> Outcome {
    let Some(landing) = landing_mut(state) else {
        return Outcome::Ignored;
    };
    if landing.deleting.contains(&id) || landing.find_recent(&id).is_none() {
        return Outcome::Ignored;
    }
    landing.confirm_delete = Some(id);
    Outcome::changed()
}

fn delete_confirmed(state: &mut AppState) -> Outcome {
    let view = state.view_id;
    let Some(landing) = landing_mut(state) else {
        return Outcome::Ignored;
    };
    let Some(id) = landing.confirm_delete.take() else {
        return Outcome::Ignored;
    };
    landing.deleting.push(id.clone());
    Outcome::Changed(vec![Effect::DeleteWatch { view, id }])
}

fn delete_finished(
    state: &mut AppState,
    view: ViewId,
    id: WatchId,
    result: Result<bool, String>,
) -> Outcome {
    let Some(landing) = landing_mut(state) else {
        return Outcome::Ignored;
    };
    landing.deleting.retain(|pending| pending != &id);
    let effects = match result {
        Ok(true) => vec![
            Effect::FetchWatchList { view },
            Effect::Notify(Notification::info("Deleted", "Watch has been removed")),
        ],
        Ok(false) => vec![Effect::Notify(Notification::error(
            "Error",
            "Failed to delete watch",
        ))],
        Err(err) => vec![Effect::Notify(Notification::error(
            "Error",
            format!("Failed to delete watch: {err}"),
        ))],
    };
    Outcome::Changed(effects)
}

fn rescan_requested(state: &mut AppState, id: WatchId) -> Outcome {
    let view = state.view_id;
    let Some(landing) = landing_mut(state) else {
        return Outcome::Ignored;
    };
    if landing.rescanning.contains(&id) {
        return Outcome::Ignored;
    }
    let Some(target) = landing.find_recent(&id).map(ScanTarget::from) else {
        return Outcome::Ignored;
    };
    landing.rescanning.push(id);
    Outcome::Changed(vec![Effect::TriggerScan { view, target }])
}

fn trigger_scan_clicked(state: &mut AppState) -> Outcome {
    let view = state.view_id;
    let target = match &mut state.screen {
        Screen::Live(live) if !live.scanning => {
            let Some(watch) = live.record.ready().and_then(WatchRecord::persisted) else {
                return Outcome::Ignored;
            };
            let target = ScanTarget::from(watch);
            live.scanning = true;
            target
        }
        Screen::Timeline(screen) if !screen.scanning => {
            let Some(timeline) = screen.timeline.ready() else {
                return Outcome::Ignored;
            };
            let target = ScanTarget::from(timeline.watch());
            screen.scanning = true;
            target
        }
        _ => return Outcome::Ignored,
    };
    Outcome::Changed(vec![Effect::TriggerScan { view, target }])
}

fn scan_triggered(
    state: &mut AppState,
    view: ViewId,
    id: WatchId,
    result: Result<bool, String>,
) -> Outcome {
    let failure = match &result {
        Ok(true) => None,
        Ok(false) => Some("Failed to trigger scan".to_string()),
        Err(err) => Some(format!("Failed to trigger scan: {err}")),
    };
    let failed = |message: String| Effect::Notify(Notification::error("Error", message));

    match &mut state.screen {
        Screen::Landing(landing) => {
            let before = landing.rescanning.len();
            landing.rescanning.retain(|pending| pending != &id);
            if landing.rescanning.len() == before {
                return Outcome::Ignored;
            }
            let effects = match failure {
                None => {
                    let label = landing
                        .find_recent(&id)
                        .map(|w| domain_of(&w.url))
                        .unwrap_or_else(|| id.to_string());
                    vec![
                        Effect::FetchWatchList { view },
                        Effect::Notify(Notification::info("Scan triggered", label)),
                    ]
                }
                Some(message) => vec![failed(message)],
            };
            Outcome::Changed(effects)
        }
        Screen::Live(live) if live.scanning => {
            live.scanning = false;
            let effects = match failure {
                None => {
                    let label = live
                        .record
                        .ready()
                        .map(|r| domain_of(r.url()))
                        .unwrap_or_default();
                    vec![
                        Effect::FetchWatch { view, id },
                        Effect::Notify(Notification::info("Scan triggered", label)),
                    ]
                }
                Some(message) => vec![failed(message)],
            };
            Outcome::Changed(effects)
        }
        Screen::Timeline(screen) if screen.scanning && screen.id == id => {
            screen.scanning = false;
            let effects = match failure {
                None => {
                    screen.refresh_pending = true;
                    vec![
                        Effect::RefreshTimelineAfter {
                            view,
                            id,
                            delay: SCAN_REFRESH_DELAY,
                        },
                        Effect::Notify(Notification::info(
                            "Scan triggered",
                            "The timeline will refresh shortly",
                        )),
                    ]
                }
                Some(message) => vec![failed(message)],
            };
            Outcome::Changed(effects)
        }
        _ => Outcome::Ignored,
    }
}

fn chat_submitted(state: &mut AppState, text: &str) -> Outcome {
    let view = state.view_id;
    let (ask, site_url) = match &mut state.screen {
        Screen::Landing(landing) if landing.mode == InputMode::Chat => {
            (landing.chat.begin_send(text), None)
        }
        Screen::Live(live) => {
            let Some(site_url) = live.record.ready().map(|r| r.url().to_string()) else {
                return Outcome::Ignored;
            };
            (live.chat.begin_send(text), Some(site_url))
        }
        _ => return Outcome::Ignored,
    };
    match ask {
        Some(ask) => Outcome::Changed(vec![Effect::AskAssistant {
            view,
            tool_id: ask.tool_id,
            message: ask.message,
            history: ask.history,
            site_url,
        }]),
        None => Outcome::Ignored,
    }
}

fn track_found_url(state: &mut AppState, message_id: MessageId) -> Outcome {
    let Some(url) = landing_mut(state)
        .and_then(|landing| landing.chat.found_url(message_id))
        .map(ToOwned::to_owned)
    else {
        return Outcome::Ignored;
    };
    let mut effects = vec![Effect::Notify(Notification::info(
        "Starting to track",
        domain_of(&url),
    ))];
    effects.extend(state.navigate(Route::Live(LiveTarget::Draft { url })));
    Outcome::Changed(effects)
}

fn watch_loaded(
    state: &mut AppState,
    id: WatchId,
    result: Result<Option<crate::Watch>, String>,
) -> Outcome {
    let view = state.view_id;
    let missing_on_entry = match &mut state.screen {
        Screen::Detail(detail) if detail.id == id => {
            detail.watch = match result {
                Ok(Some(watch)) => Loadable::Ready(watch),
                Ok(None) | Err(_) => Loadable::Unavailable,
            };
            return Outcome::changed();
        }
        Screen::Live(live) if live.target == LiveTarget::Watch(id.clone()) => match result {
            Ok(Some(watch)) => {
                if live.chat.is_empty() {
                    live.chat = ChatTranscript::with_greeting(site_greeting(&watch.url));
                }
                // Refreshes after a scan keep the preview already probed.
                let probe = if live.preview.text().is_empty() {
                    live.start_preview(view, &watch.url)
                } else {
                    None
                };
                live.record = Loadable::Ready(WatchRecord::Persisted(watch));
                return Outcome::Changed(probe.into_iter().collect());
            }
            // A refresh that fails keeps the record already on screen.
            _ => live.record.is_loading(),
        },
        _ => false,
    };
    if !missing_on_entry {
        return Outcome::Ignored;
    }
    let mut effects = vec![Effect::Notify(Notification::error(
        "Watch not found",
        "The watch does not exist or has been deleted",
    ))];
    effects.extend(state.navigate(Route::Landing));
    Outcome::Changed(effects)
}

fn create_requested(state: &mut AppState) -> Outcome {
    let view = state.view_id;
    let Screen::Live(live) = &mut state.screen else {
        return Outcome::Ignored;
    };
    if live.creating != CreateFlow::Idle {
        return Outcome::Ignored;
    }
    let Some(WatchRecord::Draft(draft)) = live.record.ready() else {
        return Outcome::Ignored;
    };
    let effect = Effect::CreateWatch {
        view,
        url: draft.url.clone(),
        title: draft.title.clone(),
    };
    live.creating = CreateFlow::Submitting;
    Outcome::Changed(vec![effect])
}

fn create_finished(
    state: &mut AppState,
    view: ViewId,
    result: Result<crate::CreatedWatch, String>,
) -> Outcome {
    let Screen::Live(live) = &mut state.screen else {
        return Outcome::Ignored;
    };
    if live.creating != CreateFlow::Submitting {
        return Outcome::Ignored;
    }
    match result {
        Ok(created) => {
            let url = live
                .record
                .ready()
                .map(|r| r.url().to_string())
                .unwrap_or_else(|| created.document.url.clone());
            live.creating = CreateFlow::Confirming {
                url,
                id: created.document.id,
                attempts: 1,
            };
            Outcome::Changed(vec![Effect::FetchWatchList { view }])
        }
        Err(err) => {
            live.creating = CreateFlow::Idle;
            Outcome::Changed(vec![Effect::Notify(Notification::error(
                "Error creating watch",
                err,
            ))])
        }
    }
}
