use desk_logging::{desk_debug, desk_info, desk_warn};
use watchdesk_core::{Effect, Msg, Notification};
use watchdesk_engine::{AssistantRequest, EngineEvent, EngineHandle};

/// What the front-end shows right away instead of sending to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Local {
    Notify(Notification),
    OpenExternal(String),
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Starts engine work and returns what the terminal must print itself.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Local> {
        let mut local = Vec::new();
        for effect in effects {
            desk_debug!("Effect {effect:?}");
            match effect {
                Effect::FetchWatchList { view } => self.engine.list_watches(view),
                Effect::FetchWatch { view, id } => self.engine.fetch_watch(view, id),
                Effect::FetchTimeline { view, id } => self.engine.fetch_timeline(view, id),
                Effect::RefreshTimelineAfter { view, id, delay } => {
                    self.engine.refresh_timeline_after(view, id, delay)
                }
                Effect::CreateWatch { view, url, title } => {
                    desk_info!("CreateWatch url={url}");
                    self.engine.create_watch(view, url, title)
                }
                Effect::TriggerScan { view, target } => self.engine.trigger_scan(view, target),
                Effect::DeleteWatch { view, id } => {
                    desk_info!("DeleteWatch id={id}");
                    self.engine.delete_watch(view, id)
                }
                Effect::AskAssistant {
                    view,
                    tool_id,
                    message,
                    history,
                    site_url,
                } => self.engine.ask_assistant(
                    view,
                    tool_id,
                    AssistantRequest {
                        message,
                        session_history: history,
                        site_url,
                    },
                ),
                Effect::ProbeFrame {
                    view,
                    revision,
                    url,
                } => self.engine.probe_frame(view, revision, url),
                Effect::StartGeneralCall { view } => self.engine.general_call(view),
                Effect::OpenExternal { url } => local.push(Local::OpenExternal(url)),
                Effect::Notify(notification) => local.push(Local::Notify(notification)),
            }
        }
        local
    }

    pub fn poll(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::WatchListLoaded { view, result } => Msg::WatchListLoaded {
            view,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::WatchLoaded { view, id, result } => Msg::WatchLoaded {
            view,
            id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::TimelineLoaded {
            view,
            id,
            refresh,
            result,
        } => {
            let result = result.map_err(|err| err.to_string());
            if refresh {
                Msg::TimelineRefreshed { view, id, result }
            } else {
                Msg::TimelineLoaded { view, id, result }
            }
        }
        EngineEvent::WatchCreated { view, result } => Msg::CreateFinished {
            view,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ScanTriggered { view, id, result } => Msg::ScanTriggered {
            view,
            id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::WatchDeleted { view, id, result } => Msg::DeleteFinished {
            view,
            id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::AssistantReplied {
            view,
            tool_id,
            result,
        } => Msg::AssistantReplied {
            view,
            tool_id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::FrameProbed {
            view,
            revision,
            verdict,
        } => Msg::PreviewVerdict {
            view,
            revision,
            verdict,
        },
        EngineEvent::GeneralCallFinished { view, result } => {
            if let Err(err) = result {
                desk_warn!("General call failed: {err}");
            }
            Msg::GeneralCallFinished { view }
        }
    }
}
