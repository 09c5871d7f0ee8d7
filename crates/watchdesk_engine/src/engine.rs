use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use desk_logging::{desk_info, desk_warn};
use watchdesk_core::{MessageId, ScanTarget, ViewId, WatchId};

use crate::assistant::{Assistant, AssistantRequest, HttpAssistant};
use crate::frame::{FrameProbe, HttpFrameProbe};
use crate::store::{ReqwestWatchStore, WatchStore};
use crate::{ApiError, ClientSettings, EngineEvent};

/// Why the engine could not start.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to set up http client: {0}")]
    Client(#[from] ApiError),
}

enum EngineCommand {
    ListWatches {
        view: ViewId,
    },
    FetchWatch {
        view: ViewId,
        id: WatchId,
    },
    FetchTimeline {
        view: ViewId,
        id: WatchId,
        delay: Option<Duration>,
    },
    Create {
        view: ViewId,
        url: String,
        title: String,
    },
    TriggerScan {
        view: ViewId,
        target: ScanTarget,
    },
    Delete {
        view: ViewId,
        id: WatchId,
    },
    Ask {
        view: ViewId,
        tool_id: MessageId,
        request: AssistantRequest,
    },
    Probe {
        view: ViewId,
        revision: u64,
        url: String,
    },
    GeneralCall {
        view: ViewId,
    },
}

#[derive(Clone)]
struct Backends {
    store: Arc<dyn WatchStore>,
    assistant: Arc<dyn Assistant>,
    probe: Arc<dyn FrameProbe>,
}

/// Runs backend calls on a tokio runtime owned by a background thread.
///
/// Every call is fire-and-forget; results arrive as [`EngineEvent`]s in
/// completion order, not request order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: &ClientSettings) -> Result<Self, StartError> {
        let store = Arc::new(ReqwestWatchStore::new(settings)?);
        let assistant = Arc::new(HttpAssistant::new(settings)?);
        let probe = Arc::new(HttpFrameProbe::new(settings)?);
        Self::with_backends(store, assistant, probe)
    }

    /// Engine over arbitrary backends.
    pub fn with_backends(
        store: Arc<dyn WatchStore>,
        assistant: Arc<dyn Assistant>,
        probe: Arc<dyn FrameProbe>,
    ) -> Result<Self, StartError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let backends = Backends {
            store,
            assistant,
            probe,
        };

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backends = backends.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(&backends, command).await;
                    let _ = event_tx.send(event);
                });
            }
            desk_info!("Engine command channel closed; shutting down");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn list_watches(&self, view: ViewId) {
        self.send(EngineCommand::ListWatches { view });
    }

    pub fn fetch_watch(&self, view: ViewId, id: WatchId) {
        self.send(EngineCommand::FetchWatch { view, id });
    }

    pub fn fetch_timeline(&self, view: ViewId, id: WatchId) {
        self.send(EngineCommand::FetchTimeline {
            view,
            id,
            delay: None,
        });
    }

    /// Sleeps on the runtime, then refetches. Answered with `refresh: true`.
    pub fn refresh_timeline_after(&self, view: ViewId, id: WatchId, delay: Duration) {
        self.send(EngineCommand::FetchTimeline {
            view,
            id,
            delay: Some(delay),
        });
    }

    pub fn create_watch(&self, view: ViewId, url: impl Into<String>, title: impl Into<String>) {
        self.send(EngineCommand::Create {
            view,
            url: url.into(),
            title: title.into(),
        });
    }

    pub fn trigger_scan(&self, view: ViewId, target: ScanTarget) {
        self.send(EngineCommand::TriggerScan { view, target });
    }

    pub fn delete_watch(&self, view: ViewId, id: WatchId) {
        self.send(EngineCommand::Delete { view, id });
    }

    pub fn ask_assistant(&self, view: ViewId, tool_id: MessageId, request: AssistantRequest) {
        self.send(EngineCommand::Ask {
            view,
            tool_id,
            request,
        });
    }

    pub fn probe_frame(&self, view: ViewId, revision: u64, url: impl Into<String>) {
        self.send(EngineCommand::Probe {
            view,
            revision,
            url: url.into(),
        });
    }

    pub fn general_call(&self, view: ViewId) {
        self.send(EngineCommand::GeneralCall { view });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            desk_warn!("Engine thread is gone; dropping command");
        }
    }
}

async fn handle_command(backends: &Backends, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::ListWatches { view } => {
            let result = backends.store.list().await;
            log_failure("list watches", &result);
            EngineEvent::WatchListLoaded { view, result }
        }
        EngineCommand::FetchWatch { view, id } => {
            let result = backends.store.watch(&id).await;
            log_failure("fetch watch", &result);
            EngineEvent::WatchLoaded { view, id, result }
        }
        EngineCommand::FetchTimeline { view, id, delay } => {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let result = backends.store.timeline(&id).await;
            log_failure("fetch timeline", &result);
            EngineEvent::TimelineLoaded {
                view,
                id,
                refresh: delay.is_some(),
                result,
            }
        }
        EngineCommand::Create { view, url, title } => {
            desk_info!("Creating watch for {url}");
            let result = backends.store.create_and_scan(&url, &title).await;
            log_failure("create watch", &result);
            EngineEvent::WatchCreated { view, result }
        }
        EngineCommand::TriggerScan { view, target } => {
            desk_info!("Triggering scan of watch {} ({})", target.id(), target.url());
            let result = backends
                .store
                .create_and_scan(target.url(), target.title())
                .await
                .map(|_| true);
            log_failure("trigger scan", &result);
            EngineEvent::ScanTriggered {
                view,
                id: target.id().clone(),
                result,
            }
        }
        EngineCommand::Delete { view, id } => {
            desk_info!("Deleting watch {id}");
            let result = backends.store.delete(&id).await;
            log_failure("delete watch", &result);
            EngineEvent::WatchDeleted { view, id, result }
        }
        EngineCommand::Ask {
            view,
            tool_id,
            request,
        } => {
            let result = backends.assistant.ask(request).await;
            log_failure("ask assistant", &result);
            EngineEvent::AssistantReplied {
                view,
                tool_id,
                result,
            }
        }
        EngineCommand::Probe {
            view,
            revision,
            url,
        } => {
            let verdict = backends.probe.probe(&url).await;
            EngineEvent::FrameProbed {
                view,
                revision,
                verdict,
            }
        }
        EngineCommand::GeneralCall { view } => {
            let result = backends.store.general_call().await;
            log_failure("general call", &result);
            EngineEvent::GeneralCallFinished { view, result }
        }
    }
}

fn log_failure<T>(what: &str, result: &Result<T, ApiError>) {
    if let Err(err) = result {
        desk_warn!("Failed to {what}: {} ({})", err.message, err.kind);
    }
}
