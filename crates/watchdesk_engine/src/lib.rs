//! Watchdesk engine: backend clients and effect execution.
mod assistant;
mod engine;
mod frame;
mod settings;
mod store;
mod types;

pub use assistant::{Assistant, AssistantRequest, HttpAssistant};
pub use engine::{EngineHandle, StartError};
pub use frame::{verdict_from_headers, FrameProbe, HttpFrameProbe};
pub use settings::ClientSettings;
pub use store::{ReqwestWatchStore, WatchStore};
pub use types::{ApiError, EngineEvent, FailureKind};
