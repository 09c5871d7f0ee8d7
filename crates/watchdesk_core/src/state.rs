use chrono::{DateTime, Utc};

use crate::chat::ChatTranscript;
use crate::effect::{Effect, Notification};
use crate::model::{Watch, WatchDraft, WatchId, WatchRecord};
use crate::preview::UrlInput;
use crate::route::{LiveTarget, Route};
use crate::timeline::Timeline;
use crate::url_check::{domain_of, is_valid_url};
use crate::view_model::{self, AppViewModel};

/// How many watches the landing view keeps from the store's list.
pub const RECENT_WATCH_LIMIT: usize = 6;

/// List refetches allowed while waiting for a created watch to show up.
pub const CREATE_CONFIRM_ATTEMPTS: u32 = 3;

pub const CHAT_GREETING: &str = "Hi! I'm here to help you discover websites to monitor.\n\
Tell me what you'd like to track: stock prices, product releases, news on a topic, \
documentation changes, competitor activity, or anything else.\n\
What would you like to keep an eye on?";

/// Identifies one visit to a screen. Results tagged with an older id are
/// dropped instead of being applied to a view that no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ViewId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Url,
    Chat,
}

/// Data owned by a screen while a read is outstanding or after it failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Ready(T),
    /// The read failed or found nothing.
    Unavailable,
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LandingScreen {
    pub(crate) mode: InputMode,
    pub(crate) input: UrlInput,
    pub(crate) recent: Loadable<Vec<Watch>>,
    pub(crate) confirm_delete: Option<WatchId>,
    pub(crate) deleting: Vec<WatchId>,
    pub(crate) rescanning: Vec<WatchId>,
    pub(crate) chat: ChatTranscript,
    pub(crate) general_call_pending: bool,
}

impl LandingScreen {
    pub(crate) fn find_recent(&self, id: &WatchId) -> Option<&Watch> {
        self.recent.ready()?.iter().find(|w| &w.id == id)
    }

    /// Sole writer of the recent list.
    pub(crate) fn set_recent(&mut self, mut watches: Vec<Watch>) {
        watches.truncate(RECENT_WATCH_LIMIT);
        self.recent = Loadable::Ready(watches);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailScreen {
    pub(crate) id: WatchId,
    pub(crate) watch: Loadable<Watch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CreateFlow {
    #[default]
    Idle,
    Submitting,
    /// Created; waiting for a list refetch that contains it.
    Confirming {
        url: String,
        id: WatchId,
        attempts: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveScreen {
    pub(crate) target: LiveTarget,
    pub(crate) record: Loadable<WatchRecord>,
    pub(crate) chat: ChatTranscript,
    pub(crate) creating: CreateFlow,
    pub(crate) scanning: bool,
    /// Embedded view of the site. Probed once the URL is known.
    pub(crate) preview: UrlInput,
}

impl LiveScreen {
    /// Loads `url` into the preview and returns the probe to run, if any.
    pub(crate) fn start_preview(&mut self, view: ViewId, url: &str) -> Option<Effect> {
        self.preview.set_text(url.to_string());
        let (revision, url) = self.preview.begin_preview()?;
        Some(Effect::ProbeFrame {
            view,
            revision,
            url,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineScreen {
    pub(crate) id: WatchId,
    pub(crate) timeline: Loadable<Timeline>,
    pub(crate) scanning: bool,
    pub(crate) refresh_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Landing(LandingScreen),
    Detail(DetailScreen),
    Live(LiveScreen),
    Timeline(TimelineScreen),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Landing(LandingScreen::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) route: Route,
    pub(crate) view_id: ViewId,
    pub(crate) screen: Screen,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Builds the view model. `now` feeds the relative "time ago" labels.
    pub fn view(&self, now: DateTime<Utc>) -> AppViewModel {
        view_model::build(self, now)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns and clears the dirty flag; the front-end renders only when set.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_current(&self, view: ViewId) -> bool {
        self.view_id == view
    }

    /// Replaces the screen and returns the reads it needs.
    pub(crate) fn navigate(&mut self, route: Route) -> Vec<Effect> {
        if let Route::Live(LiveTarget::Draft { url }) = &route {
            if !is_valid_url(url) {
                let mut effects = vec![Effect::Notify(Notification::error(
                    "Invalid URL",
                    format!("Cannot preview {url}"),
                ))];
                effects.extend(self.navigate(Route::Landing));
                return effects;
            }
        }

        self.view_id = ViewId(self.view_id.0 + 1);
        self.dirty = true;
        let view = self.view_id;

        let (screen, effects) = match &route {
            Route::Landing => (
                Screen::Landing(LandingScreen::default()),
                vec![Effect::FetchWatchList { view }],
            ),
            Route::Detail(id) => (
                Screen::Detail(DetailScreen {
                    id: id.clone(),
                    watch: Loadable::Loading,
                }),
                vec![Effect::FetchWatch {
                    view,
                    id: id.clone(),
                }],
            ),
            Route::Live(LiveTarget::Watch(id)) => (
                Screen::Live(LiveScreen {
                    target: LiveTarget::Watch(id.clone()),
                    record: Loadable::Loading,
                    chat: ChatTranscript::new(),
                    creating: CreateFlow::Idle,
                    scanning: false,
                    preview: UrlInput::new(),
                }),
                vec![Effect::FetchWatch {
                    view,
                    id: id.clone(),
                }],
            ),
            Route::Live(LiveTarget::Draft { url }) => {
                let url = url.trim().to_string();
                let mut live = LiveScreen {
                    target: LiveTarget::Draft { url: url.clone() },
                    chat: ChatTranscript::with_greeting(site_greeting(&url)),
                    record: Loadable::Ready(WatchRecord::Draft(WatchDraft::new(url.clone()))),
                    creating: CreateFlow::Idle,
                    scanning: false,
                    preview: UrlInput::new(),
                };
                let effects = live.start_preview(view, &url).into_iter().collect();
                (Screen::Live(live), effects)
            }
            Route::Timeline(id) => (
                Screen::Timeline(TimelineScreen {
                    id: id.clone(),
                    timeline: Loadable::Loading,
                    scanning: false,
                    refresh_pending: false,
                }),
                vec![Effect::FetchTimeline {
                    view,
                    id: id.clone(),
                }],
            ),
        };

        self.route = route;
        self.screen = screen;
        effects
    }

    /// Lands on the landing screen with a list that was just fetched.
    pub(crate) fn enter_landing_with(&mut self, watches: Vec<Watch>) {
        self.view_id = ViewId(self.view_id.0 + 1);
        self.dirty = true;
        let mut landing = LandingScreen::default();
        landing.set_recent(watches);
        self.route = Route::Landing;
        self.screen = Screen::Landing(landing);
    }
}

pub(crate) fn site_greeting(url: &str) -> String {
    format!(
        "Hello! I'm here to help you monitor and track changes on {}.\n\
         What specific content or changes are you most interested in tracking?",
        domain_of(url)
    )
}
