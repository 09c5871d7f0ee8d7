use url::form_urlencoded;

use crate::model::WatchId;

/// Navigable application states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Landing and creation view (`/` and `/watch/new`).
    #[default]
    Landing,
    /// `/watch/{id}`
    Detail(WatchId),
    /// `/watch/{id}/live` or `/watch/preview/live?url=...`
    Live(LiveTarget),
    /// `/watch/{id}/timeline`
    Timeline(WatchId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveTarget {
    Watch(WatchId),
    Draft { url: String },
}

impl Route {
    pub fn parse(raw: &str) -> Option<Route> {
        let raw = raw.trim();
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["watch", "new"] => Some(Route::Landing),
            ["watch", "preview", "live"] => {
                let url = form_urlencoded::parse(query?.as_bytes())
                    .find(|(key, _)| key == "url")
                    .map(|(_, value)| value.into_owned())?;
                Some(Route::Live(LiveTarget::Draft { url }))
            }
            ["watch", id] => WatchId::parse(id).map(Route::Detail),
            ["watch", id, "live"] => {
                WatchId::parse(id).map(|id| Route::Live(LiveTarget::Watch(id)))
            }
            ["watch", id, "timeline"] => WatchId::parse(id).map(Route::Timeline),
            _ => None,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Detail(id) => format!("/watch/{id}"),
            Route::Live(LiveTarget::Watch(id)) => format!("/watch/{id}/live"),
            Route::Live(LiveTarget::Draft { url }) => {
                let encoded: String = form_urlencoded::byte_serialize(url.as_bytes()).collect();
                format!("/watch/preview/live?url={encoded}")
            }
            Route::Timeline(id) => format!("/watch/{id}/timeline"),
        }
    }
}
