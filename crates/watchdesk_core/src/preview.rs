use crate::url_check::{check_url, UrlCheck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Invalid,
    Loading,
    Valid,
    /// The target refused to be embedded. Sticks until the input changes.
    Blocked,
}

/// What the preview surface reported for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameVerdict {
    Embeddable,
    Refused { reason: String },
}

/// The URL text box together with its preview state.
///
/// Every edit bumps `revision`; verdicts carry the revision they were
/// requested for and are dropped once a newer edit exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlInput {
    text: String,
    check: UrlCheck,
    preview: PreviewState,
    revision: u64,
    blocked_reason: Option<String>,
}

impl UrlInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn check(&self) -> &UrlCheck {
        &self.check
    }

    pub fn preview(&self) -> PreviewState {
        self.preview
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn blocked_reason(&self) -> Option<&str> {
        self.blocked_reason.as_deref()
    }

    /// Trimmed URL text when the input is a valid http(s) URL.
    pub fn valid_url(&self) -> Option<String> {
        self.check
            .is_valid()
            .then(|| self.text.trim().to_string())
    }

    pub fn set_text(&mut self, text: String) {
        self.revision += 1;
        self.check = check_url(&text);
        self.preview = if self.check.is_valid() {
            PreviewState::Valid
        } else {
            PreviewState::Invalid
        };
        self.blocked_reason = None;
        self.text = text;
    }

    pub fn can_preview(&self) -> bool {
        self.preview == PreviewState::Valid
    }

    /// `Valid -> Loading`. Returns the revision and URL to probe.
    pub fn begin_preview(&mut self) -> Option<(u64, String)> {
        if !self.can_preview() {
            return None;
        }
        let url = self.valid_url()?;
        self.preview = PreviewState::Loading;
        Some((self.revision, url))
    }

    /// Applies a verdict. Returns false when it was stale or changed nothing.
    pub fn apply_verdict(&mut self, revision: u64, verdict: FrameVerdict) -> bool {
        if revision != self.revision {
            return false;
        }
        match (self.preview, verdict) {
            (PreviewState::Loading, FrameVerdict::Embeddable) => {
                self.preview = PreviewState::Valid;
                true
            }
            (PreviewState::Loading | PreviewState::Valid, FrameVerdict::Refused { reason }) => {
                self.preview = PreviewState::Blocked;
                self.blocked_reason = Some(reason);
                true
            }
            _ => false,
        }
    }
}
