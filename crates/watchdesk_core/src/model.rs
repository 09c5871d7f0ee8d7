//! Records exchanged with the watch store.
//!
//! The store owns every record; the client keeps transient copies only.
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Identity of a stored record.
///
/// The store hands out numeric ids but older payloads use strings, so both
/// are accepted. Equality and hashing compare the stringified forms, which
/// makes `Number(7)` and `Text("7")` the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

pub type WatchId = RecordId;
pub type ScanId = RecordId;

impl RecordId {
    /// Parses a path segment. Digits become `Number`, anything else `Text`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<u64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(raw.to_string()),
        })
    }

    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            RecordId::Number(n) => Cow::Owned(n.to_string()),
            RecordId::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RecordId::Number(a), RecordId::Number(b)) => a == b,
            _ => self.as_key() == other.as_key(),
        }
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_key().hash(state);
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

/// Added/removed/modified lines of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSet<'a> {
    pub additions: &'a [String],
    pub deletions: &'a [String],
    pub modifications: &'a [String],
}

const NO_CHANGES: ChangeSet<'static> = ChangeSet {
    additions: &[],
    deletions: &[],
    modifications: &[],
};

impl ChangeSet<'_> {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty() && self.modifications.is_empty()
    }
}

/// The most recent scan result attached to a watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestScan {
    pub id: ScanId,
    pub changes: bool,
    #[serde(default)]
    pub change_level: Option<String>,
    #[serde(default)]
    pub change_summary: Option<String>,
    #[serde(default)]
    pub current_summary: Option<String>,
    #[serde(default)]
    pub scan_date: String,
    #[serde(default)]
    pub additions: Vec<String>,
    #[serde(default)]
    pub deletions: Vec<String>,
    #[serde(default)]
    pub modifications: Vec<String>,
}

impl LatestScan {
    /// Change lists, empty whenever `changes` is false.
    pub fn effective_changes(&self) -> ChangeSet<'_> {
        if !self.changes {
            return NO_CHANGES;
        }
        ChangeSet {
            additions: &self.additions,
            deletions: &self.deletions,
            modifications: &self.modifications,
        }
    }
}

/// One entry of a watch's audit trail. Sequences are ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanHistory {
    pub id: ScanId,
    pub date: String,
    pub changes: bool,
    #[serde(default)]
    pub change_level: Option<String>,
    #[serde(default)]
    pub change_summary: Option<String>,
    #[serde(default)]
    pub current_summary: Option<String>,
    #[serde(default)]
    pub raw_content_preview: Option<String>,
    #[serde(default)]
    pub additions: Vec<String>,
    #[serde(default)]
    pub deletions: Vec<String>,
    #[serde(default)]
    pub modifications: Vec<String>,
}

impl ScanHistory {
    pub fn effective_changes(&self) -> ChangeSet<'_> {
        if !self.changes {
            return NO_CHANGES;
        }
        ChangeSet {
            additions: &self.additions,
            deletions: &self.deletions,
            modifications: &self.modifications,
        }
    }
}

impl From<&ScanHistory> for LatestScan {
    fn from(entry: &ScanHistory) -> Self {
        LatestScan {
            id: entry.id.clone(),
            changes: entry.changes,
            change_level: entry.change_level.clone(),
            change_summary: entry.change_summary.clone(),
            current_summary: entry.current_summary.clone(),
            scan_date: entry.date.clone(),
            additions: entry.additions.clone(),
            deletions: entry.deletions.clone(),
            modifications: entry.modifications.clone(),
        }
    }
}

/// A stored watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watch {
    pub id: WatchId,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    pub url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub latest_scan: Option<LatestScan>,
}

/// `GET /documents/` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentsResponse {
    pub documents: Vec<Watch>,
    #[serde(default)]
    pub total_count: u64,
}

/// A watch together with its scan history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineDocument {
    #[serde(flatten)]
    pub watch: Watch,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub scan_count: Option<u64>,
    #[serde(default)]
    pub scan_history: Vec<ScanHistory>,
}

/// `GET /documents/{id}/` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchTimeline {
    pub document: TimelineDocument,
    #[serde(default)]
    pub total_scans: u64,
}

impl WatchTimeline {
    /// Forces `latest_scan` to mirror the newest history entry so a stale
    /// summary is never shown next to a newer history.
    pub fn reconciled(mut self) -> Self {
        if let Some(newest) = self.document.scan_history.first() {
            self.document.watch.latest_scan = Some(LatestScan::from(newest));
        }
        self
    }
}

/// `POST /createDocumentAndScan/` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedWatch {
    #[serde(default)]
    pub message: Option<String>,
    pub document: Watch,
    #[serde(default)]
    pub scan: Option<LatestScan>,
}

/// A URL the user is looking at before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchDraft {
    pub url: String,
    pub title: String,
}

impl WatchDraft {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let title = crate::url_check::domain_of(&url);
        Self { url, title }
    }
}

/// What a live view is showing: a stored watch or an unsaved draft.
///
/// Drafts carry no id, so no delete or scan request can be built from one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchRecord {
    Persisted(Watch),
    Draft(WatchDraft),
}

impl WatchRecord {
    pub fn url(&self) -> &str {
        match self {
            WatchRecord::Persisted(watch) => &watch.url,
            WatchRecord::Draft(draft) => &draft.url,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            WatchRecord::Persisted(watch) => &watch.title,
            WatchRecord::Draft(draft) => &draft.title,
        }
    }

    pub fn persisted(&self) -> Option<&Watch> {
        match self {
            WatchRecord::Persisted(watch) => Some(watch),
            WatchRecord::Draft(_) => None,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, WatchRecord::Draft(_))
    }
}
