use std::time::Duration;

use crate::model::{ScanHistory, ScanId, Watch, WatchTimeline};

/// Wait between a successful scan trigger and the timeline refetch.
///
/// This is a fixed guess, not a completion signal: the scan may still be
/// running when the refetch lands, in which case the refetch shows no new
/// entry.
pub const SCAN_REFRESH_DELAY: Duration = Duration::from_secs(2);

/// A loaded timeline plus the entry the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    watch: Watch,
    category: Option<String>,
    entries: Vec<ScanHistory>,
    total_scans: u64,
    selected: Option<ScanId>,
}

impl Timeline {
    /// Selects the newest entry.
    pub fn from_response(response: WatchTimeline) -> Self {
        let response = response.reconciled();
        let document = response.document;
        let selected = document.scan_history.first().map(|e| e.id.clone());
        Self {
            watch: document.watch,
            category: document.category,
            entries: document.scan_history,
            total_scans: response.total_scans,
            selected,
        }
    }

    pub fn watch(&self) -> &Watch {
        &self.watch
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn entries(&self) -> &[ScanHistory] {
        &self.entries
    }

    pub fn total_scans(&self) -> u64 {
        self.total_scans
    }

    pub fn selected_id(&self) -> Option<&ScanId> {
        self.selected.as_ref()
    }

    pub fn selected_entry(&self) -> Option<&ScanHistory> {
        let selected = self.selected.as_ref()?;
        self.entries.iter().find(|e| &e.id == selected)
    }

    /// Local selection change. Unknown ids are ignored.
    pub fn select(&mut self, id: &ScanId) -> bool {
        if self.selected.as_ref() == Some(id) || !self.entries.iter().any(|e| &e.id == id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    /// Replaces the entries with a refetched timeline.
    ///
    /// The newest entry is promoted only while the selection follows the head
    /// of the list: nothing selected, the old newest entry selected, or the
    /// selected entry gone. A user who picked an older entry keeps it.
    pub fn refresh(&mut self, response: WatchTimeline) {
        let previous_head = self.entries.first().map(|e| e.id.clone());
        let next = Timeline::from_response(response);

        let follows_head = match &self.selected {
            None => true,
            Some(selected) => {
                previous_head.as_ref() == Some(selected)
                    || !next.entries.iter().any(|e| &e.id == selected)
            }
        };

        let selected = if follows_head {
            next.selected.clone()
        } else {
            self.selected.take()
        };

        *self = Timeline { selected, ..next };
    }
}
