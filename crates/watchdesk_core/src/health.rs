use crate::model::{LatestScan, Watch};

/// Visual health of a watch, derived from its latest scan only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Health {
    NoScan,
    Stable,
    Minor,
    Moderate,
    Major,
}

impl Health {
    /// Recomputed on every view build; `latest_scan` may change under an
    /// already rendered row after a background scan.
    pub fn of(watch: &Watch) -> Self {
        Self::from_scan(watch.latest_scan.as_ref())
    }

    pub fn from_scan(scan: Option<&LatestScan>) -> Self {
        let Some(scan) = scan else {
            return Health::NoScan;
        };
        if !scan.changes {
            return Health::Stable;
        }
        let level = scan
            .change_level
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match level.as_str() {
            "major" | "high" => Health::Major,
            "moderate" | "medium" => Health::Moderate,
            _ => Health::Minor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Health::NoScan => "No scan",
            Health::Stable => "Stable",
            Health::Minor => "Minor changes",
            Health::Moderate => "Moderate changes",
            Health::Major => "Major changes",
        }
    }

    /// Tooltip text: the change summary when there is one.
    pub fn describe(self, scan: Option<&LatestScan>) -> String {
        let summary = scan
            .and_then(|s| s.change_summary.as_deref())
            .filter(|s| !s.trim().is_empty());
        match self {
            Health::NoScan => "No scans available yet".to_string(),
            Health::Stable => "No changes detected".to_string(),
            Health::Minor => summary.unwrap_or("Minor changes detected").to_string(),
            Health::Moderate => summary.unwrap_or("Moderate changes detected").to_string(),
            Health::Major => summary.unwrap_or("Major changes detected").to_string(),
        }
    }

    /// True for the neutral/warning treatment.
    pub fn needs_attention(self) -> bool {
        matches!(self, Health::NoScan | Health::Moderate | Health::Major)
    }
}

/// Badge treatment for the free-form `status` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    Default,
    Secondary,
    Destructive,
    Outline,
}

impl StatusTone {
    pub fn for_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "active" => StatusTone::Default,
            "paused" => StatusTone::Secondary,
            "error" => StatusTone::Destructive,
            _ => StatusTone::Outline,
        }
    }
}
