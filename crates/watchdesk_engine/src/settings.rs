use std::time::Duration;

/// Where the backends live and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Root of the watch store, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Conversational assistant endpoint. Chat is unavailable without it.
    pub assistant_url: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Timeout for the frame-embeddability probe.
    pub probe_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            assistant_url: None,
            connect_timeout: Duration::from_secs(10),
            // Create-and-scan waits for the first scan to finish.
            request_timeout: Duration::from_secs(120),
            probe_timeout: Duration::from_secs(10),
        }
    }
}
