use std::time::Duration;

use crate::config::Config;
use crate::preview::sessions::PreviewSessions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Open preview sessions, each with its own fit monitor.
    pub previews: PreviewSessions,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let previews = PreviewSessions::new(
            Duration::from_secs(config.preview_session_ttl_secs),
            config.max_preview_sessions,
        );
        Self { config, previews }
    }
}
