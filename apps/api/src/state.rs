use std::time::Duration;

use crate::config::Config;
use crate::onboarding::drafts::DraftStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone, Default)]
pub struct AppState {
    /// In-memory onboarding drafts, keyed by user id. Lost on restart.
    pub drafts: DraftStore,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            drafts: DraftStore::new(
                config.draft_max_users,
                Duration::from_secs(config.draft_idle_secs),
            ),
        }
    }
}
