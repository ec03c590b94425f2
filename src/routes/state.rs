use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    db::Store,
    pagination::MaxPageLimit,
    services::{LogNotifier, Notifier, PreferenceDefaults, Recommender, TokenIssuer},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    pub tokens: TokenIssuer,
    pub notifier: Arc<dyn Notifier>,
    pub recommender: Recommender,
}

impl AppState {
    /// State over `store`, delivering share messages through the log
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs);
        let recommender = Recommender::new(PreferenceDefaults::from(&config));
        Self {
            store,
            config: Arc::new(config),
            tokens,
            notifier: Arc::new(LogNotifier),
            recommender,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

impl FromRef<AppState> for MaxPageLimit {
    fn from_ref(state: &AppState) -> Self {
        MaxPageLimit(state.config.max_page_limit)
    }
}
