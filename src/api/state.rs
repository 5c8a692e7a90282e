use std::sync::Arc;

use crate::config::Config;
use crate::embed::Orchestrator;
use crate::handlers::HandlerRegistry;
use crate::location::SearchSession;
use crate::observability::Metrics;
use crate::settings::SettingsStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<HandlerRegistry>,
    pub store: Arc<SettingsStore>,
    pub orchestrator: Arc<Orchestrator>,
    pub search: Arc<SearchSession>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        registry: Arc<HandlerRegistry>,
        store: SettingsStore,
        orchestrator: Arc<Orchestrator>,
        search: Arc<SearchSession>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            config,
            registry,
            store: Arc::new(store),
            orchestrator,
            search,
            metrics,
        }
    }
}
