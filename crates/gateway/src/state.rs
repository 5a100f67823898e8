//! Shared application state: the capability set decided once at startup.

use std::sync::Arc;

use ask::{
    AnswerComposer, BigQueryConfig, BigQueryStore, ContextFetcher, GeminiConfig, GeminiProvider,
    LogStore,
};
use notify::{ChatChannel, Notifier};
use tracing::info;

use crate::config::Config;

/// Read-only collaborators shared by all request handlers.
///
/// Availability of each collaborator is decided here, once, from
/// configuration; handlers only ever see the materialized capability.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifier: Arc<Notifier>,
    pub store: Option<Arc<dyn LogStore>>,
    pub fetcher: Arc<ContextFetcher>,
    pub composer: Arc<AnswerComposer>,
}

impl AppState {
    /// Build the full collaborator set from configuration.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let notifier = Notifier::with_channels(vec![Arc::new(ChatChannel::new(
            &config.chat_webhook_url,
        ))]);

        let store: Option<Arc<dyn LogStore>> = config.project.as_ref().map(|project| {
            let mut bq = BigQueryConfig::new(project, &config.bq_dataset, &config.bq_table);
            bq.access_token = config.access_token.clone();
            bq.ts_column = config.ask_ts_column.clone();
            bq.service_column = config.ask_service_column.clone();
            if let Some(base_url) = &config.bigquery_base_url {
                bq.base_url = base_url.clone();
            }
            Arc::new(BigQueryStore::new(bq)) as Arc<dyn LogStore>
        });

        let provider = config.project.as_ref().map(|project| {
            let mut gemini =
                GeminiConfig::new(project, &config.vertex_location, &config.vertex_model);
            gemini.access_token = config.access_token.clone();
            if let Some(base_url) = &config.vertex_base_url {
                gemini.base_url = base_url.clone();
            }
            Arc::new(GeminiProvider::new(gemini)) as Arc<dyn ask::AnswerProvider>
        });

        info!(
            store = store.is_some(),
            model = provider.is_some(),
            notifications = !config.chat_webhook_url.is_empty(),
            "Collaborators initialized"
        );

        let fetcher = Arc::new(ContextFetcher::new(store.clone(), config.ask_max_rows));
        let composer = Arc::new(AnswerComposer::new(provider));

        Self {
            config: Arc::new(config),
            notifier: Arc::new(notifier),
            store,
            fetcher,
            composer,
        }
    }
}
