//! Best-effort retrieval of recent rows for answering context.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::store::{LogQuery, LogRow, LogStore};

/// Fetches a bounded window of recent rows from the log store.
///
/// This is a context source, not a critical path: with no store configured
/// it returns nothing, and any store failure is logged and swallowed. The
/// caller always gets a well-formed (possibly empty) row list.
pub struct ContextFetcher {
    store: Option<Arc<dyn LogStore>>,
    max_rows: u32,
}

impl ContextFetcher {
    /// Create a fetcher. `store: None` yields a fetcher that always returns
    /// empty context.
    #[must_use]
    pub fn new(store: Option<Arc<dyn LogStore>>, max_rows: u32) -> Self {
        Self { store, max_rows }
    }

    /// Whether a store backend is configured at all.
    #[must_use]
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Fetch rows newer than `since_days` days ago, newest first, capped at
    /// the configured maximum. `service` scopes the query case-insensitively
    /// when present (an empty string is a real filter, not "no filter").
    pub async fn fetch(&self, service: Option<&str>, since_days: i64) -> Vec<LogRow> {
        let Some(store) = &self.store else {
            debug!("No log store configured, returning empty context");
            return Vec::new();
        };

        let query = LogQuery {
            service: service.map(ToString::to_string),
            start: window_start(Utc::now(), since_days),
            limit: self.max_rows,
        };

        match store.query(&query).await {
            Ok(mut rows) => {
                rows.truncate(self.max_rows as usize);
                debug!(rows = rows.len(), since_days, "Fetched context rows");
                rows
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch context rows, continuing without context");
                Vec::new()
            }
        }
    }
}

/// Inclusive lower bound of the lookback window. Oversized windows saturate
/// at the epoch floor instead of panicking.
fn window_start(now: DateTime<Utc>, since_days: i64) -> DateTime<Utc> {
    Duration::try_days(since_days.max(1))
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingStore {
        rows: Vec<LogRow>,
        fail: bool,
        last_query: Mutex<Option<LogQuery>>,
    }

    impl RecordingStore {
        fn with_rows(count: usize) -> Self {
            let rows = (0..count)
                .map(|i| {
                    let mut row = LogRow::new();
                    row.insert("service".to_string(), json!("auth"));
                    row.insert("summary".to_string(), json!(format!("row {i}")));
                    row
                })
                .collect();
            Self {
                rows,
                fail: false,
                last_query: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                rows: Vec::new(),
                fail: true,
                last_query: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LogStore for RecordingStore {
        async fn append(&self, _row: &LogRow) -> Result<(), StoreError> {
            Ok(())
        }

        async fn query(&self, query: &LogQuery) -> Result<Vec<LogRow>, StoreError> {
            *self.last_query.lock().unwrap() = Some(query.clone());
            if self.fail {
                Err(StoreError::Api("query blew up".to_string()))
            } else {
                Ok(self.rows.clone())
            }
        }
    }

    #[tokio::test]
    async fn no_store_means_empty_context() {
        let fetcher = ContextFetcher::new(None, 200);
        assert!(!fetcher.has_store());
        assert!(fetcher.fetch(Some("auth"), 7).await.is_empty());
    }

    #[tokio::test]
    async fn store_failure_degrades_to_empty() {
        let fetcher = ContextFetcher::new(Some(Arc::new(RecordingStore::failing())), 200);
        assert!(fetcher.fetch(None, 7).await.is_empty());
    }

    #[tokio::test]
    async fn result_is_capped_at_max_rows() {
        let fetcher = ContextFetcher::new(Some(Arc::new(RecordingStore::with_rows(10))), 3);
        let rows = fetcher.fetch(None, 7).await;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["summary"], json!("row 0"));
    }

    #[tokio::test]
    async fn query_window_and_service_are_forwarded() {
        let store = Arc::new(RecordingStore::with_rows(1));
        let fetcher = ContextFetcher::new(Some(store.clone()), 200);

        let before = Utc::now();
        fetcher.fetch(Some("Auth"), 3).await;
        let after = Utc::now();

        let query = store.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.service.as_deref(), Some("Auth"));
        assert_eq!(query.limit, 200);
        assert!(query.start >= before - Duration::days(3));
        assert!(query.start <= after - Duration::days(3));
    }

    #[tokio::test]
    async fn empty_service_filter_is_forwarded_not_dropped() {
        let store = Arc::new(RecordingStore::with_rows(0));
        let fetcher = ContextFetcher::new(Some(store.clone()), 200);
        fetcher.fetch(Some(""), 1).await;

        let query = store.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.service.as_deref(), Some(""));
    }

    #[test]
    fn oversized_windows_saturate() {
        let start = window_start(Utc::now(), i64::MAX);
        assert_eq!(start, DateTime::<Utc>::MIN_UTC);
    }
}
