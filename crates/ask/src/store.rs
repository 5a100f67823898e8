//! Log store collaborator: append alert rows, query them by time range.
//!
//! The production store is a BigQuery table driven over the plain REST API
//! (`tabledata.insertAll` for writes, `jobs.query` for reads). The store is
//! strictly a collaborator: callers own defaulting, clamping and degradation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::StoreError;

/// One stored record, an open-ended mapping of column name to value.
pub type LogRow = Map<String, Value>;

/// A time-bounded, optionally service-scoped row query.
#[derive(Debug, Clone)]
pub struct LogQuery {
    /// Case-insensitive service equality filter. `Some("")` scopes the
    /// query to an empty service name; `None` applies no service filter.
    pub service: Option<String>,
    /// Inclusive lower bound on the timestamp column (UTC).
    pub start: DateTime<Utc>,
    /// Maximum number of rows to return, newest first.
    pub limit: u32,
}

/// Trait for the structured log store.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append a single row.
    async fn append(&self, row: &LogRow) -> Result<(), StoreError>;

    /// Fetch rows matching the query, ordered newest first.
    async fn query(&self, query: &LogQuery) -> Result<Vec<LogRow>, StoreError>;
}

/// Default BigQuery REST endpoint.
const DEFAULT_BIGQUERY_URL: &str = "https://bigquery.googleapis.com";

/// Configuration for the BigQuery-backed store.
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    /// Base URL for the BigQuery API (override for emulators and tests).
    pub base_url: String,
    /// Cloud project owning the dataset.
    pub project: String,
    /// Dataset name.
    pub dataset: String,
    /// Table name.
    pub table: String,
    /// OAuth bearer token; requests go out unauthenticated without one.
    pub access_token: Option<String>,
    /// Name of the timestamp column.
    pub ts_column: String,
    /// Name of the service column.
    pub service_column: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl BigQueryConfig {
    /// Config for the real BigQuery endpoint with default column names.
    #[must_use]
    pub fn new(project: &str, dataset: &str, table: &str) -> Self {
        Self {
            base_url: DEFAULT_BIGQUERY_URL.to_string(),
            project: project.to_string(),
            dataset: dataset.to_string(),
            table: table.to_string(),
            access_token: None,
            ts_column: "ts".to_string(),
            service_column: "service".to_string(),
            timeout_secs: 30,
        }
    }
}

/// BigQuery-backed [`LogStore`].
pub struct BigQueryStore {
    config: BigQueryConfig,
    client: reqwest::Client,
}

impl BigQueryStore {
    /// Create a store with the given configuration.
    #[must_use]
    pub fn new(config: BigQueryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Build the parameterized row query. Column and table names are
    /// configuration, not user input; values travel as named parameters.
    fn build_query(&self, query: &LogQuery) -> QueryRequest {
        let table_id = format!(
            "`{}.{}.{}`",
            self.config.project, self.config.dataset, self.config.table
        );
        let ts = &self.config.ts_column;

        let mut where_clauses = vec![format!("{ts} >= @start")];
        let mut parameters = vec![QueryParameter::timestamp("start", query.start)];

        if let Some(service) = &query.service {
            where_clauses.push(format!(
                "LOWER({}) = LOWER(@service)",
                self.config.service_column
            ));
            parameters.push(QueryParameter::string("service", service));
        }

        let sql = format!(
            "SELECT * FROM {table_id} WHERE {} ORDER BY {ts} DESC LIMIT {}",
            where_clauses.join(" AND "),
            query.limit
        );

        QueryRequest {
            query: sql,
            use_legacy_sql: false,
            parameter_mode: "NAMED".to_string(),
            query_parameters: parameters,
        }
    }
}

#[async_trait]
impl LogStore for BigQueryStore {
    async fn append(&self, row: &LogRow) -> Result<(), StoreError> {
        let url = format!(
            "{}/bigquery/v2/projects/{}/datasets/{}/tables/{}/insertAll",
            self.config.base_url.trim_end_matches('/'),
            self.config.project,
            self.config.dataset,
            self.config.table
        );

        let body = InsertAllRequest {
            rows: vec![InsertRow { json: row.clone() }],
        };

        debug!(table = %self.config.table, "Appending row to BigQuery");

        let response = self.authorized(self.client.post(&url)).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(format!(
                "insertAll returned {status}: {body}"
            )));
        }

        let result: InsertAllResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        if let Some(errors) = result.insert_errors {
            if !errors.is_empty() {
                return Err(StoreError::Api(format!(
                    "insertAll reported {} row error(s): {}",
                    errors.len(),
                    serde_json::to_string(&errors).unwrap_or_default()
                )));
            }
        }

        Ok(())
    }

    async fn query(&self, query: &LogQuery) -> Result<Vec<LogRow>, StoreError> {
        let url = format!(
            "{}/bigquery/v2/projects/{}/queries",
            self.config.base_url.trim_end_matches('/'),
            self.config.project
        );

        let request = self.build_query(query);

        debug!(
            start = %query.start,
            service = ?query.service,
            limit = query.limit,
            "Querying BigQuery"
        );

        let response = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(format!(
                "jobs.query returned {status}: {body}"
            )));
        }

        let result: QueryResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        let columns: Vec<String> = result
            .schema
            .map(|s| s.fields.into_iter().map(|f| f.name).collect())
            .unwrap_or_default();

        // Zip each row's cells with the schema columns into an open map.
        let mut rows = Vec::new();
        for raw in result.rows.unwrap_or_default() {
            let mut row = LogRow::new();
            for (column, cell) in columns.iter().zip(raw.f) {
                row.insert(column.clone(), cell.v);
            }
            rows.push(row);
        }

        debug!(rows = rows.len(), "Retrieved rows from BigQuery");
        Ok(rows)
    }
}

// =============================================================================
// BigQuery API types
// =============================================================================

#[derive(Debug, Serialize)]
struct InsertAllRequest {
    rows: Vec<InsertRow>,
}

#[derive(Debug, Serialize)]
struct InsertRow {
    json: LogRow,
}

#[derive(Debug, Deserialize)]
struct InsertAllResponse {
    #[serde(rename = "insertErrors")]
    insert_errors: Option<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct QueryRequest {
    query: String,
    #[serde(rename = "useLegacySql")]
    use_legacy_sql: bool,
    #[serde(rename = "parameterMode")]
    parameter_mode: String,
    #[serde(rename = "queryParameters")]
    query_parameters: Vec<QueryParameter>,
}

#[derive(Debug, Serialize)]
struct QueryParameter {
    name: String,
    #[serde(rename = "parameterType")]
    parameter_type: ParameterType,
    #[serde(rename = "parameterValue")]
    parameter_value: ParameterValue,
}

impl QueryParameter {
    fn timestamp(name: &str, value: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            parameter_type: ParameterType {
                kind: "TIMESTAMP".to_string(),
            },
            parameter_value: ParameterValue {
                value: value.to_rfc3339(),
            },
        }
    }

    fn string(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            parameter_type: ParameterType {
                kind: "STRING".to_string(),
            },
            parameter_value: ParameterValue {
                value: value.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ParameterType {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize)]
struct ParameterValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    schema: Option<QuerySchema>,
    rows: Option<Vec<QueryRow>>,
}

#[derive(Debug, Deserialize)]
struct QuerySchema {
    fields: Vec<QueryField>,
}

#[derive(Debug, Deserialize)]
struct QueryField {
    name: String,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    f: Vec<QueryCell>,
}

#[derive(Debug, Deserialize)]
struct QueryCell {
    #[serde(default)]
    v: Value,
}
