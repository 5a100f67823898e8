//! Free-text command parsing and bounded context retrieval.
//!
//! This crate is the `/ask` pipeline of the alert relay: raw command text is
//! split into a question plus inline filters, the filters become a
//! time-bounded store query, and the retrieved rows are folded into a
//! bounded prompt for the answering model.
//!
//! ```text
//! raw text → parse_filters → ContextFetcher::fetch → AnswerComposer::compose
//! ```
//!
//! Every stage degrades rather than fails: parsing is total, fetching
//! returns empty context on any store problem, and composition falls back to
//! deterministic text when the model is missing or erroring.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compose;
pub mod error;
pub mod fetcher;
pub mod filters;
pub mod provider;
pub mod store;

pub use compose::AnswerComposer;
pub use error::{ProviderError, StoreError};
pub use fetcher::ContextFetcher;
pub use filters::{parse_filters, ParsedCommand};
pub use provider::{AnswerProvider, GeminiConfig, GeminiProvider};
pub use store::{BigQueryConfig, BigQueryStore, LogQuery, LogRow, LogStore};
