//! HTTP surface of the alert relay.
//!
//! Wires the notification and ask pipelines behind three routes: a liveness
//! probe, structured alert ingestion, and the chat command endpoint.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod events;
pub mod ingest;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
