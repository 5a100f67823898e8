//! Error types for the ask pipeline collaborators.

use thiserror::Error;

/// Errors from the log store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store API rejected the request
    #[error("Store API error: {0}")]
    Api(String),

    /// Response could not be interpreted
    #[error("Invalid store response: {0}")]
    InvalidResponse(String),
}

/// Errors from the answering model collaborator.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The model API rejected the request
    #[error("Model API error: {0}")]
    Api(String),

    /// The response carried no usable text
    #[error("Empty model response")]
    EmptyResponse,
}
