//! Bounded prompt assembly and answer composition.

use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::provider::AnswerProvider;
use crate::store::LogRow;

/// Hard cap on rows serialized into the prompt, independent of (and usually
/// tighter than) the fetch cap.
const PROMPT_ROW_LIMIT: usize = 50;

/// Fixed system instruction prefixed to every prompt.
const SYSTEM_INSTRUCTION: &str = "You are a reliability assistant. Use the provided recent logs \
     to answer the user's question. Cite services, time ranges, and themes if visible; \
     be concise and actionable.";

/// Builds a bounded prompt from question plus context rows and invokes the
/// answering model.
///
/// Callers never see a hard failure: an unconfigured provider yields a
/// deterministic fallback, a provider failure yields a descriptive string.
pub struct AnswerComposer {
    provider: Option<Arc<dyn AnswerProvider>>,
}

impl AnswerComposer {
    /// Create a composer. `provider: None` yields fallback-only answers.
    #[must_use]
    pub fn new(provider: Option<Arc<dyn AnswerProvider>>) -> Self {
        Self { provider }
    }

    /// Whether an answering model is configured.
    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Compose an answer for `question` grounded in `rows`.
    pub async fn compose(&self, question: &str, rows: &[LogRow]) -> String {
        let prompt = build_prompt(question, rows);

        let Some(provider) = &self.provider else {
            return format!(
                "(model not configured) Based on recent rows ({} found), \
                 no major anomalies detected. Question: {question}",
                rows.len()
            );
        };

        match provider.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "Answer generation failed");
                format!("(model error: {e})")
            }
        }
    }
}

/// Assemble the full prompt: system instruction, truncated rows as compact
/// JSON, then the verbatim question.
fn build_prompt(question: &str, rows: &[LogRow]) -> String {
    let bounded = &rows[..rows.len().min(PROMPT_ROW_LIMIT)];
    let snippets = if bounded.is_empty() {
        "[]".to_string()
    } else {
        let values: Vec<Value> = bounded.iter().cloned().map(Value::Object).collect();
        serde_json::to_string(&values).unwrap_or_else(|_| "[]".to_string())
    };

    format!(
        "{SYSTEM_INSTRUCTION}\n\nRecent rows JSON (truncated):\n{snippets}\n\nUser question:\n{question}"
    )
}
