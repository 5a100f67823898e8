//! Inline filter extraction from free-text commands.
//!
//! `/ask` text may embed `service:<name>` and `since:<days>` tokens anywhere
//! in the question. Whitespace is the only tokenizer: a token either is a
//! filter (matched by case-insensitive prefix at the token start) or it is
//! part of the question, verbatim and in order.

/// A free-text command split into its question and structured filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The question with all filter tokens removed, whitespace-trimmed.
    /// May be empty.
    pub question: String,
    /// Service filter, case preserved as given. `Some("")` (a bare
    /// `service:` token) is distinct from `None`: it still scopes the query.
    pub service: Option<String>,
    /// Lookback window in days, always >= 1.
    pub since_days: i64,
}

/// Split command text into a question plus `service`/`since` filters.
///
/// Later filter tokens overwrite earlier ones; a `since:` value that does
/// not parse as an integer is ignored and the current value kept. The
/// function is total: any input yields a well-formed command.
///
/// Example: `"why did it fail? service:rag-service since:3"` parses to the
/// question `"why did it fail?"`, service `rag-service`, window 3 days.
#[must_use]
pub fn parse_filters(text: &str, default_since_days: i64) -> ParsedCommand {
    let mut service = None;
    let mut since_days = default_since_days.max(1);

    let mut parts: Vec<&str> = Vec::new();
    for token in text.split_whitespace() {
        if has_prefix_ignore_case(token, "service:") {
            // Remainder keeps the original casing; only the prefix match
            // is case-insensitive.
            service = Some(token["service:".len()..].to_string());
        } else if has_prefix_ignore_case(token, "since:") {
            if let Ok(days) = token["since:".len()..].parse::<i64>() {
                since_days = days.max(1);
            }
        } else {
            parts.push(token);
        }
    }

    ParsedCommand {
        question: parts.join(" ").trim().to_string(),
        service,
        since_days,
    }
}

/// ASCII case-insensitive prefix test that never splits a UTF-8 boundary.
fn has_prefix_ignore_case(token: &str, prefix: &str) -> bool {
    token
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_question_passes_through() {
        let cmd = parse_filters("why is auth failing?", 7);
        assert_eq!(cmd.question, "why is auth failing?");
        assert_eq!(cmd.service, None);
        assert_eq!(cmd.since_days, 7);
    }

    #[test]
    fn service_and_since_are_extracted() {
        let cmd = parse_filters("why fail? service:auth since:3", 7);
        assert_eq!(cmd.question, "why fail?");
        assert_eq!(cmd.service.as_deref(), Some("auth"));
        assert_eq!(cmd.since_days, 3);
    }

    #[test]
    fn empty_service_is_distinct_from_absent_and_bad_since_is_ignored() {
        let cmd = parse_filters("service: since:abc test", 7);
        assert_eq!(cmd.question, "test");
        assert_eq!(cmd.service.as_deref(), Some(""));
        assert_eq!(cmd.since_days, 7);
    }

    #[test]
    fn since_is_clamped_to_one() {
        let cmd = parse_filters("since:0 ping", 7);
        assert_eq!(cmd.question, "ping");
        assert_eq!(cmd.service, None);
        assert_eq!(cmd.since_days, 1);

        let cmd = parse_filters("since:-5 ping", 7);
        assert_eq!(cmd.since_days, 1);
    }

    #[test]
    fn last_filter_occurrence_wins() {
        let cmd = parse_filters("service:a service:B since:2 since:9 q", 7);
        assert_eq!(cmd.service.as_deref(), Some("B"));
        assert_eq!(cmd.since_days, 9);
        assert_eq!(cmd.question, "q");
    }

    #[test]
    fn invalid_since_does_not_reset_an_earlier_valid_one() {
        let cmd = parse_filters("since:4 since:oops q", 7);
        assert_eq!(cmd.since_days, 4);
    }

    #[test]
    fn filter_prefix_is_case_insensitive_but_value_casing_survives() {
        let cmd = parse_filters("SERVICE:Auth-API SINCE:2 what happened", 7);
        assert_eq!(cmd.service.as_deref(), Some("Auth-API"));
        assert_eq!(cmd.since_days, 2);
        assert_eq!(cmd.question, "what happened");
    }

    #[test]
    fn empty_input_yields_defaults() {
        let cmd = parse_filters("", 7);
        assert_eq!(cmd.question, "");
        assert_eq!(cmd.service, None);
        assert_eq!(cmd.since_days, 7);

        let cmd = parse_filters("   \t  ", 7);
        assert_eq!(cmd.question, "");
    }

    #[test]
    fn prefix_match_only_applies_at_token_start() {
        let cmd = parse_filters("the word microservice:alpha stays", 7);
        assert_eq!(cmd.question, "the word microservice:alpha stays");
        assert_eq!(cmd.service, None);
    }

    #[test]
    fn reparse_of_reconstructed_question_is_idempotent() {
        let first = parse_filters("Why did RAG   ingestion fail today? since:3", 7);
        let second = parse_filters(&first.question, 7);
        assert_eq!(second.question, first.question);
        assert_eq!(second.service, None);
        assert_eq!(second.since_days, 7);
    }
}
