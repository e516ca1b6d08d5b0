//! Optional generative-synthesis seam for the planner node.
//!
//! A [`Synthesizer`] produces free-text narrative for the assembled plan.
//! Its output is untrusted: it must parse into [`SynthesisDraft`] with
//! exactly the expected number of days before the planner accepts any of
//! it. A draft that fails validation is recorded and discarded; the
//! deterministic rendering always stands ready underneath.

use async_trait::async_trait;
use serde::Deserialize;

use crate::tools::ToolError;
use crate::workflow::PlanState;

/// Narrative generator consulted by the planner node, typically backed by
/// an LLM. Implementations own their transport and credentials.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Produce a draft for the given state. The returned text should be a
    /// JSON document matching [`SynthesisDraft`]; anything else is rejected
    /// during validation.
    async fn draft(&self, state: &PlanState) -> Result<String, ToolError>;
}

/// Validated shape of a synthesis response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SynthesisDraft {
    pub overview: String,
    pub days: Vec<DayDraft>,
}

/// One day of a synthesis response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DayDraft {
    pub title: String,
    #[serde(default)]
    pub schedule: Vec<String>,
}

/// Parse and validate raw synthesizer output.
///
/// Strips Markdown code fences (generative backends habitually wrap JSON in
/// them), requires a well-formed document, and requires exactly
/// `expected_days` day drafts with non-empty titles.
pub fn parse_draft(raw: &str, expected_days: usize) -> Result<SynthesisDraft, String> {
    let trimmed = strip_fences(raw.trim());
    if trimmed.is_empty() {
        return Err("empty synthesis response".into());
    }

    let draft: SynthesisDraft =
        serde_json::from_str(trimmed).map_err(|e| format!("malformed synthesis response: {e}"))?;

    if draft.days.len() != expected_days {
        return Err(format!(
            "synthesis produced {} days, expected {expected_days}",
            draft.days.len()
        ));
    }
    if draft.days.iter().any(|day| day.title.trim().is_empty()) {
        return Err("synthesis produced a day with an empty title".into());
    }

    Ok(draft)
}

fn strip_fences(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix("```") else {
        return raw;
    };
    // Drop the info string ("json", "JSON", ...) on the opening fence.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_json() {
        let raw = r#"{"overview": "Three days by the lake.", "days": [
            {"title": "Arrival", "schedule": ["Morning: West Lake"]},
            {"title": "Museums", "schedule": []},
            {"title": "Departure"}
        ]}"#;
        let draft = parse_draft(raw, 3).unwrap();
        assert_eq!(draft.overview, "Three days by the lake.");
        assert_eq!(draft.days[0].schedule.len(), 1);
        assert!(draft.days[2].schedule.is_empty());
    }

    #[test]
    fn strips_code_fences() {
        let raw = "```json\n{\"overview\": \"ok\", \"days\": [{\"title\": \"Day one\"}]}\n```";
        let draft = parse_draft(raw, 1).unwrap();
        assert_eq!(draft.overview, "ok");
    }

    #[test]
    fn rejects_wrong_day_count() {
        let raw = r#"{"overview": "ok", "days": [{"title": "Only day"}]}"#;
        let err = parse_draft(raw, 3).unwrap_err();
        assert!(err.contains("expected 3"));
    }

    #[test]
    fn rejects_non_json_and_empty() {
        assert!(parse_draft("a lovely trip awaits", 2).is_err());
        assert!(parse_draft("", 2).is_err());
        assert!(parse_draft("```json\n```", 2).is_err());
    }

    #[test]
    fn rejects_blank_titles() {
        let raw = r#"{"overview": "ok", "days": [{"title": "  "}]}"#;
        assert!(parse_draft(raw, 1).is_err());
    }
}
