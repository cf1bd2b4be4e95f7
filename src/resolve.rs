//! Terminal resolution: turning an ended stream into one structured result.
//!
//! Resolution is attempted in order - a fenced JSON block anywhere in the
//! accumulated document, then the widest `{...}` substring - and falls back
//! to a synthesized result built from the cumulative text and the original
//! request. A dedicated `final` event payload is parsed directly instead.

use serde_json::Value;

use crate::error::SessionError;
use crate::models::{DebateRequest, DebateResult};
use crate::sanitize::{self, TEXT_FIELD_PRIORITY};

/// Title used when neither the stream nor the payload provided one.
pub const DEFAULT_TITLE: &str = "Full Debate";

/// How a `final` event with an unparseable payload is handled.
///
/// The upstream historically swallowed such failures and kept streaming;
/// strict mode surfaces them as a terminal error instead and is the
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverMode {
    /// Unparseable `final` payload ends the session with an error.
    #[default]
    Strict,
    /// Unparseable `final` payload is logged and the stream continues.
    Lenient,
}

/// Resolve the accumulated document into the terminal result.
///
/// Never fails: when no structured payload can be recovered the result is
/// synthesized from the document and the request.
pub fn resolve_document(document: &str, request: &DebateRequest) -> DebateResult {
    if let Some(inner) = sanitize::fenced_inner(document) {
        if let Ok(value) = serde_json::from_str::<Value>(&inner) {
            if let Some(result) = result_from_value(&value, request) {
                return result;
            }
        }
    }

    if let (Some(start), Some(end)) = (document.find('{'), document.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&document[start..=end]) {
                if let Some(result) = result_from_value(&value, request) {
                    return result;
                }
            }
        }
    }

    synthesize_default(document, request)
}

/// Parse the payload of a `final` event directly.
pub fn parse_final_payload(
    data: &str,
    request: &DebateRequest,
) -> Result<DebateResult, SessionError> {
    let value: Value = serde_json::from_str(data).map_err(|err| SessionError::FinalParse {
        message: err.to_string(),
    })?;
    result_from_value(&value, request).ok_or_else(|| SessionError::FinalParse {
        message: "payload has no title or text field".to_string(),
    })
}

/// Build a result from a parsed payload, echoing request fields where the
/// payload is silent. Returns `None` when the payload carries neither a
/// title nor any recognizable text field.
pub fn result_from_value(value: &Value, request: &DebateRequest) -> Option<DebateResult> {
    let map = value.as_object()?;

    let title = map
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);
    let full_text = TEXT_FIELD_PRIORITY
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::to_string);

    if title.is_none() && full_text.is_none() {
        return None;
    }

    Some(DebateResult {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        full_text: full_text.unwrap_or_default(),
        date: string_field(map, "date").unwrap_or_else(|| request.date.clone()),
        speaker: string_field(map, "speaker").unwrap_or_else(|| request.speaker.clone()),
        tags: normalize_tags(map.get("tags")),
    })
}

/// Fallback result when nothing structured could be recovered.
pub fn synthesize_default(document: &str, request: &DebateRequest) -> DebateResult {
    DebateResult {
        title: DEFAULT_TITLE.to_string(),
        full_text: document.to_string(),
        date: request.date.clone(),
        speaker: request.speaker.clone(),
        tags: Vec::new(),
    }
}

/// Strip a leading case-insensitive `ERROR:` prefix from an error payload.
pub fn strip_error_prefix(data: &str) -> &str {
    let trimmed = data.trim();
    match trimmed.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("ERROR:") => trimmed[6..].trim_start(),
        _ => trimmed,
    }
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Tags arrive either as a JSON array of strings or as one comma-separated
/// string; both normalize to a list.
fn normalize_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}
