//! Chunk sanitizer: raw data payload in, zero or one clean fragments out.
//!
//! The upstream generator wraps document text in several layers of runtime
//! syntax - fenced JSON, whole-payload JSON, `key='...'` wrappers, metadata
//! tokens injected mid-payload, literal escape sequences. The pipeline here
//! is an ordered sequence of pure steps, each exported and unit-tested on
//! its own.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Minimum fragment length after cleaning; anything shorter is noise.
const MIN_FRAGMENT_CHARS: usize = 2;

/// Candidate field names probed, in order, when a payload parses as a JSON
/// object. Inferred from observed upstream shapes; documented behavior, not
/// a contract.
pub const TEXT_FIELD_PRIORITY: [&str; 6] = [
    "content",
    "full_context",
    "full_text",
    "fullText",
    "summary",
    "text",
];

/// Runtime-metadata field names stripped wherever they appear in a payload.
pub const METADATA_FIELDS: [&str; 6] = [
    "session_id",
    "request_id",
    "trace_id",
    "seq",
    "timestamp",
    "metadata",
];

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fenced json pattern"));

static INLINE_WRAPPER_SINGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*[A-Za-z_][A-Za-z0-9_]*\s*=\s*'(.*)'\s*$").expect("single-quote wrapper")
});

static INLINE_WRAPPER_DOUBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^\s*[A-Za-z_][A-Za-z0-9_]*\s*=\s*"(.*)"\s*$"#).expect("double-quote wrapper")
});

static METADATA_TOKEN: Lazy<Regex> = Lazy::new(|| {
    // Values may be brace-delimited (possibly spanning lines), quoted, or
    // bare; unterminated trailing tokens of the same names are matched by
    // the \z alternatives.
    let names = METADATA_FIELDS.join("|");
    Regex::new(&format!(
        r#"(?i)[ \t]*[,;]?[ \t]*"?\b(?:{names})\b"?\s*[:=]\s*(?:\{{[^{{}}]*(?:\}}|\z)|"[^"]*(?:"|\z)|'[^']*(?:'|\z)|[^\s,;}}]*)[,;]?"#
    ))
    .expect("metadata token pattern")
});

static DANGLING_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*"[A-Za-z0-9_][A-Za-z0-9_ -]*"\s*:\s*"#).expect("dangling key"));

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("blank run pattern"));

/// Run one raw payload through the full pipeline.
///
/// Returns `None` when the payload reduces to noise (empty or shorter than
/// two characters) - such fragments are never appended.
pub fn sanitize_fragment(payload: &str) -> Option<String> {
    let unwrapped = if let Some(inner) = fenced_inner(payload) {
        match serde_json::from_str::<Value>(&inner) {
            Ok(value) => extract_text_value(&value)?,
            Err(_) => inner,
        }
    } else if let Some(value) = parse_whole_json(payload) {
        extract_text_value(&value)?
    } else if let Some(inner) = unwrap_inline_wrapper(payload) {
        inner
    } else {
        payload.to_string()
    };

    let stripped = strip_metadata_tokens(&unwrapped);
    let stripped = strip_leading_dangling_key(&stripped);
    let unescaped = unescape_literals(&stripped);
    let cleaned = collapse_blank_runs(&unescaped);

    if cleaned.chars().count() < MIN_FRAGMENT_CHARS {
        None
    } else {
        Some(cleaned)
    }
}

/// Inner text of the first ```json fenced block, if any.
pub(crate) fn fenced_inner(payload: &str) -> Option<String> {
    FENCED_JSON
        .captures(payload)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse the whole payload as JSON, accepting only objects and strings.
fn parse_whole_json(payload: &str) -> Option<Value> {
    let value = serde_json::from_str::<Value>(payload.trim()).ok()?;
    matches!(value, Value::Object(_) | Value::String(_)).then_some(value)
}

/// Pull document text out of a parsed payload.
///
/// Strings are their own text. Objects are probed with
/// [`TEXT_FIELD_PRIORITY`], then fall back to the first string-valued field
/// that is not runtime metadata.
pub fn extract_text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            for key in TEXT_FIELD_PRIORITY {
                if let Some(Value::String(s)) = map.get(key) {
                    return Some(s.clone());
                }
            }
            map.iter().find_map(|(key, value)| {
                if is_metadata_field(key) {
                    return None;
                }
                value.as_str().map(str::to_string)
            })
        }
        _ => None,
    }
}

fn is_metadata_field(key: &str) -> bool {
    METADATA_FIELDS.contains(&key) || matches!(key, "type" | "event" | "id")
}

/// Unwrap a whole-payload `key='...'` or `key="..."` wrapper.
pub fn unwrap_inline_wrapper(payload: &str) -> Option<String> {
    INLINE_WRAPPER_SINGLE
        .captures(payload)
        .or_else(|| INLINE_WRAPPER_DOUBLE.captures(payload))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Remove deny-listed runtime-metadata key/value tokens.
pub fn strip_metadata_tokens(text: &str) -> String {
    METADATA_TOKEN.replace_all(text, "").into_owned()
}

/// Drop a dangling `"key":` artifact at the very start of the payload.
pub fn strip_leading_dangling_key(text: &str) -> String {
    DANGLING_KEY.replace(text, "").into_owned()
}

/// Turn literal escape sequences into the characters they name.
pub fn unescape_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Collapse runs of three or more line breaks to exactly two and trim.
pub fn collapse_blank_runs(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    BLANK_RUN.replace_all(&normalized, "\n\n").trim().to_string()
}
