//! Terminal result of a streaming session.

use serde::{Deserialize, Serialize};

/// Structured outcome of one completed session.
///
/// Either parsed out of the stream's structured payload or synthesized from
/// the accumulated document when no structured payload could be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DebateResult {
    /// Session or debate title
    pub title: String,
    /// Full reconstructed debate text
    pub full_text: String,
    /// Sitting date, echoed from the request when the payload omits it
    pub date: String,
    /// Speaker, echoed from the request when the payload omits it
    pub speaker: String,
    /// Topic tags, normalized to a list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
