//! Request parameters for a streaming debate session.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Parameters sent as the JSON body of the streaming POST.
///
/// The backend keys a debate by sitting date, and optionally narrows it by
/// topic and speaker. The date is the only required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateRequest {
    /// Sitting date, e.g. "1st July 2025"
    pub date: String,
    /// Debate topic filter, may be empty
    #[serde(default)]
    pub topic: String,
    /// Speaker filter, may be empty
    #[serde(default)]
    pub speaker: String,
}

impl DebateRequest {
    /// Create a request for a full sitting on the given date.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            topic: String::new(),
            speaker: String::new(),
        }
    }

    /// Narrow the request to a topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Narrow the request to a speaker.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = speaker.into();
        self
    }

    /// Check that the request can be sent upstream.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.date.trim().is_empty() {
            return Err(SessionError::InvalidRequest {
                message: "date must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_date_only() {
        let request = DebateRequest::new("1st July 2025");
        assert_eq!(request.date, "1st July 2025");
        assert!(request.topic.is_empty());
        assert!(request.speaker.is_empty());
    }

    #[test]
    fn test_builder_methods() {
        let request = DebateRequest::new("1st July 2025")
            .with_topic("Budget")
            .with_speaker("Hon. Jane Mensah");
        assert_eq!(request.topic, "Budget");
        assert_eq!(request.speaker, "Hon. Jane Mensah");
    }

    #[test]
    fn test_validate_requires_date() {
        let request = DebateRequest::new("  ");
        assert!(request.validate().is_err());

        let request = DebateRequest::new("12 January 2024");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_serializes_to_wire_body() {
        let request = DebateRequest::new("12 January 2024").with_topic("Climate");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["date"], "12 January 2024");
        assert_eq!(json["topic"], "Climate");
        assert_eq!(json["speaker"], "");
    }
}
