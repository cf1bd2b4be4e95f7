//! Event frame types and classification.

/// Payload marking normal end of stream, regardless of event type.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Event type assigned to blocks without an `event:` line.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// One parsed wire block: an event type and its data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFrame {
    /// Declared event type, `"message"` when the block had none
    pub event_type: String,
    /// Data payload, `data:` lines joined with newlines
    pub data: String,
}

impl EventFrame {
    /// Whether the payload is the `[DONE]` sentinel. Checked before the
    /// event type so the sentinel short-circuits under any type.
    pub fn is_done_sentinel(&self) -> bool {
        self.data == DONE_SENTINEL
    }
}

/// What the pipeline does with a frame of a given event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Document text: sanitize and accumulate (`message`, `doc`)
    Fragment,
    /// Terminal structured payload (`final`)
    Final,
    /// Explicit upstream error (`error`)
    Error,
    /// Unrecognized type, skipped
    Ignored,
}

/// Map an event type to its pipeline action.
pub fn classify(event_type: &str) -> FrameKind {
    match event_type {
        "message" | "doc" => FrameKind::Fragment,
        "final" => FrameKind::Final,
        "error" => FrameKind::Error,
        _ => FrameKind::Ignored,
    }
}
