//! Wire framing: event blocks, types, and the stateful frame parser.

mod events;
mod parser;

pub use events::{classify, EventFrame, FrameKind, DEFAULT_EVENT_TYPE, DONE_SENTINEL};
pub use parser::FrameParser;
