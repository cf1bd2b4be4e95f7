//! Prelude module for convenient imports.
//!
//! Re-exports the types most callers need to run a streaming session:
//!
//! ```ignore
//! use hansard_stream::prelude::*;
//! ```

pub use crate::client::HansardClient;
pub use crate::config::ClientConfig;
pub use crate::error::SessionError;
pub use crate::models::{DebateRequest, DebateResult};
pub use crate::resolve::ResolverMode;
pub use crate::session::{SessionOutcome, SessionState, StreamSession};
pub use crate::traits::SessionObserver;
