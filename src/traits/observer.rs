//! Observer trait for the session's downstream callbacks.

use crate::models::DebateResult;

/// The four observable outcomes of a streaming session.
///
/// `on_update` carries the entire cumulative document each time a fragment
/// is accepted, never a bare delta. `on_complete` fires exactly once, last,
/// on every path - success, error, or abort.
pub trait SessionObserver: Send {
    /// A fragment was accepted; `cumulative` is the full document so far.
    fn on_update(&mut self, cumulative: &str);

    /// The session resolved to its terminal structured result.
    fn on_final(&mut self, result: DebateResult);

    /// The session ended with an error. Not invoked on cancellation.
    fn on_error(&mut self, message: &str);

    /// The session is over, whatever the outcome.
    fn on_complete(&mut self);
}
