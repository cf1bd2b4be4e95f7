//! Shared test helpers.

use hansard_stream::models::DebateResult;
use hansard_stream::traits::SessionObserver;

/// Observer that records every callback for assertions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub updates: Vec<String>,
    pub finals: Vec<DebateResult>,
    pub errors: Vec<String>,
    pub completions: usize,
}

impl SessionObserver for RecordingObserver {
    fn on_update(&mut self, cumulative: &str) {
        self.updates.push(cumulative.to_string());
    }

    fn on_final(&mut self, result: DebateResult) {
        self.finals.push(result);
    }

    fn on_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn on_complete(&mut self) {
        self.completions += 1;
    }
}
