//! Stream session controller.
//!
//! Owns one end-to-end streaming attempt: opens the transport, wires frame
//! parsing, sanitization, accumulation, and terminal resolution together,
//! and reports through the observer callbacks. Each session owns its
//! document and dedup window exclusively; nothing leaks between sessions.

use futures::pin_mut;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::accumulate::DocumentAccumulator;
use crate::client::HansardClient;
use crate::error::SessionError;
use crate::models::DebateRequest;
use crate::resolve::{self, ResolverMode};
use crate::sanitize::sanitize_fragment;
use crate::sse::{classify, FrameKind};
use crate::traits::{HttpClient, SessionObserver};
use crate::transport::{read_frames, ReaderEvent};

/// Lifecycle of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not started
    Idle,
    /// Reading frames
    Streaming,
    /// Producing the terminal result
    Resolving,
    /// Terminal: resolved successfully
    Completed,
    /// Terminal: ended with an error
    Errored,
    /// Terminal: cancelled by the caller
    Aborted,
}

/// How a finished session ended. Completion fires on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A terminal result was delivered
    Completed,
    /// The error callback was invoked
    Errored,
    /// The cancellation token fired; neither result nor error was delivered
    Aborted,
}

/// One end-to-end streaming attempt.
///
/// Consumed by [`StreamSession::run`]; a new request means a new session
/// with a fresh document and dedup window.
pub struct StreamSession {
    request: DebateRequest,
    mode: ResolverMode,
    cancel: CancellationToken,
    state: SessionState,
    accumulator: DocumentAccumulator,
}

impl StreamSession {
    /// Create a session for the given request.
    pub fn new(request: DebateRequest) -> Self {
        Self {
            request,
            mode: ResolverMode::default(),
            cancel: CancellationToken::new(),
            state: SessionState::Idle,
            accumulator: DocumentAccumulator::new(),
        }
    }

    /// Override how unparseable `final` payloads are handled.
    pub fn with_resolver_mode(mut self, mode: ResolverMode) -> Self {
        self.mode = mode;
        self
    }

    /// Thread an externally owned cancellation token through the session.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// A token handle the caller can fire to abort the attempt.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to its terminal outcome.
    ///
    /// The observer's completion callback fires exactly once, last, on
    /// every path.
    pub async fn run<C, O>(mut self, client: &HansardClient<C>, observer: &mut O) -> SessionOutcome
    where
        C: HttpClient,
        O: SessionObserver,
    {
        let outcome = self.drive(client, observer).await;
        observer.on_complete();
        tracing::info!(?outcome, "stream session finished");
        outcome
    }

    async fn drive<C, O>(&mut self, client: &HansardClient<C>, observer: &mut O) -> SessionOutcome
    where
        C: HttpClient,
        O: SessionObserver,
    {
        if let Err(err) = self.request.validate() {
            self.state = SessionState::Errored;
            observer.on_error(&err.to_string());
            return SessionOutcome::Errored;
        }

        if self.cancel.is_cancelled() {
            self.state = SessionState::Aborted;
            return SessionOutcome::Aborted;
        }

        let bytes = match client.open_stream(&self.request).await {
            Ok(bytes) => bytes,
            Err(err) => {
                let err = SessionError::from(err);
                tracing::warn!(error = %err, "failed to open debate stream");
                self.state = SessionState::Errored;
                observer.on_error(&err.to_string());
                return SessionOutcome::Errored;
            }
        };

        self.state = SessionState::Streaming;
        tracing::debug!(date = %self.request.date, "debate stream connected");

        let frames = read_frames(bytes, self.cancel.clone());
        pin_mut!(frames);

        while let Some(event) = frames.next().await {
            match event {
                ReaderEvent::Aborted => {
                    self.state = SessionState::Aborted;
                    tracing::info!("stream aborted by caller");
                    return SessionOutcome::Aborted;
                }
                ReaderEvent::Failed(err) => {
                    let err = SessionError::from(err);
                    self.state = SessionState::Errored;
                    observer.on_error(&err.to_string());
                    return SessionOutcome::Errored;
                }
                ReaderEvent::Frame(frame) => {
                    if frame.is_done_sentinel() {
                        return self.resolve_accumulated(observer);
                    }
                    match classify(&frame.event_type) {
                        FrameKind::Fragment => {
                            if let Some(fragment) = sanitize_fragment(&frame.data) {
                                if self.accumulator.push(&fragment) {
                                    observer.on_update(self.accumulator.document());
                                } else {
                                    tracing::debug!("duplicate fragment rejected");
                                }
                            }
                        }
                        FrameKind::Final => {
                            self.state = SessionState::Resolving;
                            match resolve::parse_final_payload(&frame.data, &self.request) {
                                Ok(result) => {
                                    self.state = SessionState::Completed;
                                    observer.on_final(result);
                                    return SessionOutcome::Completed;
                                }
                                Err(err) => match self.mode {
                                    ResolverMode::Strict => {
                                        self.state = SessionState::Errored;
                                        observer.on_error(&err.to_string());
                                        return SessionOutcome::Errored;
                                    }
                                    ResolverMode::Lenient => {
                                        tracing::warn!(
                                            error = %err,
                                            "ignoring unparseable final payload"
                                        );
                                        self.state = SessionState::Streaming;
                                    }
                                },
                            }
                        }
                        FrameKind::Error => {
                            let message = resolve::strip_error_prefix(&frame.data);
                            self.state = SessionState::Errored;
                            observer.on_error(message);
                            return SessionOutcome::Errored;
                        }
                        FrameKind::Ignored => {
                            tracing::debug!(
                                event_type = %frame.event_type,
                                "ignoring unrecognized event type"
                            );
                        }
                    }
                }
            }
        }

        // Natural end of stream without an explicit terminator.
        self.resolve_accumulated(observer)
    }

    fn resolve_accumulated<O: SessionObserver>(&mut self, observer: &mut O) -> SessionOutcome {
        self.state = SessionState::Resolving;
        let result = resolve::resolve_document(self.accumulator.document(), &self.request);
        self.state = SessionState::Completed;
        observer.on_final(result);
        SessionOutcome::Completed
    }
}
