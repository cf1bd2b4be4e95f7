//! HTTP client trait abstraction.
//!
//! Abstracts the two HTTP operations the pipeline needs - a plain request
//! and a streaming POST - so the session can be driven by either the
//! production reqwest adapter or a mock in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// HTTP headers as a key-value map.
pub type Headers = HashMap<String, String>;

/// A streaming response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// A buffered (non-streaming) HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }

    /// Check whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Body parsed as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP-level failures.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// Could not reach the server
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// Request or read timed out
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Server answered with a non-success status
    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// Mid-stream read failure
    #[error("stream read failed: {0}")]
    Io(String),
    /// Anything else
    #[error("http error: {0}")]
    Other(String),
}

/// Trait for the HTTP operations the client performs.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and buffer the response.
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request and buffer the response.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request and return the response body as a byte stream.
    ///
    /// A non-success status must be reported as [`HttpError::Status`] without
    /// handing the body to the caller.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}
