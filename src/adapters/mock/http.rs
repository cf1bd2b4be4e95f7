//! Mock HTTP client for testing.
//!
//! Returns scripted responses and records every request so tests can drive
//! a whole streaming session without network access. Stream responses can
//! be split into arbitrary chunks, which is how the chunk-boundary tests
//! exercise the decoder and frame parser.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A recorded request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body, for POSTs
    pub body: Option<String>,
}

/// Scripted behavior for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Buffered success response
    Success(Response),
    /// Fail the request
    Error(HttpError),
    /// Streaming body delivered in the given chunks. With `hang` set the
    /// stream never ends after the chunks, which lets cancellation tests
    /// park the reader mid-stream.
    Stream { chunks: Vec<Bytes>, hang: bool },
}

/// Mock HTTP client with per-URL scripted responses.
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for an exact or prefix-matched URL.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Script the response used when no URL matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Convenience: script a finite stream from the given chunks.
    pub fn set_default_stream(&self, chunks: Vec<Bytes>) {
        self.set_default_response(MockResponse::Stream {
            chunks,
            hang: false,
        });
    }

    /// All requests made so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn lookup(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }
        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }
        self.default_response.lock().unwrap().clone()
    }
}

fn buffered(response: MockResponse) -> Result<Response, HttpError> {
    match response {
        MockResponse::Success(response) => Ok(response),
        MockResponse::Error(err) => Err(err),
        MockResponse::Stream { .. } => Err(HttpError::Other(
            "scripted a stream for a buffered request".to_string(),
        )),
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("GET", url, headers, None);
        match self.lookup(url) {
            Some(response) => buffered(response),
            None => Err(HttpError::Other(format!("no mock response for {}", url))),
        }
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("POST", url, headers, Some(body.to_string()));
        match self.lookup(url) {
            Some(response) => buffered(response),
            None => Err(HttpError::Other(format!("no mock response for {}", url))),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record("POST", url, headers, Some(body.to_string()));
        match self.lookup(url) {
            Some(MockResponse::Stream { chunks, hang }) => {
                let items: Vec<Result<Bytes, HttpError>> = chunks.into_iter().map(Ok).collect();
                let base = stream::iter(items);
                if hang {
                    Ok(Box::pin(base.chain(stream::pending())))
                } else {
                    Ok(Box::pin(base))
                }
            }
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Success(_)) => Err(HttpError::Other(
                "scripted a buffered response for a streaming request".to_string(),
            )),
            None => Err(HttpError::Other(format!("no mock response for {}", url))),
        }
    }
}
