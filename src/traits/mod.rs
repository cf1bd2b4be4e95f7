//! Trait abstractions for the seams of the pipeline.
//!
//! The HTTP client and the session observer are both traits so tests can
//! substitute scripted implementations without touching the network.

mod http;
mod observer;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use observer::SessionObserver;
