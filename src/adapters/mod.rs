//! Adapter implementations of the trait abstractions.
//!
//! Production adapters live here alongside mocks used by the test suite.

pub mod mock;
mod reqwest_http;

pub use reqwest_http::ReqwestHttpClient;
