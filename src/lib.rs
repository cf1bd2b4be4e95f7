//! Hansard Stream - a streaming ingestion client for live debate reconstruction
//!
//! This library consumes the debate backend's framed event stream and rebuilds
//! a clean, incrementally renderable document, resolving each session to one
//! structured result.

pub mod accumulate;
pub mod adapters;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod resolve;
pub mod sanitize;
pub mod session;
pub mod sse;
pub mod traits;
pub mod transport;
