//! HTTP transport for the pipelines REST API

pub mod api;
pub mod client;

pub use api::{PipelineApi, Session};
pub use client::HttpClient;
