//! Request and response models for the deployment pipelines REST API.
//!
//! Field names follow the service's camelCase convention on the wire.

pub mod models;
