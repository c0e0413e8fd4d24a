//! Client for deployment pipelines of a hosted BI service.
//!
//! A [`PipelineClient`] names one pipeline; a [`Session`] supplies the
//! transport and bearer token for each call.
//!
//! ```no_run
//! use openapi_client::models::DeployRequest;
//! use pipectl::deploy::waiter::WaitOptions;
//! use pipectl::{HttpClient, PipelineClient, Session};
//! use secrecy::SecretString;
//!
//! # async fn example() -> Result<(), pipectl::PipelineError> {
//! let http = HttpClient::new("https://api.powerbi.com/v1.0/myorg")?;
//! let token = SecretString::from(std::env::var("PIPECTL_ACCESS_TOKEN").unwrap_or_default());
//! let session = Session::new(&http, &token);
//!
//! let pipeline = PipelineClient::new("8ce96c50-85a0-4db3-85c6-7ccc3ed46523");
//! let request = DeployRequest::new(0).with_note("Promote to test");
//! let operation = pipeline
//!     .deploy_all_and_wait(session, &request, &WaitOptions::default())
//!     .await?;
//! println!("{}", operation.status());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod pipeline;
pub mod storage;
pub mod utils;

pub use errors::PipelineError;
pub use http::{HttpClient, PipelineApi, Session};
pub use pipeline::PipelineClient;
