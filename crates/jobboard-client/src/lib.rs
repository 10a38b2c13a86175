//! Typed HTTP client for the job board API.
//!
//! The base URL is injected through [`ClientConfig`]; every request goes
//! to the same configured server.

pub mod client;
pub mod error;

pub use client::{ClientConfig, JobBoardClient};
pub use error::{ClientError, ClientResult};
