//! # nodesty-core
//!
//! Core types and the shared HTTP transport for the Nodesty control-plane API.
//!
//! Every domain client in the workspace (account, VPS, dedicated server, firewall)
//! sits on top of a single [`HttpTransport`], which owns authentication, retries
//! and the normalization of every outcome into an [`ApiResponse`] envelope.
//!
//! ## Modules
//!
//! - [`error`] - Error type for configuration and envelope conversion
//! - [`id`] - Validated identifier newtypes used in URL paths
//! - [`config`] - Serializable client configuration
//! - [`client`] - Retry policy, backoff and HTTP client tuning
//! - [`response`] - The normalized result envelope
//! - [`transport`] - Request dispatch, retry loop and normalization

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod id;
pub mod response;
pub mod transport;

// Re-export commonly used types
pub use client::{Backoff, ClientConfig, RetryPolicy, TokioBackoff};
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use id::{check_path_segment, ServiceId, TicketId};
pub use response::{ApiResponse, FailureKind};
pub use transport::{CallOptions, HttpTransport, HttpTransportBuilder};

/// HTTP method re-export so domain crates do not need a direct `reqwest` import.
pub use reqwest::Method;
