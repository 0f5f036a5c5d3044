//! # nodesty
//!
//! Typed async client for the Nodesty hosting API.
//!
//! [`NodestyClient`] bundles the account, VPS, dedicated server and firewall
//! clients over one shared transport. Every call resolves to an
//! [`ApiResponse`]; transient 5xx failures are retried with exponential
//! backoff before the envelope is returned.
//!
//! ```no_run
//! use nodesty::{NodestyClient, ServiceId};
//!
//! # async fn run() -> nodesty::Result<()> {
//! let client = NodestyClient::new("your-personal-access-token")?;
//! let service = ServiceId::new("12345")?;
//!
//! let info = client.get_vps_info(&service).await;
//! if let Some(vps) = info.data() {
//!     println!("{} is {}", vps.hostname, if vps.status { "up" } else { "down" });
//! }
//!
//! client.update_api_key("rotated-token");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;

pub use client::{NodestyClient, NodestyClientBuilder};
pub use nodesty_core::{
    ApiConfig, ApiResponse, Backoff, CallOptions, ClientConfig, Error, FailureKind,
    HttpTransport, RetryPolicy, ServiceId, TicketId, TokioBackoff,
};

/// Account models and client.
pub use nodesty_user as user;
/// VPS models and client.
pub use nodesty_vps as vps;
/// Dedicated server models and client.
pub use nodesty_dedicated as dedicated;
/// Firewall models and client.
pub use nodesty_firewall as firewall;

/// Convenient result alias that reuses the shared Nodesty error type.
pub type Result<T> = nodesty_core::Result<T>;
