//! Pusher Client - server-side library for the Pusher Channels HTTP API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        PusherClient                          │
//! │  trigger · channels_info · channel_info · users_info         │
//! │  authenticate · validate_webhook                             │
//! └──────┬──────────────────────┬─────────────────────┬──────────┘
//!        │                      │                     │
//!  ┌─────┴──────┐        ┌──────┴──────┐       ┌──────┴──────┐
//!  │  request   │        │    auth     │       │   webhook   │
//!  │ (assembly, │        │  (channel   │       │ (key, HMAC, │
//!  │  signing)  │        │   tokens)   │       │  freshness) │
//!  └─────┬──────┘        └──────┬──────┘       └──────┬──────┘
//!        │                      └──────────┬──────────┘
//!  ┌─────┴──────┐                   ┌──────┴──────┐
//!  │ validation │                   │   crypto    │
//!  └────────────┘                   │ HMAC-SHA256 │
//!        │                          └─────────────┘
//!  ┌─────┴────────────────┐
//!  │ HttpTransport (port) │ ← ReqwestTransport (adapter)
//!  └──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use pusher_client::{PusherClient, PusherConfig};
//! use serde_json::json;
//!
//! let config = PusherConfig::new("12345", "app-key", "app-secret").with_cluster("eu");
//! let client = PusherClient::new(config)?;
//!
//! client.trigger(&["my-channel"], "my-event", &json!({"message": "hi"}), None).await?;
//!
//! let auth = client.authenticate("private-chat", "1234.5678", None);
//! ```
//!
//! # Security
//!
//! - Every validation rule runs before any request is sent
//! - Signatures are compared in constant time
//! - Webhooks older than 5 minutes are rejected
//! - The app secret never appears in `Debug` output or logs

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod auth;
pub mod crypto;
pub mod domain;
pub mod ports;
pub mod request;
pub mod service;
pub mod webhook;

// Re-exports for public API
pub use adapters::ReqwestTransport;
pub use crypto::{sign, verify};
pub use domain::config::PusherConfig;
pub use domain::error::{ConfigError, PusherError, PusherResult, TransportError, ValidationError};
pub use domain::types::ResponseMap;
pub use domain::validation::{
    validate_channel, validate_channel_count, validate_data_length, validate_event_name,
    validate_socket_id,
};
pub use ports::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TimeSource};
pub use service::PusherClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
