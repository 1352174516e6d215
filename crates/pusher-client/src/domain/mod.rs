//! Domain types for the Pusher client.
//!
//! Configuration, errors, input validation and response types. Nothing in
//! here performs I/O.

pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub use config::PusherConfig;
pub use error::{ConfigError, PusherError, PusherResult, TransportError, ValidationError};
pub use types::ResponseMap;
