//! Pusher client - main entry point.
//!
//! Composes validation, request signing and the HTTP transport into the
//! public operations. The client holds only immutable state and can be
//! cloned and shared across tasks.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::ReqwestTransport;
use crate::auth;
use crate::domain::config::PusherConfig;
use crate::domain::error::{PusherError, PusherResult};
use crate::domain::types::{decode_response, ResponseMap};
use crate::ports::{HttpTransport, SystemTimeSource, TimeSource};
use crate::request::{self, RequestDescriptor};
use crate::webhook;

/// Client for the Pusher Channels HTTP API.
#[derive(Clone)]
pub struct PusherClient {
    config: Arc<PusherConfig>,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn TimeSource>,
}

impl std::fmt::Debug for PusherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PusherClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PusherClient {
    /// Create a client using the default `reqwest` transport.
    pub fn new(config: PusherConfig) -> PusherResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(
            config,
            Arc::new(transport),
            Arc::new(SystemTimeSource),
        ))
    }

    /// Create a client from `PUSHER_URL` or the individual `PUSHER_*` variables.
    pub fn from_env() -> PusherResult<Self> {
        Self::new(PusherConfig::from_env()?)
    }

    /// Create a client with explicit transport and clock.
    pub fn with_transport(
        config: PusherConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            clock,
        }
    }

    pub fn config(&self) -> &PusherConfig {
        &self.config
    }

    /// Trigger `event_name` on each of `channels`.
    ///
    /// `data` is sent as-is when it is a JSON string and JSON-encoded
    /// otherwise. `socket_id` excludes that connection from receiving the
    /// event.
    pub async fn trigger<S: AsRef<str>>(
        &self,
        channels: &[S],
        event_name: &str,
        data: &Value,
        socket_id: Option<&str>,
    ) -> PusherResult<ResponseMap> {
        let request = request::trigger(&self.config.app_id, channels, event_name, data, socket_id)?;
        self.execute(request).await
    }

    /// List occupied channels, optionally filtered by name prefix.
    pub async fn channels_info<S: AsRef<str>>(
        &self,
        prefix_filter: Option<&str>,
        attributes: &[S],
    ) -> PusherResult<ResponseMap> {
        let request = request::channels_info(&self.config.app_id, prefix_filter, attributes)?;
        self.execute(request).await
    }

    /// Fetch state of a single channel.
    pub async fn channel_info<S: AsRef<str>>(
        &self,
        channel: &str,
        attributes: &[S],
    ) -> PusherResult<ResponseMap> {
        let request = request::channel_info(&self.config.app_id, channel, attributes)?;
        self.execute(request).await
    }

    /// List users subscribed to a presence channel.
    pub async fn users_info(&self, channel: &str) -> PusherResult<ResponseMap> {
        let request = request::users_info(&self.config.app_id, channel)?;
        self.execute(request).await
    }

    /// Sign a private or presence channel subscription. See [`auth::authenticate`].
    pub fn authenticate(
        &self,
        channel: &str,
        socket_id: &str,
        custom_data: Option<&Value>,
    ) -> String {
        auth::authenticate(&self.config, channel, socket_id, custom_data)
    }

    /// Validate a webhook delivered with the given key and signature headers.
    pub fn validate_webhook(&self, key: &str, signature: &str, body: &str) -> Option<ResponseMap> {
        webhook::validate_webhook(&self.config, self.clock.as_ref(), key, signature, body)
    }

    async fn execute(&self, request: RequestDescriptor) -> PusherResult<ResponseMap> {
        let method = request.method;
        let path = request.path.clone();
        let signed = request.sign(&self.config, self.clock.now_secs());

        debug!(%method, path = %path, "Sending request");

        let response = self.transport.send(signed).await.map_err(|e| {
            warn!(%method, path = %path, error = %e, "Request failed");
            PusherError::Transport(e)
        })?;

        if !response.is_success() {
            warn!(
                %method,
                path = %path,
                status = response.status,
                "API returned error status"
            );
            return Err(PusherError::from_status(response.status, response.body));
        }

        decode_response(&response.body).map_err(PusherError::Decode)
    }
}
