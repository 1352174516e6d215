//! `reqwest`-backed implementation of [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::error::TransportError;
use crate::ports::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Connect timeout applied on top of the per-request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .user_agent(concat!("pusher-client-rust/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one with a custom proxy setup.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        let mut builder = builder.query(&request.query);
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                TransportError::Connection(format!("cannot connect to {}", request.url))
            } else if e.is_builder() {
                TransportError::InvalidUrl(request.url.clone())
            } else {
                TransportError::Http(e)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "Received response");

        Ok(HttpResponse { status, body })
    }
}
