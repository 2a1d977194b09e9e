// Gateway HTTP client
//
// Wraps `reqwest::Client` and executes `PreparedRequest`s. URL building
// and response classification live in `request` and `response`, so this
// module only does transport.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::Error;
use crate::request::PreparedRequest;
use crate::response::{Payload, RawResponse, normalize};
use crate::transport::TransportConfig;

/// HTTP client for one messaging-gateway API.
///
/// Stateless apart from the connection pool: credentials and the base URL
/// travel inside each [`PreparedRequest`].
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
}

impl GatewayClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Send the request and return the raw response, without classifying
    /// the status code.
    pub async fn execute(&self, req: PreparedRequest) -> Result<RawResponse, Error> {
        debug!(method = %req.method, url = %req.url, "sending gateway request");

        let mut builder = self
            .http
            .request(req.method.into(), req.url)
            .header(AUTHORIZATION, req.authorization);

        if let Some(content_type) = req.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let raw = RawResponse::read(resp).await?;

        debug!(status = raw.status, bytes = raw.body.len(), "gateway responded");
        Ok(raw)
    }

    /// Send the request and normalize the response.
    pub async fn send(&self, req: PreparedRequest) -> Result<Payload, Error> {
        let raw = self.execute(req).await?;
        normalize(raw)
    }
}
