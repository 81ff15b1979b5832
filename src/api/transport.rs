//! Transport seam between the session and the network
//!
//! The session only needs "send one request, get one response", so the HTTP
//! client sits behind a trait and tests can swap in an in-memory server.

use crate::{
    api::jsonrpc::{JsonRpcRequest, JsonRpcResponse},
    error::{MaintenanceError, Result},
};
use reqwest::{blocking::Client, header::CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, instrument};

/// Path of the JSON-RPC endpoint below the frontend root
pub const API_ENDPOINT: &str = "api_jsonrpc.php";

/// Something that can deliver a JSON-RPC request and return the reply
pub trait Transport {
    /// Send one request and wait for its response
    fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        (**self).send(request)
    }
}

/// Blocking HTTP transport
#[derive(Debug)]
pub struct HttpTransport {
    http: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport for the given frontend URL
    ///
    /// A `timeout` of `None` keeps the HTTP client's default.
    pub fn new(server_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| MaintenanceError::transport_with_source("Failed to build HTTP client", e))?;

        Ok(Self {
            http,
            endpoint: endpoint_url(server_url),
        })
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, id = request.id))]
    fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        debug!("POST {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json-rpc")
            .json(request)
            .send()
            .map_err(|e| {
                MaintenanceError::transport_with_source(
                    format!("{} request to {} failed", request.method, self.endpoint),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MaintenanceError::transport(format!(
                "{} request to {} returned HTTP {}",
                request.method, self.endpoint, status
            )));
        }

        response.json::<JsonRpcResponse>().map_err(|e| {
            MaintenanceError::invalid_response(
                request.method.clone(),
                format!("response body is not JSON-RPC: {e}"),
            )
        })
    }
}

/// Append the API endpoint unless the URL already points at a script
pub fn endpoint_url(server_url: &str) -> String {
    let trimmed = server_url.trim_end_matches('/');
    if trimmed.ends_with(".php") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/{API_ENDPOINT}")
    }
}
