//! HTTP transport: plain-data request/response types and the executor.
//!
//! # Design
//! Requests and responses are described as plain data so the mapping layer
//! (`build_*` / `parse_*` on [`LogServiceClient`]) stays deterministic and
//! testable without a network. [`execute`] is the single place where I/O
//! happens: it runs one request on a fresh ureq agent configured from the
//! caller's timeout. No agent or connection is reused across calls.
//!
//! [`LogServiceClient`]: crate::client::LogServiceClient

use std::time::Duration;

use tracing::debug;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// Built by `LogServiceClient::build_*` methods; executed by [`execute`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by [`execute`], consumed by `LogServiceClient::parse_*` methods.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Execute a single request and read the whole response body.
///
/// Status-code-as-error handling is disabled so 4xx/5xx responses come back
/// as data; interpreting the status is the parse layer's job. Connection
/// failures and timeouts map to `ApiError::TransportError`.
pub(crate) fn execute(request: HttpRequest, timeout: Duration) -> Result<HttpResponse, ApiError> {
    debug!(method = ?request.method, path = %request.path, "dispatching request");

    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build()
        .new_agent();

    let result = match (request.method, request.body) {
        (HttpMethod::Get, _) => agent.get(&request.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&request.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&request.path).send_empty(),
    };

    let mut response = result.map_err(|e| ApiError::TransportError(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::TransportError(e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}
