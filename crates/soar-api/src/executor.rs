//! Blocking transport and outcome classification.
//!
//! One attempt per request. Transport failures, non-success statuses, and
//! empty success bodies are told apart here so callers never inspect raw
//! status codes.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiErrorDetail, ApiErrors, Failure, SetupError};
use crate::request::OutboundRequest;

/// Header carrying the per-invocation request identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("soar/", env!("CARGO_PKG_VERSION"));

/// Successful response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// 2xx response with a body.
    Content(Vec<u8>),
    /// 2xx response without a body (including 204).
    NoContent,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    errors: Vec<ApiErrorDetail>,
}

/// Sends requests over a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct Executor {
    client: Client,
}

impl Executor {
    /// Build an executor tagging requests with `request_id`.
    ///
    /// No timeout is applied unless one is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the request identifier is not a valid header
    /// value or the client cannot be constructed.
    pub fn new(request_id: &str, timeout: Option<Duration>) -> Result<Self, SetupError> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(request_id)
            .map_err(|source| SetupError::InvalidRequestId { source })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|source| SetupError::Client { source })?;
        Ok(Self { client })
    }

    /// Send `request` once and classify the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::Transport`] when no HTTP response could be read and
    /// [`Failure::Api`] for any non-success status.
    pub fn execute(&self, request: OutboundRequest) -> Result<ResponseBody, Failure> {
        let OutboundRequest {
            method,
            url,
            headers,
            body,
        } = request;
        debug!(%method, %url, "sending request");

        let mut builder = self.client.request(method.into(), url.as_str()).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(|source| Failure::Transport {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .map_err(|source| Failure::Transport { url, source })?;
        debug!(status = status.as_u16(), bytes = bytes.len(), "received response");

        classify(status, &bytes)
    }
}

/// Map a status and body onto a response body or an API failure.
///
/// # Errors
///
/// Returns [`Failure::Api`] for any non-2xx status.
pub(crate) fn classify(status: StatusCode, bytes: &[u8]) -> Result<ResponseBody, Failure> {
    if status.is_success() {
        if bytes.is_empty() {
            return Ok(ResponseBody::NoContent);
        }
        return Ok(ResponseBody::Content(bytes.to_vec()));
    }

    Err(Failure::Api {
        status: status.as_u16(),
        errors: parse_api_errors(bytes),
    })
}

fn parse_api_errors(bytes: &[u8]) -> ApiErrors {
    serde_json::from_slice::<ErrorEnvelope>(bytes).map_or_else(
        |_| ApiErrors::Raw(String::from_utf8_lossy(bytes).trim().to_string()),
        |envelope| ApiErrors::Structured(envelope.errors),
    )
}
