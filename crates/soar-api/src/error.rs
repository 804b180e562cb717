//! Error types for request construction, execution, and normalization.

use std::fmt::{self, Display, Formatter};

use reqwest::header::InvalidHeaderValue;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use soar_config::Surface;
use thiserror::Error;

use crate::envelope::Shape;

/// Failures raised before a request leaves the process.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The surface has no usable base URL or API key.
    #[error("missing {surface} API credentials: both url and key must be configured")]
    MissingCredentials {
        /// Surface the command needed.
        surface: Surface,
    },
    /// The base URL plus path does not form a valid URL.
    #[error("invalid request URL '{url}'")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
    /// The API key contains bytes that cannot be sent in a header.
    #[error("{surface} API key contains characters not allowed in an HTTP header")]
    InvalidHeader {
        /// Surface whose key was rejected.
        surface: Surface,
        /// Header construction error.
        source: InvalidHeaderValue,
    },
}

/// Failures raised while constructing the HTTP transport.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The request identifier cannot be sent as a header.
    #[error("request identifier contains invalid characters")]
    InvalidRequestId {
        /// Header construction error.
        source: InvalidHeaderValue,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client {
        /// Underlying client error.
        source: reqwest::Error,
    },
}

/// Unsuccessful outcome of an executed request.
#[derive(Debug, Error)]
pub enum Failure {
    /// Network or TLS level failure; no usable HTTP response.
    #[error("request to '{url}' failed")]
    Transport {
        /// Target URL.
        url: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// The panel answered with a non-success status.
    #[error("API responded with status {status}: {errors}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Parsed error envelope or raw body.
        errors: ApiErrors,
    },
}

/// One entry of the panel error envelope `{ errors: [ { code, status, detail } ] }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g. `NotFoundHttpException`).
    #[serde(default)]
    pub code: String,
    /// HTTP status as reported in the body.
    #[serde(default, deserialize_with = "string_or_number")]
    pub status: String,
    /// Human-readable description.
    #[serde(default)]
    pub detail: String,
}

impl Display for ApiErrorDetail {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match (self.code.is_empty(), self.status.is_empty()) {
            (false, false) => write!(formatter, "{} ({}): {}", self.code, self.status, self.detail),
            (false, true) => write!(formatter, "{}: {}", self.code, self.detail),
            (true, _) => formatter.write_str(&self.detail),
        }
    }
}

/// Body of an unsuccessful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrors {
    /// The body matched the panel error envelope.
    Structured(Vec<ApiErrorDetail>),
    /// The body was not an error envelope; kept as text.
    Raw(String),
}

impl Display for ApiErrors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(errors) if errors.is_empty() => formatter.write_str("no error details"),
            Self::Structured(errors) => {
                for (index, error) in errors.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str("; ")?;
                    }
                    write!(formatter, "{error}")?;
                }
                Ok(())
            }
            Self::Raw(text) if text.trim().is_empty() => formatter.write_str("<empty body>"),
            Self::Raw(text) => formatter.write_str(text.trim()),
        }
    }
}

/// Failures turning a response body into printable output.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The body is not JSON, or not the envelope the command declared.
    #[error("response did not match the expected {expected} shape: {found}")]
    ShapeMismatch {
        /// Shape declared by the command.
        expected: Shape,
        /// Description of what was received.
        found: String,
    },
    /// A percent-encoded field could not be decoded.
    #[error("failed to percent-decode field '{field}' (value '{value}')")]
    Decode {
        /// Field name.
        field: String,
        /// Raw field value.
        value: String,
    },
    /// Serializing the normalized value failed.
    #[error("failed to encode normalized output")]
    Encode {
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

/// Convenience alias for normalization results.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
