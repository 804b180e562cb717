//! Authenticated request construction.
//!
//! The path is taken verbatim: callers assemble and percent-encode query
//! strings before handing them over.

use std::fmt::{self, Display, Formatter};

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use soar_config::EndpointCredentials;

use crate::error::BuildError;

const APPLICATION_JSON: &str = "application/json";

/// HTTP methods used against the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Uppercase method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

/// Fully specified request, ready for the executor.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Authentication and content negotiation headers.
    pub headers: HeaderMap,
    /// JSON body, when present.
    pub body: Option<Vec<u8>>,
}

/// Build a request for `path` on the surface described by `creds`.
///
/// The URL is the base URL (one trailing `/` removed) followed by `path`.
/// `Content-Type` is only set when a non-empty body is supplied; the body
/// itself is not inspected.
///
/// # Errors
///
/// Returns [`BuildError::MissingCredentials`] when the base URL or token is
/// empty, [`BuildError::InvalidUrl`] when the result is not an absolute URL,
/// and [`BuildError::InvalidHeader`] when the token cannot be sent as a header.
pub fn build(
    creds: &EndpointCredentials,
    method: Method,
    path: &str,
    body: Option<Vec<u8>>,
) -> Result<OutboundRequest, BuildError> {
    if !creds.is_complete() {
        return Err(BuildError::MissingCredentials {
            surface: creds.surface,
        });
    }

    let base = creds.base_url.trim();
    let base = base.strip_suffix('/').unwrap_or(base);
    let url = format!("{base}{path}");
    url::Url::parse(&url).map_err(|source| BuildError::InvalidUrl {
        url: url.clone(),
        source,
    })?;

    let mut authorization = HeaderValue::from_str(&format!("Bearer {}", creds.token.trim()))
        .map_err(|source| BuildError::InvalidHeader {
            surface: creds.surface,
            source,
        })?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

    let body = body.filter(|bytes| !bytes.is_empty());
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    }

    Ok(OutboundRequest {
        method,
        url,
        headers,
        body,
    })
}
