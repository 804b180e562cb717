//! Path segment and query-string assembly.
//!
//! Values are percent-encoded here, once; the request builder takes the
//! resulting path verbatim.

use crate::client::{CliError, CliResult};

/// Ordered query parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Query {
    params: Vec<String>,
}

impl Query {
    /// Add `filter[field]=value` when a value was supplied.
    pub(crate) fn filter(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.params
                .push(format!("filter[{field}]={}", urlencoding::encode(value)));
        }
        self
    }

    /// Add `key=value` when a value was supplied.
    pub(crate) fn param(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.params
                .push(format!("{key}={}", urlencoding::encode(value)));
        }
        self
    }

    /// Append the parameters to `path`: the first after `?`, the rest after `&`.
    pub(crate) fn append_to(&self, mut path: String) -> String {
        for (index, param) in self.params.iter().enumerate() {
            path.push(if index == 0 { '?' } else { '&' });
            path.push_str(param);
        }
        path
    }
}

/// Percent-encode a user-supplied path segment, rejecting empty values.
pub(crate) fn path_segment(flag: &str, value: &str) -> CliResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation(format!("{flag} cannot be empty")));
    }
    Ok(urlencoding::encode(trimmed).into_owned())
}

/// Which resource a lookup command addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    /// The whole collection.
    All,
    /// One resource by panel id.
    Id(u64),
    /// One resource by external id (already encoded).
    External(String),
}

impl Target {
    /// Interpret the `--id` / `--external` pair.
    pub(crate) fn from_flags(id: Option<u64>, external: Option<&str>) -> CliResult<Self> {
        match (id, external) {
            (Some(_), Some(_)) => Err(CliError::validation(
                "--id and --external cannot be used together; pick one",
            )),
            (Some(0), None) => Err(CliError::validation("--id must be a positive integer")),
            (Some(id), None) => Ok(Self::Id(id)),
            (None, Some(external)) => Ok(Self::External(path_segment("--external", external)?)),
            (None, None) => Ok(Self::All),
        }
    }

    /// Path suffix below the collection path.
    pub(crate) fn suffix(&self) -> String {
        match self {
            Self::All => String::new(),
            Self::Id(id) => format!("/{id}"),
            Self::External(external) => format!("/external/{external}"),
        }
    }

    /// Whether a single resource is addressed.
    pub(crate) const fn is_single(&self) -> bool {
        !matches!(self, Self::All)
    }
}

/// Reject `--id 0` for commands where the id is mandatory.
pub(crate) fn positive_id(id: u64) -> CliResult<u64> {
    if id == 0 {
        return Err(CliError::validation("--id must be a positive integer"));
    }
    Ok(id)
}
