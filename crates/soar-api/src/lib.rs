#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Request construction, execution, and response normalization for the panel API.
//!
//! Layout:
//! - `request.rs`: authenticated request builder
//! - `executor.rs`: blocking transport and outcome classification
//! - `envelope.rs`: envelope shapes and the response normalizer
//! - `hooks.rs`: per-endpoint payload transforms
//! - `error.rs`: build, execution, and normalization errors

pub mod envelope;
pub mod error;
pub mod executor;
pub mod hooks;
pub mod request;

pub use envelope::{Normalizer, Printable, ResourceHook, Shape};
pub use error::{ApiErrorDetail, ApiErrors, BuildError, Failure, NormalizeError, SetupError};
pub use executor::{Executor, HEADER_REQUEST_ID, ResponseBody, USER_AGENT};
pub use hooks::{PercentDecodeField, TWO_FACTOR_IMAGE_FIELD, percent_decode_strict};
pub use request::{Method, OutboundRequest, build};
