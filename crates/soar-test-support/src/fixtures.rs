//! Panel response envelopes and configuration documents for tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

/// Configuration document with both surfaces pointing at `base_url`.
#[must_use]
pub fn config_yaml(base_url: &str, parse_body: bool, parse_indent: bool) -> String {
    format!(
        "application:\n  url: {base_url}\n  key: ptla_test\n\
         client:\n  url: {base_url}\n  key: ptlc_test\n\
         http:\n  parse_body: {parse_body}\n  parse_indent: {parse_indent}\n\
         logs:\n  use_color: false\n  use_debug: false\n  quiet: true\n"
    )
}

/// Write `contents` to `dir/file_name`, creating `dir` if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_config(dir: &Path, file_name: &str, contents: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Attributes of an application-API user resource.
#[must_use]
pub fn user_attributes(id: u64, username: &str) -> Value {
    json!({
        "id": id,
        "external_id": null,
        "uuid": format!("00000000-0000-0000-0000-{id:012}"),
        "username": username,
        "email": format!("{username}@example.com"),
        "first_name": "Test",
        "last_name": "User",
        "language": "en",
        "root_admin": false,
        "2fa": false,
        "created_at": "2024-01-01T00:00:00+00:00",
        "updated_at": "2024-01-01T00:00:00+00:00"
    })
}

/// Single-resource envelope `{object, attributes}`.
#[must_use]
pub fn single_envelope(object: &str, attributes: Value) -> Value {
    json!({ "object": object, "attributes": attributes })
}

/// Collection envelope `{object: "list", data: [{object, attributes}, ...]}`.
#[must_use]
pub fn collection_envelope(object: &str, items: impl IntoIterator<Item = Value>) -> Value {
    let data: Vec<Value> = items
        .into_iter()
        .map(|attributes| single_envelope(object, attributes))
        .collect();
    json!({ "object": "list", "data": data })
}

/// Panel error envelope with a single entry.
#[must_use]
pub fn error_envelope(code: &str, status: &str, detail: &str) -> Value {
    json!({ "errors": [{ "code": code, "status": status, "detail": detail }] })
}

/// Two-factor enrollment payload as returned by the client API.
#[must_use]
pub fn two_factor_payload(image_url_data: &str, secret: &str) -> Value {
    json!({ "data": { "image_url_data": image_url_data, "secret": secret } })
}
