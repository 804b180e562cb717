//! Panel envelope shapes and the response normalizer.
//!
//! # Design
//! - Commands only declare the [`Shape`] they expect; unwrapping and
//!   formatting decisions live in [`Normalizer`].
//! - Per-endpoint fixes run through [`ResourceHook`] on each unwrapped
//!   payload, so the envelope contract stays the same for every command.
//! - Kept envelopes are re-serialized from an order-preserving value, so
//!   output matches the server's key order.

use std::fmt::{self, Display, Formatter};

use serde_json::{Map, Value};
use soar_config::HttpOptions;

use crate::error::{NormalizeError, NormalizeResult};
use crate::executor::ResponseBody;

const ATTRIBUTES: &str = "attributes";
const DATA: &str = "data";

/// Envelope structure a command expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{ object, attributes }`
    Single,
    /// `{ object, data: [ { object, attributes }, ... ] }`
    Collection,
    /// `{ data: { ... } }`
    Data,
}

impl Shape {
    /// Human-readable label used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single-resource",
            Self::Collection => "collection",
            Self::Data => "data-wrapped",
        }
    }
}

impl Display for Shape {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Normalizer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Printable {
    /// Serialized JSON ready for output.
    Json(String),
    /// The response had no body; nothing should be printed.
    Nothing,
}

/// Endpoint-specific transform applied to each unwrapped resource payload.
pub trait ResourceHook {
    /// Rewrite `resource` in place.
    ///
    /// # Errors
    ///
    /// Returns a [`NormalizeError`] when the payload cannot be transformed.
    fn apply(&self, resource: &mut Value) -> NormalizeResult<()>;
}

/// Turns response bodies into printable JSON according to [`HttpOptions`].
#[derive(Clone, Copy)]
pub struct Normalizer<'a> {
    options: HttpOptions,
    hook: Option<&'a dyn ResourceHook>,
}

impl<'a> Normalizer<'a> {
    /// Normalizer without hooks.
    #[must_use]
    pub const fn new(options: HttpOptions) -> Self {
        Self {
            options,
            hook: None,
        }
    }

    /// Attach a per-endpoint hook.
    #[must_use]
    pub const fn with_hook(mut self, hook: &'a dyn ResourceHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Parse `body` as `shape`, apply the hook, unwrap when `parse_body` is
    /// set, and serialize compact or indented.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::ShapeMismatch`] when the body is not JSON or
    /// not the declared envelope, hook errors unchanged, and
    /// [`NormalizeError::Encode`] if serialization fails.
    pub fn normalize(&self, body: &ResponseBody, shape: Shape) -> NormalizeResult<Printable> {
        let bytes = match body {
            ResponseBody::NoContent => return Ok(Printable::Nothing),
            ResponseBody::Content(bytes) => bytes,
        };

        let mut envelope: Value =
            serde_json::from_slice(bytes).map_err(|err| NormalizeError::ShapeMismatch {
                expected: shape,
                found: format!("invalid JSON ({err})"),
            })?;
        check_shape(&envelope, shape)?;

        if let Some(hook) = self.hook {
            for payload in payloads_mut(&mut envelope, shape) {
                hook.apply(payload)?;
            }
        }

        let output = if self.options.parse_body {
            unwrap_payload(envelope, shape)
        } else {
            envelope
        };

        let text = if self.options.parse_indent {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        }
        .map_err(|source| NormalizeError::Encode { source })?;

        Ok(Printable::Json(text))
    }
}

fn check_shape(envelope: &Value, shape: Shape) -> NormalizeResult<()> {
    let mismatch = || NormalizeError::ShapeMismatch {
        expected: shape,
        found: describe(envelope),
    };
    let object = envelope.as_object().ok_or_else(mismatch)?;

    match shape {
        Shape::Single => {
            if !object.contains_key(ATTRIBUTES) {
                return Err(mismatch());
            }
        }
        Shape::Collection => {
            let items = object
                .get(DATA)
                .and_then(Value::as_array)
                .ok_or_else(mismatch)?;
            if let Some(position) = items.iter().position(|item| !is_resource(item)) {
                return Err(NormalizeError::ShapeMismatch {
                    expected: shape,
                    found: format!("collection item {position} has no attributes"),
                });
            }
        }
        Shape::Data => {
            if !object.get(DATA).is_some_and(Value::is_object) {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

fn is_resource(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key(ATTRIBUTES))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Object(object) if object.contains_key(ATTRIBUTES) => {
            "single-resource envelope".to_string()
        }
        Value::Object(object) if object.get(DATA).is_some_and(Value::is_array) => {
            "collection envelope".to_string()
        }
        Value::Object(object) if object.get(DATA).is_some_and(Value::is_object) => {
            "data-wrapped object".to_string()
        }
        Value::Object(object) => {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        Value::Array(_) => "JSON array".to_string(),
        Value::String(_) => "JSON string".to_string(),
        Value::Number(_) => "JSON number".to_string(),
        Value::Bool(_) => "JSON boolean".to_string(),
        Value::Null => "null".to_string(),
    }
}

fn payloads_mut(envelope: &mut Value, shape: Shape) -> Vec<&mut Value> {
    match shape {
        Shape::Single => envelope.get_mut(ATTRIBUTES).into_iter().collect(),
        Shape::Data => envelope.get_mut(DATA).into_iter().collect(),
        Shape::Collection => envelope
            .get_mut(DATA)
            .and_then(Value::as_array_mut)
            .map(|items| {
                items
                    .iter_mut()
                    .filter_map(|item| item.get_mut(ATTRIBUTES))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn unwrap_payload(envelope: Value, shape: Shape) -> Value {
    let mut object = match envelope {
        Value::Object(object) => object,
        other => return other,
    };

    match shape {
        Shape::Single => take(&mut object, ATTRIBUTES),
        Shape::Data => take(&mut object, DATA),
        Shape::Collection => match take(&mut object, DATA) {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(mut resource) => take(&mut resource, ATTRIBUTES),
                        other => other,
                    })
                    .collect(),
            ),
            other => other,
        },
    }
}

fn take(object: &mut Map<String, Value>, key: &str) -> Value {
    object.remove(key).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(parse_body: bool, parse_indent: bool) -> HttpOptions {
        HttpOptions {
            parse_body,
            parse_indent,
        }
    }

    fn content(value: &Value) -> ResponseBody {
        ResponseBody::Content(serde_json::to_vec(value).expect("serializable"))
    }

    fn json_text(printable: Printable) -> String {
        match printable {
            Printable::Json(text) => text,
            Printable::Nothing => panic!("expected printable JSON"),
        }
    }

    struct Uppercase;

    impl ResourceHook for Uppercase {
        fn apply(&self, resource: &mut Value) -> NormalizeResult<()> {
            if let Some(name) = resource.get_mut("name") {
                let upper = name.as_str().unwrap_or_default().to_uppercase();
                *name = Value::String(upper);
            }
            Ok(())
        }
    }

    #[test]
    fn no_content_prints_nothing() {
        let printable = Normalizer::new(options(true, true))
            .normalize(&ResponseBody::NoContent, Shape::Single)
            .expect("no content is not an error");
        assert_eq!(printable, Printable::Nothing);
    }

    #[test]
    fn kept_single_envelope_round_trips_compact() {
        let raw = r#"{"object":"user","attributes":{"id":7,"username":"zed","email":"z@example.com"}}"#;
        let body = ResponseBody::Content(raw.as_bytes().to_vec());
        let text = json_text(
            Normalizer::new(options(false, false))
                .normalize(&body, Shape::Single)
                .expect("normalizes"),
        );
        assert_eq!(text, raw);
    }

    #[test]
    fn kept_single_envelope_round_trips_indented() {
        let envelope = json!({"object": "user", "attributes": {"id": 7, "username": "zed"}});
        let raw = serde_json::to_string_pretty(&envelope).expect("serializable");
        let body = ResponseBody::Content(raw.clone().into_bytes());
        let text = json_text(
            Normalizer::new(options(false, true))
                .normalize(&body, Shape::Single)
                .expect("normalizes"),
        );
        assert_eq!(text, raw);
    }

    #[test]
    fn parse_body_returns_attributes_only() {
        let body = content(&json!({"object": "user", "attributes": {"id": 7, "username": "zed"}}));
        let text = json_text(
            Normalizer::new(options(true, false))
                .normalize(&body, Shape::Single)
                .expect("normalizes"),
        );
        assert_eq!(text, r#"{"id":7,"username":"zed"}"#);
    }

    #[test]
    fn parse_body_with_indent_pretty_prints_attributes() {
        let body = content(&json!({
            "object": "user",
            "attributes": {"id": 7, "username": "zed", "meta": {"admin": false}}
        }));
        let text = json_text(
            Normalizer::new(options(true, true))
                .normalize(&body, Shape::Single)
                .expect("normalizes"),
        );
        assert_eq!(
            text,
            "{\n  \"id\": 7,\n  \"username\": \"zed\",\n  \"meta\": {\n    \"admin\": false\n  }\n}"
        );
    }

    #[test]
    fn parse_body_with_indent_pretty_prints_collection() {
        let body = content(&json!({
            "object": "list",
            "data": [
                {"object": "server", "attributes": {"id": 2}},
                {"object": "server", "attributes": {"id": 1}}
            ]
        }));
        let text = json_text(
            Normalizer::new(options(true, true))
                .normalize(&body, Shape::Collection)
                .expect("normalizes"),
        );
        assert_eq!(
            text,
            "[\n  {\n    \"id\": 2\n  },\n  {\n    \"id\": 1\n  }\n]"
        );
    }

    #[test]
    fn collection_order_is_preserved_either_way() {
        let envelope = json!({
            "object": "list",
            "data": [
                {"object": "user", "attributes": {"name": "c"}},
                {"object": "user", "attributes": {"name": "a"}},
                {"object": "user", "attributes": {"name": "b"}}
            ]
        });
        let body = content(&envelope);

        let unwrapped = json_text(
            Normalizer::new(options(true, false))
                .normalize(&body, Shape::Collection)
                .expect("normalizes"),
        );
        assert_eq!(unwrapped, r#"[{"name":"c"},{"name":"a"},{"name":"b"}]"#);

        let kept = json_text(
            Normalizer::new(options(false, false))
                .normalize(&body, Shape::Collection)
                .expect("normalizes"),
        );
        let kept: Value = serde_json::from_str(&kept).expect("valid JSON");
        let names: Vec<&str> = kept["data"]
            .as_array()
            .expect("data array")
            .iter()
            .map(|item| item["attributes"]["name"].as_str().expect("name"))
            .collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn kept_collection_preserves_extra_members() {
        let envelope = json!({
            "object": "list",
            "data": [],
            "meta": {"pagination": {"total": 0}}
        });
        let text = json_text(
            Normalizer::new(options(false, false))
                .normalize(&content(&envelope), Shape::Collection)
                .expect("normalizes"),
        );
        assert_eq!(text, r#"{"object":"list","data":[],"meta":{"pagination":{"total":0}}}"#);
    }

    #[test]
    fn single_body_for_collection_is_shape_mismatch() {
        let body = content(&json!({"object": "user", "attributes": {"id": 1}}));
        let err = Normalizer::new(options(true, false))
            .normalize(&body, Shape::Collection)
            .expect_err("shape mismatch");
        assert!(matches!(
            err,
            NormalizeError::ShapeMismatch { expected: Shape::Collection, ref found } if found == "single-resource envelope"
        ));
    }

    #[test]
    fn collection_body_for_single_is_shape_mismatch() {
        let body = content(&json!({"object": "list", "data": []}));
        let err = Normalizer::new(options(false, false))
            .normalize(&body, Shape::Single)
            .expect_err("shape mismatch");
        assert!(matches!(err, NormalizeError::ShapeMismatch { expected: Shape::Single, .. }));
    }

    #[test]
    fn collection_items_without_attributes_are_rejected() {
        let body = content(&json!({"object": "list", "data": [{"object": "user"}]}));
        let err = Normalizer::new(options(true, false))
            .normalize(&body, Shape::Collection)
            .expect_err("shape mismatch");
        assert!(err.to_string().contains("collection item 0"));
    }

    #[test]
    fn invalid_json_is_shape_mismatch() {
        let body = ResponseBody::Content(b"<html>".to_vec());
        let err = Normalizer::new(options(true, false))
            .normalize(&body, Shape::Single)
            .expect_err("invalid JSON");
        assert!(matches!(err, NormalizeError::ShapeMismatch { ref found, .. } if found.starts_with("invalid JSON")));
    }

    #[test]
    fn data_shape_unwraps_inner_object() {
        let body = content(&json!({"data": {"secret": "ABC", "image_url_data": "x"}}));
        let text = json_text(
            Normalizer::new(options(true, false))
                .normalize(&body, Shape::Data)
                .expect("normalizes"),
        );
        assert_eq!(text, r#"{"secret":"ABC","image_url_data":"x"}"#);
    }

    #[test]
    fn hooks_apply_to_every_collection_payload() {
        let body = content(&json!({
            "object": "list",
            "data": [
                {"object": "server", "attributes": {"name": "alpha"}},
                {"object": "server", "attributes": {"name": "beta"}}
            ]
        }));
        let hook = Uppercase;
        let text = json_text(
            Normalizer::new(options(true, false))
                .with_hook(&hook)
                .normalize(&body, Shape::Collection)
                .expect("normalizes"),
        );
        assert_eq!(text, r#"[{"name":"ALPHA"},{"name":"BETA"}]"#);
    }

    #[test]
    fn hooks_apply_inside_kept_envelopes() {
        let body = content(&json!({"object": "server", "attributes": {"name": "alpha"}}));
        let hook = Uppercase;
        let text = json_text(
            Normalizer::new(options(false, false))
                .with_hook(&hook)
                .normalize(&body, Shape::Single)
                .expect("normalizes"),
        );
        assert_eq!(text, r#"{"object":"server","attributes":{"name":"ALPHA"}}"#);
    }
}
