//! Resource hooks for endpoints whose payloads need fixing up before display.

use serde_json::Value;

use crate::envelope::ResourceHook;
use crate::error::{NormalizeError, NormalizeResult};

/// Field of the two-factor setup payload holding the percent-encoded otpauth URI.
pub const TWO_FACTOR_IMAGE_FIELD: &str = "image_url_data";

/// Percent-decodes one string field of each payload.
///
/// Payloads without the field, or where it is not a string, pass through.
#[derive(Debug, Clone, Copy)]
pub struct PercentDecodeField {
    field: &'static str,
}

impl PercentDecodeField {
    /// Hook decoding `field`.
    #[must_use]
    pub const fn new(field: &'static str) -> Self {
        Self { field }
    }
}

impl ResourceHook for PercentDecodeField {
    fn apply(&self, resource: &mut Value) -> NormalizeResult<()> {
        let Some(Value::String(raw)) = resource.get_mut(self.field) else {
            return Ok(());
        };
        let decoded = percent_decode_strict(raw).ok_or_else(|| NormalizeError::Decode {
            field: self.field.to_string(),
            value: raw.clone(),
        })?;
        *raw = decoded;
        Ok(())
    }
}

/// Decode `%XX` escapes, rejecting malformed escapes and non-UTF-8 output.
///
/// `+` is left as-is.
#[must_use]
pub fn percent_decode_strict(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let escape = bytes.get(index + 1..index + 3)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            index += 3;
        } else {
            index += 1;
        }
    }
    urlencoding::decode(input).ok().map(std::borrow::Cow::into_owned)
}
