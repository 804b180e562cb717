//! Rendering of normalized results and the configuration summary.

use anyhow::Context;
use soar_api::{Normalizer, Printable, ResourceHook, ResponseBody, Shape};
use soar_config::{EffectiveConfig, Surface};
use soar_telemetry::Diagnostics;

use crate::client::{CliError, CliResult};

const NOT_SET: &str = "Not Set";
const MASK: char = '•';

/// Normalize `body` as `shape` and write it to the output stream.
///
/// Nothing is written unless normalization succeeds.
pub(crate) fn render(
    config: &EffectiveConfig,
    diagnostics: &mut Diagnostics,
    body: &ResponseBody,
    shape: Shape,
    hook: Option<&dyn ResourceHook>,
) -> CliResult<()> {
    let mut normalizer = Normalizer::new(config.http());
    if let Some(hook) = hook {
        normalizer = normalizer.with_hook(hook);
    }

    match normalizer.normalize(body, shape)? {
        Printable::Json(text) => write_output(diagnostics, text.as_bytes()),
        Printable::Nothing => {
            diagnostics.debug("response had no content");
            Ok(())
        }
    }
}

/// Write raw result bytes to the output stream.
pub(crate) fn write_output(diagnostics: &mut Diagnostics, bytes: &[u8]) -> CliResult<()> {
    diagnostics
        .line_bytes(bytes)
        .context("failed to write output")
        .map_err(CliError::failure)
}

/// Human-readable summary of the effective configuration.
pub(crate) fn render_config_info(config: &EffectiveConfig, hide: bool) -> String {
    let document = config.document();
    let mut lines = vec![format!("source: {}", config.source().display())];

    for surface in [Surface::Application, Surface::Client] {
        let stored = document.surface(surface);
        let key = if hide {
            mask(&stored.key)
        } else {
            stored.key.clone()
        };
        lines.push(format!("{surface}:"));
        lines.push(format!("  url: {}", or_not_set(&stored.url)));
        lines.push(format!("  key: {}", or_not_set(&key)));
    }

    let http = config.http();
    lines.push("http:".to_owned());
    lines.push(format!("  parse_body: {}", http.parse_body));
    lines.push(format!("  parse_indent: {}", http.parse_indent));

    let logs = config.logs();
    lines.push("logs:".to_owned());
    lines.push(format!("  use_color: {}", logs.use_color));
    lines.push(format!("  use_debug: {}", logs.use_debug));
    lines.push(format!("  quiet: {}", logs.quiet));
    lines.join("\n")
}

fn or_not_set(value: &str) -> &str {
    if value.trim().is_empty() { NOT_SET } else { value }
}

fn mask(value: &str) -> String {
    std::iter::repeat_n(MASK, value.chars().count()).collect()
}
