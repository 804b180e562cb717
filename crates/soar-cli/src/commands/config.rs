use soar_telemetry::Diagnostics;

use crate::cli::ConfigInfoArgs;
use crate::client::{AppContext, CliResult};
use crate::output::{render_config_info, write_output};

pub(crate) fn handle_config_info(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &ConfigInfoArgs,
) -> CliResult<()> {
    let summary = render_config_info(&ctx.config, args.hide);
    write_output(diagnostics, summary.as_bytes())
}
