use soar_api::{Method, Shape};
use soar_config::Surface;
use soar_telemetry::Diagnostics;

use crate::cli::FilesListArgs;
use crate::client::{AppContext, CliResult};
use crate::output::render;
use crate::query::{Query, path_segment};

pub(crate) fn handle_files_list(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &FilesListArgs,
) -> CliResult<()> {
    let server = path_segment("--server", &args.server)?;
    let mut query = Query::default();
    query.param("directory", args.dir.as_deref());
    let path = query.append_to(format!("/api/client/servers/{server}/files/list"));

    let body = ctx.send(Surface::Client, Method::Get, &path, None)?;
    render(&ctx.config, diagnostics, &body, Shape::Collection, None)
}
