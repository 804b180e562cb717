use soar_api::{Method, Shape};
use soar_config::Surface;
use soar_telemetry::Diagnostics;

use crate::cli::DatabasesGetArgs;
use crate::client::{AppContext, CliResult};
use crate::output::render;
use crate::query::{Query, path_segment};

pub(crate) fn handle_databases_get(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &DatabasesGetArgs,
) -> CliResult<()> {
    let server = path_segment("--server", &args.server)?;
    let mut query = Query::default();
    query.param("include", args.password.then_some("password"));
    let path = query.append_to(format!("/api/client/servers/{server}/databases"));

    let body = ctx.send(Surface::Client, Method::Get, &path, None)?;
    render(&ctx.config, diagnostics, &body, Shape::Collection, None)
}
