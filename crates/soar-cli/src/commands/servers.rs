use soar_api::{Method, Shape};
use soar_config::Surface;
use soar_telemetry::Diagnostics;

use crate::cli::{IdArgs, ServerDeleteArgs, ServersGetArgs};
use crate::client::{AppContext, CliResult};
use crate::output::render;
use crate::query::{Query, Target, positive_id};

const APPLICATION_SERVERS_PATH: &str = "/api/application/servers";
const CLIENT_SERVERS_PATH: &str = "/api/client";

/// Suspension state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ServerPower {
    Suspend,
    Unsuspend,
}

impl ServerPower {
    const fn action(self) -> &'static str {
        match self {
            Self::Suspend => "suspend",
            Self::Unsuspend => "unsuspend",
        }
    }

    const fn past_tense(self) -> &'static str {
        match self {
            Self::Suspend => "suspended",
            Self::Unsuspend => "unsuspended",
        }
    }
}

pub(crate) fn handle_servers_get(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &ServersGetArgs,
) -> CliResult<()> {
    let target = Target::from_flags(args.id, args.external.as_deref())?;
    let mut query = Query::default();
    query
        .filter("name", args.name.as_deref())
        .filter("uuid", args.uuid.as_deref())
        .filter("image", args.image.as_deref());
    let path = query.append_to(format!("{APPLICATION_SERVERS_PATH}{}", target.suffix()));

    let body = ctx.send(Surface::Application, Method::Get, &path, None)?;
    let shape = if target.is_single() {
        Shape::Single
    } else {
        Shape::Collection
    };
    render(&ctx.config, diagnostics, &body, shape, None)
}

pub(crate) fn handle_server_power(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &IdArgs,
    power: ServerPower,
) -> CliResult<()> {
    let id = positive_id(args.id)?;
    let path = format!("{APPLICATION_SERVERS_PATH}/{id}/{}", power.action());
    ctx.send(Surface::Application, Method::Post, &path, None)?;
    diagnostics.info(format_args!("{} server {id}", power.past_tense()));
    Ok(())
}

pub(crate) fn handle_server_delete(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &ServerDeleteArgs,
) -> CliResult<()> {
    let id = positive_id(args.id)?;
    let mut path = format!("{APPLICATION_SERVERS_PATH}/{id}");
    if args.force {
        path.push_str("/force");
    }
    ctx.send(Surface::Application, Method::Delete, &path, None)?;
    diagnostics.info(format_args!("deleted server {id}"));
    Ok(())
}

pub(crate) fn handle_client_servers_get(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
) -> CliResult<()> {
    let body = ctx.send(Surface::Client, Method::Get, CLIENT_SERVERS_PATH, None)?;
    render(&ctx.config, diagnostics, &body, Shape::Collection, None)
}
