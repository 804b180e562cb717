use serde_json::json;
use soar_api::{Method, PercentDecodeField, Shape, TWO_FACTOR_IMAGE_FIELD};
use soar_config::Surface;
use soar_telemetry::Diagnostics;

use crate::cli::{TwoFactorDisableArgs, TwoFactorEnableArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render;

const ACCOUNT_PATH: &str = "/api/client/account";
const PERMISSIONS_PATH: &str = "/api/client/permissions";
const TWO_FACTOR_PATH: &str = "/api/client/account/two-factor";

const TWO_FACTOR_HOOK: PercentDecodeField = PercentDecodeField::new(TWO_FACTOR_IMAGE_FIELD);

pub(crate) fn handle_account_get(ctx: &AppContext, diagnostics: &mut Diagnostics) -> CliResult<()> {
    let body = ctx.send(Surface::Client, Method::Get, ACCOUNT_PATH, None)?;
    render(&ctx.config, diagnostics, &body, Shape::Single, None)
}

pub(crate) fn handle_account_permissions(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
) -> CliResult<()> {
    let body = ctx.send(Surface::Client, Method::Get, PERMISSIONS_PATH, None)?;
    render(&ctx.config, diagnostics, &body, Shape::Single, None)
}

pub(crate) fn handle_two_factor_get(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
) -> CliResult<()> {
    let body = ctx.send(Surface::Client, Method::Get, TWO_FACTOR_PATH, None)?;
    render(
        &ctx.config,
        diagnostics,
        &body,
        Shape::Data,
        Some(&TWO_FACTOR_HOOK),
    )
}

pub(crate) fn handle_two_factor_enable(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &TwoFactorEnableArgs,
) -> CliResult<()> {
    let code = required("two-factor code", &args.code)?;
    let password = required("account password", &args.password)?;
    let payload = serde_json::to_vec(&json!({ "code": code, "password": password }))
        .map_err(CliError::failure)?;

    let body = ctx.send(Surface::Client, Method::Post, TWO_FACTOR_PATH, Some(payload))?;
    render(&ctx.config, diagnostics, &body, Shape::Single, None)
}

pub(crate) fn handle_two_factor_disable(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &TwoFactorDisableArgs,
) -> CliResult<()> {
    let password = required("account password", &args.password)?;
    let payload =
        serde_json::to_vec(&json!({ "password": password })).map_err(CliError::failure)?;

    ctx.send(Surface::Client, Method::Delete, TWO_FACTOR_PATH, Some(payload))?;
    diagnostics.info("two-factor authentication disabled");
    Ok(())
}

fn required<'a>(label: &str, value: &'a str) -> CliResult<&'a str> {
    if value.trim().is_empty() {
        return Err(CliError::validation(format!("no {label} specified")));
    }
    Ok(value)
}
