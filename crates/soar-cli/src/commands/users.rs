use std::fs;
use std::path::Path;

use serde_json::Value;
use soar_api::{Method, Shape};
use soar_config::Surface;
use soar_telemetry::Diagnostics;

use crate::cli::{IdArgs, UserCreateArgs, UserUpdateArgs, UsersGetArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render;
use crate::query::{Query, Target, positive_id};

const USERS_PATH: &str = "/api/application/users";
const REQUIRED_CREATE_FIELDS: [&str; 4] = ["username", "email", "first_name", "last_name"];

pub(crate) fn handle_users_get(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &UsersGetArgs,
) -> CliResult<()> {
    let target = Target::from_flags(args.id, args.external.as_deref())?;
    let mut query = Query::default();
    query
        .filter("username", args.username.as_deref())
        .filter("email", args.email.as_deref())
        .filter("uuid", args.uuid.as_deref());
    let path = query.append_to(format!("{USERS_PATH}{}", target.suffix()));

    let body = ctx.send(Surface::Application, Method::Get, &path, None)?;
    let shape = if target.is_single() {
        Shape::Single
    } else {
        Shape::Collection
    };
    render(&ctx.config, diagnostics, &body, shape, None)
}

pub(crate) fn handle_user_create(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &UserCreateArgs,
) -> CliResult<()> {
    let payload = read_json_object(&args.src, &REQUIRED_CREATE_FIELDS)?;
    let body = ctx.send(Surface::Application, Method::Post, USERS_PATH, Some(payload))?;
    render(&ctx.config, diagnostics, &body, Shape::Single, None)
}

pub(crate) fn handle_user_update(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &UserUpdateArgs,
) -> CliResult<()> {
    let id = positive_id(args.id)?;
    let payload = read_json_object(&args.src, &[])?;
    let path = format!("{USERS_PATH}/{id}");
    let body = ctx.send(Surface::Application, Method::Patch, &path, Some(payload))?;
    render(&ctx.config, diagnostics, &body, Shape::Single, None)
}

pub(crate) fn handle_user_delete(
    ctx: &AppContext,
    diagnostics: &mut Diagnostics,
    args: &IdArgs,
) -> CliResult<()> {
    let id = positive_id(args.id)?;
    ctx.send(
        Surface::Application,
        Method::Delete,
        &format!("{USERS_PATH}/{id}"),
        None,
    )?;
    diagnostics.info(format_args!("deleted user {id}"));
    Ok(())
}

/// Read `path` as a JSON object carrying every `required` field as a non-empty
/// string, and return it compactly re-encoded.
fn read_json_object(path: &Path, required: &[&str]) -> CliResult<Vec<u8>> {
    let display = path.display();
    let contents = fs::read(path).map_err(|err| {
        CliError::validation(format!("failed to read source file '{display}': {err}"))
    })?;
    let value: Value = serde_json::from_slice(&contents).map_err(|err| {
        CliError::validation(format!("source file '{display}' is not valid JSON: {err}"))
    })?;
    let Value::Object(fields) = &value else {
        return Err(CliError::validation(format!(
            "source file '{display}' must contain a JSON object"
        )));
    };

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|field| {
            fields
                .get(*field)
                .and_then(Value::as_str)
                .is_none_or(|text| text.trim().is_empty())
        })
        .collect();
    if !missing.is_empty() {
        return Err(CliError::validation(format!(
            "source file '{display}' is missing required fields: {}",
            missing.join(", ")
        )));
    }

    serde_json::to_vec(&value).map_err(CliError::failure)
}
