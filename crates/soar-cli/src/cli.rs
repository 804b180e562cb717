//! Argument tree, dispatch, and process exit codes.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use soar_config::{ConfigLocator, FlagOverrides};
use soar_telemetry::{Diagnostics, LoggingConfig, init_logging};
use tracing::debug;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::account::{
    handle_account_get, handle_account_permissions, handle_two_factor_disable,
    handle_two_factor_enable, handle_two_factor_get,
};
use crate::commands::config::handle_config_info;
use crate::commands::databases::handle_databases_get;
use crate::commands::files::handle_files_list;
use crate::commands::servers::{
    ServerPower, handle_client_servers_get, handle_server_delete, handle_server_power,
    handle_servers_get,
};
use crate::commands::users::{
    handle_user_create, handle_user_delete, handle_user_update, handle_users_get,
};

/// Parses arguments, runs the requested command, and reports the outcome.
/// Returns the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();
    let overrides = cli.globals.overrides();
    let mut diagnostics = Diagnostics::stdio(overrides.log_options());

    if let Err(err) = init_logging(&LoggingConfig::from_log_options(overrides.log_options())) {
        diagnostics.debug(format_args!("logging unavailable: {err:#}"));
    }

    let locator = match ConfigLocator::from_env() {
        Ok(locator) => locator,
        Err(err) => {
            let err = CliError::from(err);
            diagnostics.error(err.display_message());
            return err.exit_code();
        }
    };

    let request_id = Uuid::new_v4().to_string();
    invoke(cli, &locator, &request_id, &mut diagnostics)
}

/// Run a parsed invocation against explicit configuration locations.
pub(crate) fn invoke(
    cli: Cli,
    locator: &ConfigLocator,
    request_id: &str,
    diagnostics: &mut Diagnostics,
) -> i32 {
    let command = command_label(&cli.command);
    debug!(command, request_id, "starting command");

    let result = AppContext::prepare(locator, &cli.globals, request_id).and_then(|ctx| {
        diagnostics.set_options(ctx.config.logs());
        dispatch(cli.command, &ctx, diagnostics)
    });

    match result {
        Ok(()) => {
            debug!(command, "command succeeded");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            diagnostics.error(err.display_message());
            debug!(command, exit_code, "command failed");
            exit_code
        }
    }
}

fn dispatch(command: Command, ctx: &AppContext, diagnostics: &mut Diagnostics) -> CliResult<()> {
    match command {
        Command::App(app) => match app {
            AppCommand::UsersGet(args) => handle_users_get(ctx, diagnostics, &args),
            AppCommand::UsersCreate(args) => handle_user_create(ctx, diagnostics, &args),
            AppCommand::UsersUpdate(args) => handle_user_update(ctx, diagnostics, &args),
            AppCommand::UsersDelete(args) => handle_user_delete(ctx, diagnostics, &args),
            AppCommand::ServersGet(args) => handle_servers_get(ctx, diagnostics, &args),
            AppCommand::ServersSuspend(args) => {
                handle_server_power(ctx, diagnostics, &args, ServerPower::Suspend)
            }
            AppCommand::ServersUnsuspend(args) => {
                handle_server_power(ctx, diagnostics, &args, ServerPower::Unsuspend)
            }
            AppCommand::ServersDelete(args) => handle_server_delete(ctx, diagnostics, &args),
        },
        Command::Client(client) => match client {
            ClientCommand::AccountGet => handle_account_get(ctx, diagnostics),
            ClientCommand::AccountPermissions => handle_account_permissions(ctx, diagnostics),
            ClientCommand::TwoFactorGet => handle_two_factor_get(ctx, diagnostics),
            ClientCommand::TwoFactorEnable(args) => {
                handle_two_factor_enable(ctx, diagnostics, &args)
            }
            ClientCommand::TwoFactorDisable(args) => {
                handle_two_factor_disable(ctx, diagnostics, &args)
            }
            ClientCommand::ServersGet => handle_client_servers_get(ctx, diagnostics),
            ClientCommand::FilesList(args) => handle_files_list(ctx, diagnostics, &args),
            ClientCommand::DatabasesGet(args) => handle_databases_get(ctx, diagnostics, &args),
        },
        Command::Config(config) => match config {
            ConfigCommand::Info(args) => handle_config_info(ctx, diagnostics, &args),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "soar",
    version,
    about = "Command-line client for the panel application and client APIs"
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) globals: GlobalArgs,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Flags accepted by every command. Each one is only applied when supplied.
#[derive(Args, Debug, Default)]
pub(crate) struct GlobalArgs {
    #[arg(long, global = true, help = "Use .soar-local.yml in the working directory")]
    pub(crate) local: bool,
    #[arg(long, global = true, env = "SOAR_APPLICATION_URL", value_name = "URL")]
    pub(crate) application_url: Option<String>,
    #[arg(
        long,
        global = true,
        env = "SOAR_APPLICATION_KEY",
        hide_env_values = true,
        value_name = "KEY"
    )]
    pub(crate) application_key: Option<String>,
    #[arg(long, global = true, env = "SOAR_CLIENT_URL", value_name = "URL")]
    pub(crate) client_url: Option<String>,
    #[arg(
        long,
        global = true,
        env = "SOAR_CLIENT_KEY",
        hide_env_values = true,
        value_name = "KEY"
    )]
    pub(crate) client_key: Option<String>,
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Print only the resource payload instead of the full envelope"
    )]
    pub(crate) parse_body: Option<bool>,
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Indent JSON output"
    )]
    pub(crate) parse_indent: Option<bool>,
    #[arg(
        long = "color",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Color diagnostic prefixes"
    )]
    pub(crate) use_color: Option<bool>,
    #[arg(
        long = "debug",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Emit debug diagnostics"
    )]
    pub(crate) use_debug: Option<bool>,
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Suppress informational diagnostics"
    )]
    pub(crate) quiet: Option<bool>,
    #[arg(
        long,
        global = true,
        env = "SOAR_HTTP_TIMEOUT_SECS",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Abort requests that take longer than this many seconds"
    )]
    pub(crate) timeout: Option<u64>,
}

impl GlobalArgs {
    /// Configuration overrides for the flags that were supplied.
    pub(crate) fn overrides(&self) -> FlagOverrides {
        FlagOverrides {
            application_url: self.application_url.clone(),
            application_key: self.application_key.clone(),
            client_url: self.client_url.clone(),
            client_key: self.client_key.clone(),
            parse_body: self.parse_body,
            parse_indent: self.parse_indent,
            use_color: self.use_color,
            use_debug: self.use_debug,
            quiet: self.quiet,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Operator commands against the application API
    #[command(subcommand)]
    App(AppCommand),
    /// End-user commands against the client API
    #[command(subcommand)]
    Client(ClientCommand),
    /// Inspect the effective configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub(crate) enum AppCommand {
    /// List users, or fetch one by id or external id
    #[command(name = "users:get")]
    UsersGet(UsersGetArgs),
    /// Create a user from a JSON file
    #[command(name = "users:create")]
    UsersCreate(UserCreateArgs),
    /// Update a user from a JSON file
    #[command(name = "users:update")]
    UsersUpdate(UserUpdateArgs),
    /// Delete a user
    #[command(name = "users:delete")]
    UsersDelete(IdArgs),
    /// List servers, or fetch one by id or external id
    #[command(name = "servers:get")]
    ServersGet(ServersGetArgs),
    /// Suspend a server
    #[command(name = "servers:suspend")]
    ServersSuspend(IdArgs),
    /// Lift a server suspension
    #[command(name = "servers:unsuspend")]
    ServersUnsuspend(IdArgs),
    /// Delete a server
    #[command(name = "servers:delete")]
    ServersDelete(ServerDeleteArgs),
}

#[derive(Subcommand)]
pub(crate) enum ClientCommand {
    /// Show the account
    #[command(name = "account:get")]
    AccountGet,
    /// List the permission keys known to the panel
    #[command(name = "account:perms")]
    AccountPermissions,
    /// Fetch the two-factor enrollment secret and otpauth URI
    #[command(name = "account:2fa:get", alias = "2fa:get")]
    TwoFactorGet,
    /// Enable two-factor authentication
    #[command(name = "account:2fa:enable", alias = "2fa:enable")]
    TwoFactorEnable(TwoFactorEnableArgs),
    /// Disable two-factor authentication
    #[command(name = "account:2fa:disable", alias = "2fa:disable")]
    TwoFactorDisable(TwoFactorDisableArgs),
    /// List servers the account can access
    #[command(name = "servers:get")]
    ServersGet,
    /// List files in a server directory
    #[command(name = "files:list")]
    FilesList(FilesListArgs),
    /// List databases of a server
    #[command(name = "databases:get")]
    DatabasesGet(DatabasesGetArgs),
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Print the effective configuration
    Info(ConfigInfoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct UsersGetArgs {
    #[arg(long, help = "Panel user id")]
    pub(crate) id: Option<u64>,
    #[arg(long, help = "External user id")]
    pub(crate) external: Option<String>,
    #[arg(long, help = "Filter by username")]
    pub(crate) username: Option<String>,
    #[arg(long, help = "Filter by email address")]
    pub(crate) email: Option<String>,
    #[arg(long, help = "Filter by UUID")]
    pub(crate) uuid: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct UserCreateArgs {
    #[arg(long, help = "JSON file describing the user")]
    pub(crate) src: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct UserUpdateArgs {
    #[arg(long, help = "Panel user id")]
    pub(crate) id: u64,
    #[arg(long, help = "JSON file with the fields to change")]
    pub(crate) src: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct IdArgs {
    #[arg(long, help = "Panel resource id")]
    pub(crate) id: u64,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServersGetArgs {
    #[arg(long, help = "Panel server id")]
    pub(crate) id: Option<u64>,
    #[arg(long, help = "External server id")]
    pub(crate) external: Option<String>,
    #[arg(long, help = "Filter by name")]
    pub(crate) name: Option<String>,
    #[arg(long, help = "Filter by UUID")]
    pub(crate) uuid: Option<String>,
    #[arg(long, help = "Filter by docker image")]
    pub(crate) image: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ServerDeleteArgs {
    #[arg(long, help = "Panel server id")]
    pub(crate) id: u64,
    #[arg(long, help = "Delete even if the node cannot be reached")]
    pub(crate) force: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TwoFactorEnableArgs {
    #[arg(help = "Current code from the authenticator app")]
    pub(crate) code: String,
    #[arg(help = "Account password")]
    pub(crate) password: String,
}

#[derive(Args, Debug)]
pub(crate) struct TwoFactorDisableArgs {
    #[arg(help = "Account password")]
    pub(crate) password: String,
}

#[derive(Args, Debug)]
pub(crate) struct FilesListArgs {
    #[arg(long, help = "Server identifier")]
    pub(crate) server: String,
    #[arg(long, help = "Directory to list, relative to the server root")]
    pub(crate) dir: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DatabasesGetArgs {
    #[arg(long, help = "Server identifier")]
    pub(crate) server: String,
    #[arg(long, help = "Include database passwords")]
    pub(crate) password: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ConfigInfoArgs {
    #[arg(long, help = "Mask API keys")]
    pub(crate) hide: bool,
}

/// Stable label used in logs for the selected command.
pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::App(app) => match app {
            AppCommand::UsersGet(_) => "app users:get",
            AppCommand::UsersCreate(_) => "app users:create",
            AppCommand::UsersUpdate(_) => "app users:update",
            AppCommand::UsersDelete(_) => "app users:delete",
            AppCommand::ServersGet(_) => "app servers:get",
            AppCommand::ServersSuspend(_) => "app servers:suspend",
            AppCommand::ServersUnsuspend(_) => "app servers:unsuspend",
            AppCommand::ServersDelete(_) => "app servers:delete",
        },
        Command::Client(client) => match client {
            ClientCommand::AccountGet => "client account:get",
            ClientCommand::AccountPermissions => "client account:perms",
            ClientCommand::TwoFactorGet => "client account:2fa:get",
            ClientCommand::TwoFactorEnable(_) => "client account:2fa:enable",
            ClientCommand::TwoFactorDisable(_) => "client account:2fa:disable",
            ClientCommand::ServersGet => "client servers:get",
            ClientCommand::FilesList(_) => "client files:list",
            ClientCommand::DatabasesGet(_) => "client databases:get",
        },
        Command::Config(ConfigCommand::Info(_)) => "config info",
    }
}
