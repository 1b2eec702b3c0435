use crate::account::{run_login, run_logout, run_status, LoginArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::inspect::{run_route_check, run_token_inspect, RouteCheckArgs, TokenInspectArgs};
use clap::{Parser, Subcommand};
use hiring_portal::config::AppConfig;
use hiring_portal::error::AppError;
use hiring_portal::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Hiring Portal Console",
    about = "Inspect credentials, evaluate route guards and exercise the hiring pipeline",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode and explain bearer credentials
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
    /// Evaluate the route guard for a path
    Route {
        #[command(subcommand)]
        command: RouteCommand,
    },
    /// Manage the persisted session against the configured backend
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Run an end-to-end hiring walkthrough against an in-memory backend (default command)
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Show the identity, expiry and capabilities carried by a credential
    Inspect(TokenInspectArgs),
}

#[derive(Subcommand, Debug)]
enum RouteCommand {
    /// Decide render or redirect for a path and credential
    Check(RouteCheckArgs),
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Show who is signed in according to the credential store
    Status,
    /// Sign in through the backend and persist the credential
    Login(LoginArgs),
    /// Clear the persisted credential and notify the backend
    Logout,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Token {
            command: TokenCommand::Inspect(args),
        } => run_token_inspect(args),
        Command::Route {
            command: RouteCommand::Check(args),
        } => run_route_check(&config, args),
        Command::Session { command } => match command {
            SessionCommand::Status => run_status(&config),
            SessionCommand::Login(args) => run_login(&config, args).await,
            SessionCommand::Logout => run_logout(&config).await,
        },
        Command::Demo(args) => run_demo(&config, args).await,
    }
}
