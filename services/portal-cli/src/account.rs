use crate::infra::ConsoleNavigator;
use clap::Args;
use hiring_portal::api::HttpApiClient;
use hiring_portal::config::AppConfig;
use hiring_portal::error::AppError;
use hiring_portal::session::{
    CredentialStorage, FileCredentialStorage, RestoreOutcome, SessionStore,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) password: String,
}

type ConsoleSession = SessionStore<HttpApiClient>;

fn open_session(config: &AppConfig) -> Result<(ConsoleSession, RestoreOutcome), AppError> {
    let storage: Arc<dyn CredentialStorage> =
        Arc::new(FileCredentialStorage::new(&config.session.credential_path));
    let client = HttpApiClient::new(&config.api, storage.clone())?;
    let navigator = Arc::new(ConsoleNavigator::new("session"));
    Ok(SessionStore::start(
        Arc::new(client),
        storage,
        navigator,
        config.session.register_redirect,
    ))
}

pub(crate) fn run_status(config: &AppConfig) -> Result<(), AppError> {
    let (_session, restored) = open_session(config)?;
    println!("Store    : {}", config.session.credential_path.display());
    match restored {
        RestoreOutcome::Restored(identity) => {
            println!("Signed in: {} ({})", identity.display_name(), identity.role());
        }
        RestoreOutcome::Empty => println!("Signed in: no"),
        RestoreOutcome::Discarded(cause) => {
            println!("Signed in: no (stored credential discarded: {cause})");
        }
        RestoreOutcome::StorageUnavailable(reason) => {
            println!("Signed in: unknown (credential store unreadable: {reason})");
        }
        RestoreOutcome::AlreadyRestored => {}
    }
    Ok(())
}

pub(crate) async fn run_login(config: &AppConfig, args: LoginArgs) -> Result<(), AppError> {
    let (session, _) = open_session(config)?;
    let identity = session.login(&args.email, &args.password).await?;
    println!(
        "Signed in as {} ({}) against {}",
        identity.display_name(),
        identity.role(),
        config.api.base_url
    );
    Ok(())
}

pub(crate) async fn run_logout(config: &AppConfig) -> Result<(), AppError> {
    let (session, restored) = open_session(config)?;
    if !matches!(restored, RestoreOutcome::Restored(_)) {
        println!("No active session; clearing the credential store anyway.");
    }
    session.logout().await;
    println!("Signed out.");
    Ok(())
}
