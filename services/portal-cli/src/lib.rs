mod account;
mod cli;
mod demo;
mod infra;
mod inspect;

use hiring_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
