mod cli;
mod demo;
mod infra;
mod ledger;
mod routes;
mod server;

use ems_studio::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
