mod cli;
mod infra;
mod routes;
mod score;
mod server;

use interest_inventory::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
