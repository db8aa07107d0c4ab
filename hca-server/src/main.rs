//! Hawaii climate API server.

use std::path::PathBuf;

use clap::Parser;
use hca_db::Database;

/// Default location of the climate SQLite file.
const DEFAULT_DATABASE: &str = "resources/hawaii.sqlite";

/// Default listen address.
const DEFAULT_BIND: &str = "127.0.0.1:8000";

#[derive(Parser)]
#[command(
    name = "hca-server",
    version,
    about = "Read-only HTTP API over the Hawaii weather-station dataset"
)]
struct Args {
    /// Path to the climate SQLite file
    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND)]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let db = Database::open(&args.database)?;
    log::info!(
        "opened {} ({} measurement rows)",
        args.database.display(),
        db.measurement_count()?
    );

    let app = hca_api::router(db);
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    log::info!("listening on {}", args.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
