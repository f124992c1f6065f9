//! NutriLog
//!
//! An MCP server for meal logging and nutrition tracking.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutrilog::api::ApiClient;
use nutrilog::build_info;
use nutrilog::config::Config;
use nutrilog::db;
use nutrilog::mcp::NutrilogService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr; stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrilog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    let db_path = config.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let api = match config.api {
        Some(ref api_config) => {
            tracing::info!(url = %api_config.base_url, "nutrition backend configured");
            Some(ApiClient::new(api_config)?)
        }
        None => {
            tracing::info!("no nutrition backend configured, remote tools disabled");
            None
        }
    };

    let service = NutrilogService::new(
        db_path,
        database,
        api,
        config.api.as_ref().map(|a| a.base_url.clone()),
        config.dark_mode,
    );

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
