use clap::Parser;
use fhhp_portal::db;
use fhhp_portal::server::{self, config::ServerConfig};
use fhhp_portal::version::VERSION;
use fhhp_portal::web::create_axum_router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn,tower_http=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Logging needs the configured log dir, so config errors go to stderr.
    let config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&config.log_dir);
    info!("Starting server, version: {}", VERSION);

    // --- Database Setup ---
    let db_pool = db::connect(&config.database_url).await?;
    db::init_schema(&db_pool).await?;
    db::services::seed_identity_fields(&db_pool).await?;

    let app = create_axum_router(db_pool, config.clone());

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        upload_dir = ?config.upload_dir,
        "HTTP server listening."
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(server::wait_for_shutdown(tokio::signal::ctrl_c()))
        .await?;

    info!("Server stopped.");
    Ok(())
}
