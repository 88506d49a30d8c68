use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sqlgen::config::Config;
use sqlgen::services::{SqlGeneratorService, build_client};
use sqlgen::{AppState, build_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env before reading the environment
    dotenvy::dotenv().ok();

    // Load configuration first
    let config = Config::load()?;

    // Initialize logging; keep the guard alive so buffered file logs are flushed
    let _log_guard = init_tracing(&config);
    tracing::info!("SQL Generator starting up");
    tracing::info!("Configuration loaded successfully");

    let client = build_client(&config.llm);
    let generator = SqlGeneratorService::new(client);
    tracing::info!(
        "SQL generator initialized (model available: {})",
        generator.is_model_available()
    );

    let app = build_router(std::sync::Arc::new(AppState::new(generator)), &config.cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API documentation available at http://{}/api-docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let log_filter = tracing_subscriber::EnvFilter::new(config.log_filter());
    let registry = tracing_subscriber::registry().with(log_filter);

    let Some(log_file) = &config.logging.file else {
        registry.with(tracing_subscriber::fmt::layer()).init();
        return None;
    };

    let log_path = std::path::Path::new(log_file);
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_dir = log_path
        .parent()
        .and_then(|p| p.to_str())
        .filter(|p| !p.is_empty())
        .unwrap_or("logs");
    let file_name = log_path.file_name().and_then(|n| n.to_str()).unwrap_or("sqlgen.log");
    // Rolling appender adds the date suffix
    let file_prefix = file_name.strip_suffix(".log").unwrap_or(file_name);

    let file_appender = tracing_appender::rolling::daily(log_dir, file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    registry
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(tracing_subscriber::fmt::layer())
        .init();

    Some(guard)
}
