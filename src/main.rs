use std::sync::Arc;

use roost::server::{
    config::Config, model::app::AppState, router, scheduler::cron::start_scheduler, startup,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("Server exited with error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), roost::server::error::Error> {
    let db = startup::connect_to_database(&config).await?;
    let storage = startup::build_storage(&config).await?;
    let session = startup::session_layer();

    let listen_addr = config.listen_addr.clone();
    let max_upload_bytes = config.media_max_upload_bytes;
    let state = AppState::new(db, config, storage);

    start_scheduler(&state.db, Arc::clone(&state.config)).await?;

    let app = router::routes(max_upload_bytes)
        .with_state(state)
        .layer(session)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("Listening on {}", listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
