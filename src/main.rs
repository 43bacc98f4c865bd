//! Server binary: reads `.env` and the environment, opens the database image, serves the note pages.

use notekeeper::{app, AppConfig, AppState, Store};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notekeeper=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let store = Store::open(&config.database_path).await?;
    let state = AppState::new(store);
    let router = app(state, &config);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
