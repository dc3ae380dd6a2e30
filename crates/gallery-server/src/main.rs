mod config;
mod error;
mod routes;
mod state;
mod viewer;

use gallery::catalog::MemoryCatalog;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or("gallery=debug,gallery_server=debug,tower_http=info".into()),
        )
        .init();

    let config = config::load()?;

    let catalog = match &config.catalog.seed {
        Some(path) => MemoryCatalog::load(path)?,
        None => {
            tracing::warn!("no catalog seed configured, starting with an empty catalog");
            MemoryCatalog::new()
        }
    };

    if config.demo.gen_demo_js.is_enabled() {
        tracing::info!("demo generation enabled at /demo");
    }

    let bind = config.server.bind.clone();
    let app = routes::router(AppState::new(config, catalog)?);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(%bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
