mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cartwise_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let stores_file = cartwise_core::load_stores(&config.stores_path)?;
    tracing::info!(
        stores = stores_file.stores.len(),
        data_dir = %config.data_dir.display(),
        "store catalog loaded"
    );

    let state = AppState {
        deal_store: cartwise_store::DealStore::new(config.data_dir.clone()),
        stores: Arc::new(stores_file.stores),
        renderer: Arc::new(cartwise_scraper::HttpRenderer::new()),
        render_config: Arc::new(cartwise_scraper::RenderConfig {
            timeout_secs: config.render_timeout_secs,
            user_agent: config.user_agent.clone(),
            ..cartwise_scraper::RenderConfig::default()
        }),
        extract_options: Arc::new(cartwise_scraper::ExtractOptions::from_app_config(&config)),
    };

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
