use canteen_server::{Config, ServerState, api, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(None, config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        "Canteen booking engine starting..."
    );

    // 2. Wire up engine state
    let state = ServerState::new(config.clone());

    // 3. Serve the HTTP API
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down...");
    };
    axum::serve(listener, api::app(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
