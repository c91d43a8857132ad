use mentor::api::routes::create_router;
use mentor::utils::config::Config;
use mentor::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config =
        Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::from_config(config).await?;

    tracing::info!(
        chat_model = %state.config.llm.chat_model,
        embed_model = %state.config.llm.embed_model,
        "mentor server starting"
    );

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
