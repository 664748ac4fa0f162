use anyhow::Context;

use geocore_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    geocore_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = geocore_api::app::build_app(&config).context("failed to build application")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
