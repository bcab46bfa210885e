use anyhow::Context;

use storefront_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environments set variables directly.
    let _ = dotenvy::dotenv();
    storefront_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = storefront_api::app::build_services(&config.store)
        .await
        .context("failed to initialise stores")?;
    let app = storefront_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
