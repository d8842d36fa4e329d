//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, against the in-memory collaborator
//! implementations.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server
//! (with OpenAPI/Swagger UI). The workspace's main `anc-run` binary is the
//! deployment entry point.

use anc_core::{primary_failure_policy_from_env_value, CoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("anc=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("ANC_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let strict = std::env::var("ANC_RESOLVER_STRICT").ok();
    let cfg = CoreConfig::new(primary_failure_policy_from_env_value(strict.as_deref()));

    tracing::info!("++ Starting ANC REST on {}", addr);

    let app = api_rest::router(api_rest::app_state(cfg));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
