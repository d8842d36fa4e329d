use anc_core::{primary_failure_policy_from_env_value, CoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the ANC decision-support application.
///
/// Starts the REST server over the decision facade and the in-memory
/// collaborator implementations. The OpenAPI documentation is served at
/// `/swagger-ui`.
///
/// # Environment Variables
/// - `ANC_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `ANC_RESOLVER_STRICT`: when truthy, a directory-resolve transport
///   failure aborts identifier resolution instead of falling through to the
///   narrower lookups
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("anc=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("ANC_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let strict = std::env::var("ANC_RESOLVER_STRICT").ok();
    let cfg = CoreConfig::new(primary_failure_policy_from_env_value(strict.as_deref()));

    tracing::info!("++ Starting ANC REST on {}", rest_addr);

    let app = api_rest::router(api_rest::app_state(cfg));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
