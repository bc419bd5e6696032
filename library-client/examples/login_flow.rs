// library-client/examples/login_flow.rs
// Log in against a running library API and walk a few routes

use std::sync::Arc;

use anyhow::Context;
use library_client::{ClientConfig, Router, SessionStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: {} <username> <password>", args[0]);
        println!("  Environment: LIBRARY_API_URL, LIBRARY_TIMEOUT_SECS, LIBRARY_STORAGE_DIR");
        return Ok(());
    }

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "Connecting");

    let store = Arc::new(SessionStore::from_config(&config).context("failed to build client")?);
    let router = Router::library(store.clone())?;

    // a stored credential is validated by the first navigation
    let landing = router.push("/").await?;
    tracing::info!(path = %landing.path, "Initial route");

    if !store.is_authenticated() {
        if let Err(e) = store.login(&args[1], &args[2]).await {
            tracing::error!("Login failed: {}", e);
            return Ok(());
        }
    }

    if let Some(user) = store.user() {
        tracing::info!("Logged in as {} ({})", user.full_name(), user.role);
    }

    for path in ["/dashboard", "/admin", "/admin/users", "/auth/login"] {
        let route = router.push(path).await?;
        tracing::info!(requested = path, landed = %route.path, "Navigated");
    }

    Ok(())
}
