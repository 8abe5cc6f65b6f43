/**
 * Blogsite Server Entry Point
 *
 * This is the main entry point for the blog backend server.
 * It loads settings, selects storage and serves the Axum router.
 */

use std::net::SocketAddr;

use blogsite::backend::server::{create_app, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let settings = Settings::from_env()?;
    let addr = SocketAddr::new(settings.host, settings.port);

    let app = create_app(settings).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
