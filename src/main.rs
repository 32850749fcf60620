//! Portfolio backend server
//! Serves the public site endpoints and the password-gated admin area

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::{net::TcpListener, time::interval};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_backend::{
    api::{create_router, SiteState},
    auth::{AdminPassword, AuthState, SessionAuthenticator},
    config::Config,
    middleware::LoginThrottle,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("🚀 Portfolio backend starting ({})", config.environment);

    let authenticator = Arc::new(SessionAuthenticator::new(&config.auth_config()));
    let admin_password = Arc::new(AdminPassword::new(config.admin_password_hash.clone()));
    let auth_state = AuthState::new(authenticator, admin_password.clone());

    info!(
        "🔐 Authentication initialized (admin password set: {}, secure cookies: {})",
        admin_password.is_configured(),
        config.is_production()
    );
    if !config.is_production() {
        warn!("⚠️  Session cookies are issued without the Secure flag outside production");
    }

    let throttle = LoginThrottle::new(config.login_rate_limit.clone());
    tokio::spawn(throttle_cleanup(throttle.clone()));

    let site_state = SiteState {
        environment: Arc::from(config.environment.as_str()),
    };

    let app = create_router(auth_state, site_state, throttle);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("👋 Server stopped");
    Ok(())
}

/// Prune idle login-throttle entries once per window
async fn throttle_cleanup(throttle: LoginThrottle) {
    let mut ticker = interval(throttle.window());
    loop {
        ticker.tick().await;
        throttle.cleanup();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_backend=debug,portfolio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate root .env when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
