use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use common_auth::{JwtConfig, TokenVerifier};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use photobooth_service::app::{router, AppState};
use photobooth_service::config::load_config;
use photobooth_service::seed::seed_admin;
use photobooth_service::tokens::TokenSigner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Refuses to start without DATABASE_URL and JWT_SECRET.
    let config = load_config()?;

    let db = PgPool::connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    if let Err(err) = seed_admin(&db).await {
        error!(error = %err, "first-run seeding failed");
    }

    let verifier = TokenVerifier::new(&JwtConfig::new(config.jwt_secret.clone()));
    let signer = TokenSigner::new(&config.jwt_secret);

    let addr: SocketAddr = (config.host.parse::<std::net::IpAddr>()?, config.port).into();

    let state = AppState {
        db,
        verifier: Arc::new(verifier),
        signer: Arc::new(signer),
        config: Arc::new(config),
    };

    // Kiosk frontends are served from arbitrary origins (Electron, local files).
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION]);

    let app = router(state).layer(cors);

    info!(%addr, "starting photobooth-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
