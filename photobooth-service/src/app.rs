use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use common_auth::TokenVerifier;
use sqlx::PgPool;

use crate::booth_handlers::{heartbeat, list_booths, pair_device, register_booth};
use crate::config::AppConfig;
use crate::tenant_handlers::register_tenant;
use crate::tokens::TokenSigner;
use crate::transaction_handlers::start_session;
use crate::user_handlers::{create_user, list_users, login_user};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub verifier: Arc<TokenVerifier>,
    pub signer: Arc<TokenSigner>,
    pub config: Arc<AppConfig>,
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

impl FromRef<AppState> for Arc<TokenSigner> {
    fn from_ref(state: &AppState) -> Self {
        state.signer.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/tenants", post(register_tenant))
        .route("/login", post(login_user))
        .route("/users", post(create_user).get(list_users))
        .route("/booths", post(register_booth).get(list_booths))
        .route("/booths/pair", post(pair_device))
        .route("/booths/heartbeat", post(heartbeat))
        .route("/transactions/session", post(start_session))
        .with_state(state)
}
