use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use common_auth::{ensure_role, AuthContext, ROLE_OWNER, USER_ROLES};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(FromRow)]
struct AuthRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    email: String,
    role: String,
    password_hash: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let LoginRequest { email, password } = login;

    // One global lookup; emails are unique across all tenants.
    let row = sqlx::query_as::<_, AuthRow>(
        "SELECT id, tenant_id, name, email, role, password_hash FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;

    // Not-found and wrong-password produce the same response.
    let auth_data = row.ok_or(ApiError::InvalidCredentials)?;
    if !verify_password(&auth_data.password_hash, &password) {
        return Err(ApiError::InvalidCredentials);
    }

    let issued = state
        .signer
        .issue_user_token(auth_data.tenant_id, auth_data.id, &auth_data.role)
        .map_err(ApiError::TokenGeneration)?;

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_at: issued.expires_at,
        user: User {
            id: auth_data.id,
            tenant_id: auth_data.tenant_id,
            name: auth_data.name,
            email: auth_data.email,
            role: auth_data.role,
        },
    }))
}

#[derive(Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(new_user): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    ensure_role(&auth, &[ROLE_OWNER])?;

    let NewUser {
        name,
        email,
        password,
        role,
    } = new_user;

    validate_role(&role)?;
    if name.trim().is_empty() {
        return Err(ApiError::validation("name", "name is required"));
    }
    if !email.contains('@') {
        return Err(ApiError::validation("email", "a valid email is required"));
    }
    if password.len() < 6 {
        return Err(ApiError::validation(
            "password",
            "password must be at least 6 characters",
        ));
    }

    let password_hash = hash_password(&password).map_err(ApiError::Internal)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, tenant_id, name, email, role, password_hash)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, tenant_id, name, email, role",
    )
    .bind(Uuid::new_v4())
    .bind(auth.identity.tenant_id())
    .bind(name)
    .bind(email)
    .bind(role)
    .bind(password_hash)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<User>>> {
    ensure_role(&auth, USER_ROLES)?;

    let users = sqlx::query_as::<_, User>(
        "SELECT id, tenant_id, name, email, role FROM users WHERE tenant_id = $1",
    )
    .bind(auth.identity.tenant_id())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(users))
}

fn validate_role(role: &str) -> Result<(), ApiError> {
    if USER_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(ApiError::validation(
            "role",
            format!("role must be one of: {}", USER_ROLES.join(", ")),
        ))
    }
}

pub(crate) fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("Failed to hash password: {err}"))
}

fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}
