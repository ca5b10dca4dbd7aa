use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use common_auth::ROLE_OWNER;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::user_handlers::{hash_password, User};
use crate::AppState;

#[derive(Deserialize)]
pub struct RegisterTenant {
    pub tenant_name: String,
    pub admin_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TenantRegistered {
    pub tenant: Tenant,
    pub admin: User,
}

/// Creates the tenant and its first admin in one transaction: both records
/// land together or neither does.
pub async fn register_tenant(
    State(state): State<AppState>,
    Json(payload): Json<RegisterTenant>,
) -> ApiResult<(StatusCode, Json<TenantRegistered>)> {
    let RegisterTenant {
        tenant_name,
        admin_name,
        email,
        password,
    } = payload;

    if tenant_name.trim().is_empty() {
        return Err(ApiError::validation("tenant_name", "tenant name is required"));
    }
    if admin_name.trim().is_empty() {
        return Err(ApiError::validation("admin_name", "admin name is required"));
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

    let mut tx = state.db.begin().await?;

    let tenant = sqlx::query_as::<_, Tenant>(
        "INSERT INTO tenants (id, name) VALUES ($1, $2) RETURNING id, name, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(tenant_name.trim())
    .fetch_one(&mut *tx)
    .await?;

    let admin = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, tenant_id, name, email, role, password_hash)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, tenant_id, name, email, role",
    )
    .bind(Uuid::new_v4())
    .bind(tenant.id)
    .bind(admin_name.trim())
    .bind(email)
    .bind(ROLE_OWNER)
    .bind(password_hash)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(TenantRegistered { tenant, admin })))
}
