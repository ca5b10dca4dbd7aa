use axum::{extract::State, http::StatusCode, Json};
use common_auth::{ensure_device, ensure_role, AuthContext, USER_ROLES};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::AppState;

pub const DEVICE_CODE_PREFIX: &str = "PB-";

pub const STATUS_ACTIVE: &str = "active";

#[derive(Deserialize)]
pub struct NewBooth {
    pub name: String,
}

/// Tenant-facing view of a booth. The secret key is never part of it.
#[derive(Debug, Serialize, FromRow)]
pub struct Booth {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub device_code: String,
    pub status: String,
}

/// Creation response; the only place the secret key is ever returned.
#[derive(Debug, Serialize)]
pub struct BoothCreated {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub device_code: String,
    pub secret_key: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct PairingRequest {
    pub device_code: String,
    pub secret_key: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct BoothPublic {
    pub id: Uuid,
    pub name: String,
    pub device_code: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct PairingResponse {
    pub token: String,
    pub booth: BoothPublic,
}

pub async fn register_booth(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<NewBooth>,
) -> ApiResult<(StatusCode, Json<BoothCreated>)> {
    ensure_role(&auth, USER_ROLES)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name", "booth name is required"));
    }

    let secret_key = generate_secret_key();
    let device_code = device_code_from_secret(&secret_key);

    let booth = sqlx::query_as::<_, Booth>(
        "INSERT INTO booths (id, tenant_id, name, device_code, secret_key, status)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, tenant_id, name, device_code, status",
    )
    .bind(Uuid::new_v4())
    .bind(auth.identity.tenant_id())
    .bind(name)
    .bind(&device_code)
    .bind(&secret_key)
    .bind(STATUS_ACTIVE)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(BoothCreated {
            id: booth.id,
            tenant_id: booth.tenant_id,
            name: booth.name,
            device_code: booth.device_code,
            secret_key,
            status: booth.status,
        }),
    ))
}

pub async fn list_booths(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Booth>>> {
    let booths = sqlx::query_as::<_, Booth>(
        "SELECT id, tenant_id, name, device_code, status FROM booths WHERE tenant_id = $1",
    )
    .bind(auth.identity.tenant_id())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(booths))
}

#[derive(FromRow)]
struct PairingRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    device_code: String,
    secret_key: String,
    status: String,
}

/// Unauthenticated handshake: the physical machine exchanges its device code
/// and secret for a long-lived device token.
pub async fn pair_device(
    State(state): State<AppState>,
    Json(payload): Json<PairingRequest>,
) -> ApiResult<Json<PairingResponse>> {
    let row = sqlx::query_as::<_, PairingRow>(
        "SELECT id, tenant_id, name, device_code, secret_key, status
         FROM booths WHERE device_code = $1",
    )
    .bind(&payload.device_code)
    .fetch_optional(&state.db)
    .await?;

    // Unknown code and wrong secret fall through to the same rejection.
    let booth = row.ok_or(ApiError::PairingFailed)?;
    if !secrets_match(&booth.secret_key, &payload.secret_key) {
        return Err(ApiError::PairingFailed);
    }

    let issued = state
        .signer
        .issue_device_token(booth.id, booth.tenant_id)
        .map_err(ApiError::TokenGeneration)?;

    Ok(Json(PairingResponse {
        token: issued.token,
        booth: BoothPublic {
            id: booth.id,
            name: booth.name,
            device_code: booth.device_code,
            status: booth.status,
        },
    }))
}

pub async fn heartbeat(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<BoothPublic>> {
    let device = ensure_device(&auth)?;

    let booth = sqlx::query_as::<_, BoothPublic>(
        "UPDATE booths SET status = $2, updated_at = NOW()
         WHERE id = $1
         RETURNING id, name, device_code, status",
    )
    .bind(device.booth_id)
    .bind(STATUS_ACTIVE)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(booth))
}

fn generate_secret_key() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn device_code_from_secret(secret: &str) -> String {
    format!("{DEVICE_CODE_PREFIX}{}", &secret[..6])
}

fn secrets_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
