use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use common_auth::{ensure_device, AuthContext};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::AppState;

const PAYMENT_COMPLETED: &str = "completed";

#[derive(Deserialize)]
pub struct StartSession {
    pub reference_no: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub booth_id: Uuid,
    pub tenant_id: Uuid,
    pub reference_no: String,
    pub amount: f64,
    pub payment_status: String,
    pub total_photos: i32,
    pub created_at: DateTime<Utc>,
}

/// Records a photo session. Device-only: the booth and tenant references come
/// from the device token, so a session can never land in another tenant.
pub async fn start_session(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<StartSession>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let device = ensure_device(&auth)?;

    let reference_no = payload.reference_no.trim();
    if reference_no.is_empty() {
        return Err(ApiError::validation(
            "reference_no",
            "reference number is required",
        ));
    }

    let transaction = sqlx::query_as::<_, Transaction>(
        "INSERT INTO transactions (id, booth_id, tenant_id, reference_no, amount, payment_status)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, booth_id, tenant_id, reference_no, amount, payment_status, total_photos, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(device.booth_id)
    .bind(device.tenant_id)
    .bind(reference_no)
    .bind(payload.amount)
    .bind(PAYMENT_COMPLETED)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
