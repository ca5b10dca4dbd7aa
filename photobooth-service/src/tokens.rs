use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use common_auth::ROLE_DEVICE;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

/// Admin-user tokens live for a working day.
pub const USER_TOKEN_TTL_SECONDS: i64 = 60 * 60 * 24;
/// Device tokens are long-lived; a booth pairs once and keeps its token.
pub const DEVICE_TOKEN_TTL_SECONDS: i64 = 60 * 60 * 24 * 365;

/// Mints signed tokens for both identity kinds. One symmetric secret, one
/// algorithm; the kinds differ only in claim content.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    header: Header,
}

pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

#[derive(Serialize)]
struct UserTokenClaims<'a> {
    tenant_id: String,
    user_id: String,
    role: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Serialize)]
struct DeviceTokenClaims {
    tenant_id: String,
    booth_id: String,
    role: &'static str,
    exp: i64,
    iat: i64,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            header: Header::new(Algorithm::HS256),
        }
    }

    pub fn issue_user_token(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        role: &str,
    ) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(USER_TOKEN_TTL_SECONDS);

        let claims = UserTokenClaims {
            tenant_id: tenant_id.to_string(),
            user_id: user_id.to_string(),
            role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|err| anyhow!("Failed to sign user token: {err}"))?;

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in: USER_TOKEN_TTL_SECONDS,
        })
    }

    pub fn issue_device_token(&self, booth_id: Uuid, tenant_id: Uuid) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(DEVICE_TOKEN_TTL_SECONDS);

        let claims = DeviceTokenClaims {
            tenant_id: tenant_id.to_string(),
            booth_id: booth_id.to_string(),
            role: ROLE_DEVICE,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|err| anyhow!("Failed to sign device token: {err}"))?;

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in: DEVICE_TOKEN_TTL_SECONDS,
        })
    }
}
