use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::roles::ROLE_DEVICE;

/// Claims carried by an admin-user token.
#[derive(Debug, Clone)]
pub struct UserClaims {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: String,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
}

/// Claims carried by a paired-device token.
#[derive(Debug, Clone)]
pub struct DeviceClaims {
    pub booth_id: Uuid,
    pub tenant_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
}

/// Verified caller identity. The two claim shapes are separate types so a
/// booth id can never be read where a user id is expected.
#[derive(Debug, Clone)]
pub enum Identity {
    User(UserClaims),
    Device(DeviceClaims),
}

impl Identity {
    pub fn tenant_id(&self) -> Uuid {
        match self {
            Identity::User(claims) => claims.tenant_id,
            Identity::Device(claims) => claims.tenant_id,
        }
    }

    pub fn role(&self) -> &str {
        match self {
            Identity::User(claims) => claims.role.as_str(),
            Identity::Device(_) => ROLE_DEVICE,
        }
    }

    pub fn is_device(&self) -> bool {
        matches!(self, Identity::Device(_))
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        match self {
            Identity::User(claims) => claims.expires_at,
            Identity::Device(claims) => claims.expires_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    tenant_id: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    booth_id: Option<String>,
    #[serde(default)]
    role: Option<String>,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
}

impl TryFrom<ClaimsRepr> for Identity {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let tenant_id = Uuid::parse_str(&value.tenant_id)
            .map_err(|_| AuthError::InvalidClaim("tenant_id", value.tenant_id.clone()))?;

        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("exp", value.exp.to_string()))?;

        let issued_at = match value.iat {
            Some(iat) => Some(
                Utc.timestamp_opt(iat, 0)
                    .single()
                    .ok_or_else(|| AuthError::InvalidClaim("iat", iat.to_string()))?,
            ),
            None => None,
        };

        // A token with no role claim is treated as a user token.
        let role = value.role.unwrap_or_else(|| "user".to_string());

        if role == ROLE_DEVICE {
            let raw = value
                .booth_id
                .ok_or(AuthError::MissingClaim("booth_id"))?;
            let booth_id = Uuid::parse_str(&raw)
                .map_err(|_| AuthError::InvalidClaim("booth_id", raw.clone()))?;
            Ok(Identity::Device(DeviceClaims {
                booth_id,
                tenant_id,
                expires_at,
                issued_at,
            }))
        } else {
            let raw = value.user_id.ok_or(AuthError::MissingClaim("user_id"))?;
            let user_id = Uuid::parse_str(&raw)
                .map_err(|_| AuthError::InvalidClaim("user_id", raw.clone()))?;
            Ok(Identity::User(UserClaims {
                user_id,
                tenant_id,
                role,
                expires_at,
                issued_at,
            }))
        }
    }
}

impl TryFrom<serde_json::Value> for Identity {
    type Error = AuthError;

    fn try_from(value: serde_json::Value) -> AuthResult<Self> {
        let repr: ClaimsRepr = serde_json::from_value(value)
            .map_err(|err| AuthError::InvalidJson(err.to_string()))?;
        Identity::try_from(repr)
    }
}
