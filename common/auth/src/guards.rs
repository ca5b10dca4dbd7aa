use axum::http::StatusCode;

use crate::claims::{DeviceClaims, Identity};
use crate::AuthContext;

#[derive(Debug, Clone)]
pub enum GuardError {
    DeviceOnly,
    Forbidden { required: Vec<String> },
}

impl GuardError {
    pub fn into_response(self) -> (StatusCode, String) {
        match self {
            GuardError::DeviceOnly => (
                StatusCode::FORBIDDEN,
                "only photobooth devices may access this resource".to_string(),
            ),
            GuardError::Forbidden { required } => (
                StatusCode::FORBIDDEN,
                if required.is_empty() {
                    "Insufficient role".to_string()
                } else {
                    format!("Insufficient role. Required one of: {}", required.join(", "))
                },
            ),
        }
    }
}

impl From<GuardError> for (StatusCode, String) {
    fn from(value: GuardError) -> Self {
        value.into_response()
    }
}

/// Secondary check for device-only routes. Never re-validates the token,
/// only re-checks the identity already resolved by the extractor.
pub fn ensure_device(auth: &AuthContext) -> Result<&DeviceClaims, GuardError> {
    match &auth.identity {
        Identity::Device(claims) => Ok(claims),
        Identity::User(_) => Err(GuardError::DeviceOnly),
    }
}

/// Restrict a route to user identities holding one of the allowed roles.
/// Device identities never pass.
pub fn ensure_role(auth: &AuthContext, allowed: &[&str]) -> Result<(), GuardError> {
    if allowed.is_empty() {
        return Ok(());
    }

    let has_role = match &auth.identity {
        Identity::User(claims) => allowed.iter().any(|required| claims.role == *required),
        Identity::Device(_) => false,
    };

    if has_role {
        Ok(())
    } else {
        Err(GuardError::Forbidden {
            required: allowed.iter().map(|value| value.to_string()).collect(),
        })
    }
}
