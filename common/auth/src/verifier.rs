use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;

use crate::claims::Identity;
use crate::config::JwtConfig;
use crate::error::AuthResult;

/// Validates HS256 tokens and resolves them into a typed [`Identity`].
///
/// Both user and device tokens are signed with the same symmetric secret; the
/// two kinds are told apart by claim content alone.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds.into();
        validation.set_required_spec_claims(&["exp"]);
        Self { key, validation }
    }

    pub fn verify(&self, token: &str) -> AuthResult<Identity> {
        let token_data = decode::<Value>(token, &self.key, &self.validation)?;
        Identity::try_from(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use uuid::Uuid;

    const SECRET: &str = "unit-test-secret";

    #[derive(Serialize)]
    struct RawClaims {
        tenant_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        booth_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        exp: i64,
    }

    fn sign(claims: &RawClaims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("sign token")
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(&JwtConfig::new(SECRET).with_leeway(0))
    }

    #[test]
    fn resolves_device_identity() {
        let tenant = Uuid::new_v4();
        let booth = Uuid::new_v4();
        let token = sign(&RawClaims {
            tenant_id: tenant.to_string(),
            user_id: None,
            booth_id: Some(booth.to_string()),
            role: Some("device".to_string()),
            exp: Utc::now().timestamp() + 600,
        });

        let identity = verifier().verify(&token).expect("verify");
        match identity {
            Identity::Device(claims) => {
                assert_eq!(claims.tenant_id, tenant);
                assert_eq!(claims.booth_id, booth);
            }
            Identity::User(_) => panic!("expected device identity"),
        }
    }

    #[test]
    fn resolves_user_identity_with_explicit_role() {
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();
        let token = sign(&RawClaims {
            tenant_id: tenant.to_string(),
            user_id: Some(user.to_string()),
            booth_id: None,
            role: Some("owner".to_string()),
            exp: Utc::now().timestamp() + 600,
        });

        let identity = verifier().verify(&token).expect("verify");
        match identity {
            Identity::User(claims) => {
                assert_eq!(claims.tenant_id, tenant);
                assert_eq!(claims.user_id, user);
                assert_eq!(claims.role, "owner");
            }
            Identity::Device(_) => panic!("expected user identity"),
        }
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign(&RawClaims {
            tenant_id: Uuid::new_v4().to_string(),
            user_id: Some(Uuid::new_v4().to_string()),
            booth_id: None,
            role: None,
            exp: Utc::now().timestamp() - 3600,
        });

        let err = verifier().verify(&token).expect_err("should reject");
        assert!(matches!(err, AuthError::Verification(_)));
    }

    #[test]
    fn rejects_wrong_signing_secret() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &RawClaims {
                tenant_id: Uuid::new_v4().to_string(),
                user_id: Some(Uuid::new_v4().to_string()),
                booth_id: None,
                role: None,
                exp: Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .expect("sign token");

        let err = verifier().verify(&token).expect_err("should reject");
        assert!(matches!(err, AuthError::Verification(_)));
    }

    #[test]
    fn rejects_device_token_missing_booth_id() {
        let token = sign(&RawClaims {
            tenant_id: Uuid::new_v4().to_string(),
            user_id: Some(Uuid::new_v4().to_string()),
            booth_id: None,
            role: Some("device".to_string()),
            exp: Utc::now().timestamp() + 600,
        });

        let err = verifier().verify(&token).expect_err("should reject");
        assert!(matches!(err, AuthError::MissingClaim("booth_id")));
    }
}
