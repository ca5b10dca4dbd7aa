pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod guards;
pub mod roles;
pub mod verifier;

pub use claims::{DeviceClaims, Identity, UserClaims};
pub use config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use extractors::AuthContext;
pub use guards::{ensure_device, ensure_role, GuardError};
pub use roles::{ROLE_DEVICE, ROLE_OWNER, ROLE_STAFF, USER_ROLES};
pub use verifier::TokenVerifier;
