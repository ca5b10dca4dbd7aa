/// Runtime configuration for token verification.
///
/// Built once at startup from the loaded application config and injected into
/// the verifier; the signing secret is never re-read from the environment.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared symmetric signing secret (HS256).
    pub secret: String,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
}

impl JwtConfig {
    /// Construct config with sensible defaults (30 second leeway).
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            leeway_seconds: 30,
        }
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}
