use anyhow::{anyhow, Result};
use std::env;

/// Process-wide configuration, read from the environment exactly once at
/// startup and passed by injection from then on.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
}

pub fn load_config() -> Result<AppConfig> {
    let database_url = required_env("DATABASE_URL")?;
    let jwt_secret = required_env("JWT_SECRET")?;

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);

    Ok(AppConfig {
        database_url,
        jwt_secret,
        host,
        port,
    })
}

fn required_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow!("Missing critical configuration: {key} must be set")),
    }
}
