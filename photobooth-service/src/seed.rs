use anyhow::Result;
use common_auth::ROLE_OWNER;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::user_handlers::hash_password;

pub const SEED_ADMIN_EMAIL: &str = "admin@photobooth.com";
const SEED_ADMIN_PASSWORD: &str = "password123";
const SEED_TENANT_NAME: &str = "Default Studio";

/// Creates the first tenant and admin account on an empty database so the
/// service is usable right after deployment. Both records are written in one
/// transaction; a populated users table makes this a no-op.
pub async fn seed_admin(pool: &PgPool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let tenant_id = Uuid::new_v4();
    let password_hash = hash_password(SEED_ADMIN_PASSWORD)?;

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO tenants (id, name) VALUES ($1, $2)")
        .bind(tenant_id)
        .bind(SEED_TENANT_NAME)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO users (id, tenant_id, name, email, role, password_hash)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(tenant_id)
    .bind("Administrator")
    .bind(SEED_ADMIN_EMAIL)
    .bind(ROLE_OWNER)
    .bind(password_hash)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(email = SEED_ADMIN_EMAIL, "seeded default admin account");
    Ok(())
}
