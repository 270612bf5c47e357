use sqlx::MySqlPool;
use tracing::info;

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS login (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(64) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        type VARCHAR(16) NOT NULL DEFAULT 'member',
        last_login_at DATETIME NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS session_tokens (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        user_id BIGINT UNSIGNED NOT NULL,
        jti VARCHAR(64) NOT NULL UNIQUE,
        expires_at DATETIME NOT NULL,
        revoked BOOLEAN NOT NULL DEFAULT FALSE,
        FOREIGN KEY (user_id) REFERENCES login(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS staff (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(128) NOT NULL,
        gender VARCHAR(16) NOT NULL,
        role VARCHAR(32) NOT NULL,
        contact CHAR(10) NOT NULL UNIQUE,
        email VARCHAR(255) NOT NULL UNIQUE,
        salary INT UNSIGNED NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS program (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(128) NOT NULL,
        cost_per_session INT UNSIGNED NOT NULL,
        description TEXT NOT NULL,
        trainer VARCHAR(128) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        booking_id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        full_name VARCHAR(128) NOT NULL,
        contact CHAR(10) NOT NULL,
        membership_type VARCHAR(16) NOT NULL,
        program VARCHAR(128) NOT NULL,
        start_date DATE NULL,
        sessions INT UNSIGNED NOT NULL,
        total_cost INT UNSIGNED NOT NULL
    )
    "#,
];

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPool::connect(database_url).await
}

/// Creates any missing table. Existing tables are left untouched.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(tables = SCHEMA.len(), "Schema ready");
    Ok(())
}
