use async_trait::async_trait;
use sqlx::MySqlPool;

use super::RepoResult;

/// Refresh tokens issued at login, keyed by their `jti` claim.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn store(&self, user_id: u64, jti: &str, expires_at: usize) -> RepoResult<()>;
    /// Owner of `jti` if it is known, unexpired and not revoked.
    async fn find_active(&self, jti: &str) -> RepoResult<Option<u64>>;
    /// Returns whether a live token was revoked. Revoking twice is harmless.
    async fn revoke(&self, jti: &str) -> RepoResult<bool>;
}

pub struct MySqlTokenRepository {
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn store(&self, user_id: u64, jti: &str, expires_at: usize) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_tokens (user_id, jti, expires_at)
            VALUES (?, ?, FROM_UNIXTIME(?))
            "#,
        )
        .bind(user_id)
        .bind(jti)
        .bind(expires_at as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_active(&self, jti: &str) -> RepoResult<Option<u64>> {
        let user_id = sqlx::query_scalar::<_, u64>(
            r#"
            SELECT user_id FROM session_tokens
            WHERE jti = ? AND revoked = FALSE AND expires_at > NOW()
            "#,
        )
        .bind(jti)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user_id)
    }

    async fn revoke(&self, jti: &str) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE session_tokens SET revoked = TRUE WHERE jti = ? AND revoked = FALSE")
                .bind(jti)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
