use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};

use super::{RepoError, RepoResult, decode_error, is_duplicate_key};
use crate::model::{account::Account, role::Role};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Case-insensitive lookup.
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>>;
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;
    async fn create(&self, username: &str, password_hash: &str, role: Role) -> RepoResult<u64>;
    async fn touch_last_login(&self, id: u64) -> RepoResult<()>;
}

#[derive(FromRow)]
struct AccountRow {
    id: u64,
    username: String,
    password: String,
    role: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepoError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: row.id,
            username: row.username,
            password: row.password,
            role: row.role.parse().map_err(decode_error)?,
        })
    }
}

pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, password, `type` AS role
            FROM login
            WHERE LOWER(username) = LOWER(?)
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .map(Account::try_from)
        .transpose()
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM login WHERE LOWER(username) = LOWER(?)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn create(&self, username: &str, password_hash: &str, role: Role) -> RepoResult<u64> {
        let result = sqlx::query("INSERT INTO login (username, password, `type`) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password_hash)
            .bind(role.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    RepoError::Duplicate("Username".to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(result.last_insert_id())
    }

    async fn touch_last_login(&self, id: u64) -> RepoResult<()> {
        sqlx::query("UPDATE login SET last_login_at = NOW() WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
