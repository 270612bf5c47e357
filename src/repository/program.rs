use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};

use super::{RepoError, RepoResult};
use crate::model::program::{Program, ProgramDetails};
use crate::utils::search::{like_pattern, normalize_keyword};

#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn create(&self, program: &ProgramDetails) -> RepoResult<u64>;
    async fn list(&self) -> RepoResult<Vec<Program>>;
    async fn get(&self, id: u64) -> RepoResult<Option<Program>>;
    async fn update(&self, id: u64, program: &ProgramDetails) -> RepoResult<()>;
    async fn delete(&self, id: u64) -> RepoResult<()>;
    /// Matches name, description and trainer.
    async fn search(&self, keyword: &str) -> RepoResult<Vec<Program>>;
    async fn exists_by_name(&self, name: &str) -> RepoResult<bool>;
}

#[derive(FromRow)]
struct ProgramRow {
    id: u64,
    name: String,
    cost_per_session: u32,
    description: String,
    trainer: String,
}

impl From<ProgramRow> for Program {
    fn from(row: ProgramRow) -> Self {
        Program {
            id: row.id,
            details: ProgramDetails {
                name: row.name,
                cost_per_session: row.cost_per_session,
                description: row.description,
                trainer: row.trainer,
            },
        }
    }
}

const SELECT_PROGRAM: &str =
    "SELECT id, name, cost_per_session, description, trainer FROM program";

pub struct MySqlProgramRepository {
    pool: MySqlPool,
}

impl MySqlProgramRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramRepository for MySqlProgramRepository {
    async fn create(&self, program: &ProgramDetails) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO program (name, cost_per_session, description, trainer)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&program.name)
        .bind(program.cost_per_session)
        .bind(&program.description)
        .bind(&program.trainer)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn list(&self) -> RepoResult<Vec<Program>> {
        let rows = sqlx::query_as::<_, ProgramRow>(&format!("{SELECT_PROGRAM} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Program::from).collect())
    }

    async fn get(&self, id: u64) -> RepoResult<Option<Program>> {
        let row = sqlx::query_as::<_, ProgramRow>(&format!("{SELECT_PROGRAM} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Program::from))
    }

    async fn update(&self, id: u64, program: &ProgramDetails) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE program
            SET name = ?, cost_per_session = ?, description = ?, trainer = ?
            WHERE id = ?
            "#,
        )
        .bind(&program.name)
        .bind(program.cost_per_session)
        .bind(&program.description)
        .bind(&program.trainer)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound("Program".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM program WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound("Program".to_string()));
        }
        Ok(())
    }

    async fn search(&self, keyword: &str) -> RepoResult<Vec<Program>> {
        let Some(needle) = normalize_keyword(keyword) else {
            return self.list().await;
        };
        let like = like_pattern(&needle);

        let rows = sqlx::query_as::<_, ProgramRow>(&format!(
            "{SELECT_PROGRAM} WHERE LOWER(name) LIKE ? OR LOWER(description) LIKE ? OR LOWER(trainer) LIKE ? ORDER BY id"
        ))
        .bind(&like)
        .bind(&like)
        .bind(&like)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Program::from).collect())
    }

    async fn exists_by_name(&self, name: &str) -> RepoResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM program WHERE LOWER(name) = LOWER(?)",
        )
        .bind(name.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }
}
