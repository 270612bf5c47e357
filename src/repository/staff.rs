use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};

use super::{RepoError, RepoResult, decode_error, is_duplicate_key};
use crate::model::staff::{Staff, StaffDetails, StaffRole};
use crate::utils::search::{like_pattern, normalize_keyword};

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn create(&self, staff: &StaffDetails) -> RepoResult<u64>;
    async fn list(&self) -> RepoResult<Vec<Staff>>;
    async fn get(&self, id: u64) -> RepoResult<Option<Staff>>;
    async fn update(&self, id: u64, staff: &StaffDetails) -> RepoResult<()>;
    async fn delete(&self, id: u64) -> RepoResult<()>;
    /// Matches name, role and email.
    async fn search(&self, keyword: &str) -> RepoResult<Vec<Staff>>;
    /// True when another staff member already uses `email` or `contact`.
    async fn find_conflict(&self, email: &str, contact: &str, excluding: Option<u64>)
    -> RepoResult<bool>;
    async fn trainer_names(&self) -> RepoResult<Vec<String>>;
}

#[derive(FromRow)]
struct StaffRow {
    id: u64,
    name: String,
    gender: String,
    role: String,
    contact: String,
    email: String,
    salary: u32,
}

impl TryFrom<StaffRow> for Staff {
    type Error = RepoError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        Ok(Staff {
            id: row.id,
            details: StaffDetails {
                name: row.name,
                gender: row.gender.parse().map_err(decode_error)?,
                role: row.role.parse().map_err(decode_error)?,
                contact: row.contact,
                email: row.email,
                salary: row.salary,
            },
        })
    }
}

fn into_staff(rows: Vec<StaffRow>) -> RepoResult<Vec<Staff>> {
    rows.into_iter().map(Staff::try_from).collect()
}

const SELECT_STAFF: &str = "SELECT id, name, gender, role, contact, email, salary FROM staff";

pub struct MySqlStaffRepository {
    pool: MySqlPool,
}

impl MySqlStaffRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for MySqlStaffRepository {
    async fn create(&self, staff: &StaffDetails) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO staff (name, gender, role, contact, email, salary)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&staff.name)
        .bind(staff.gender.as_ref())
        .bind(staff.role.as_ref())
        .bind(&staff.contact)
        .bind(&staff.email)
        .bind(staff.salary)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                RepoError::Duplicate("Staff member with this email or contact".to_string())
            } else {
                e.into()
            }
        })?;

        Ok(result.last_insert_id())
    }

    async fn list(&self) -> RepoResult<Vec<Staff>> {
        let rows = sqlx::query_as::<_, StaffRow>(&format!("{SELECT_STAFF} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        into_staff(rows)
    }

    async fn get(&self, id: u64) -> RepoResult<Option<Staff>> {
        sqlx::query_as::<_, StaffRow>(&format!("{SELECT_STAFF} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Staff::try_from)
            .transpose()
    }

    async fn update(&self, id: u64, staff: &StaffDetails) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE staff
            SET name = ?, gender = ?, role = ?, contact = ?, email = ?, salary = ?
            WHERE id = ?
            "#,
        )
        .bind(&staff.name)
        .bind(staff.gender.as_ref())
        .bind(staff.role.as_ref())
        .bind(&staff.contact)
        .bind(&staff.email)
        .bind(staff.salary)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                RepoError::Duplicate("Staff member with this email or contact".to_string())
            } else {
                e.into()
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound("Staff".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM staff WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound("Staff".to_string()));
        }
        Ok(())
    }

    async fn search(&self, keyword: &str) -> RepoResult<Vec<Staff>> {
        let Some(needle) = normalize_keyword(keyword) else {
            return self.list().await;
        };
        let like = like_pattern(&needle);

        let rows = sqlx::query_as::<_, StaffRow>(&format!(
            "{SELECT_STAFF} WHERE LOWER(name) LIKE ? OR LOWER(role) LIKE ? OR LOWER(email) LIKE ? ORDER BY id"
        ))
        .bind(&like)
        .bind(&like)
        .bind(&like)
        .fetch_all(&self.pool)
        .await?;
        into_staff(rows)
    }

    async fn find_conflict(
        &self,
        email: &str,
        contact: &str,
        excluding: Option<u64>,
    ) -> RepoResult<bool> {
        // ids start at 1, so 0 excludes nothing
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM staff
            WHERE (LOWER(email) = LOWER(?) OR contact = ?) AND id <> ?
            "#,
        )
        .bind(email)
        .bind(contact)
        .bind(excluding.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn trainer_names(&self) -> RepoResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM staff WHERE role = ? ORDER BY name",
        )
        .bind(StaffRole::Trainer.as_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}
