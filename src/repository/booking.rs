use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};

use super::{RepoError, RepoResult, decode_error, is_duplicate_key};
use crate::booking_code::BookingCode;
use crate::model::booking::{Booking, BookingDetails};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts a booking. Without an explicit code the store's
    /// auto-increment key decides it, so concurrent writers never collide.
    async fn create(
        &self,
        code: Option<BookingCode>,
        booking: &BookingDetails,
    ) -> RepoResult<BookingCode>;
    async fn list(&self) -> RepoResult<Vec<Booking>>;
    async fn get(&self, code: BookingCode) -> RepoResult<Option<Booking>>;
    async fn update(&self, code: BookingCode, booking: &BookingDetails) -> RepoResult<()>;
    async fn delete(&self, code: BookingCode) -> RepoResult<()>;
    /// Highest booking key in use, if any.
    async fn max_id(&self) -> RepoResult<Option<u64>>;
}

#[derive(FromRow)]
struct BookingRow {
    booking_id: u64,
    full_name: String,
    contact: String,
    membership_type: String,
    program: String,
    start_date: Option<NaiveDate>,
    sessions: u32,
    total_cost: u32,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepoError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let booking_code = BookingCode::from_id(row.booking_id).ok_or_else(|| {
            RepoError::Database(sqlx::Error::Protocol(format!(
                "booking_id {} cannot be formatted",
                row.booking_id
            )))
        })?;

        Ok(Booking {
            booking_code,
            details: BookingDetails {
                full_name: row.full_name,
                contact: row.contact,
                membership_type: row.membership_type.parse().map_err(decode_error)?,
                program: row.program,
                start_date: row.start_date,
                sessions: row.sessions,
                total_cost: row.total_cost,
            },
        })
    }
}

const SELECT_BOOKING: &str = "SELECT booking_id, full_name, contact, membership_type, program, start_date, sessions, total_cost FROM bookings";

pub struct MySqlBookingRepository {
    pool: MySqlPool,
}

impl MySqlBookingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for MySqlBookingRepository {
    async fn create(
        &self,
        code: Option<BookingCode>,
        booking: &BookingDetails,
    ) -> RepoResult<BookingCode> {
        // NULL lets AUTO_INCREMENT pick the key
        let result = sqlx::query(
            r#"
            INSERT INTO bookings
            (booking_id, full_name, contact, membership_type, program, start_date, sessions, total_cost)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(code.map(BookingCode::id))
        .bind(&booking.full_name)
        .bind(&booking.contact)
        .bind(booking.membership_type.as_ref())
        .bind(&booking.program)
        .bind(booking.start_date)
        .bind(booking.sessions)
        .bind(booking.total_cost)
        .execute(&self.pool)
        .await
        .map_err(|e| match code {
            Some(code) if is_duplicate_key(&e) => RepoError::Duplicate(format!("Booking {code}")),
            _ => e.into(),
        })?;

        BookingCode::from_id(result.last_insert_id()).ok_or_else(|| {
            RepoError::Database(sqlx::Error::Protocol(
                "insert returned no booking id".to_string(),
            ))
        })
    }

    async fn list(&self) -> RepoResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} ORDER BY booking_id"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn get(&self, code: BookingCode) -> RepoResult<Option<Booking>> {
        sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} WHERE booking_id = ?"))
            .bind(code.id())
            .fetch_optional(&self.pool)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn update(&self, code: BookingCode, booking: &BookingDetails) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET full_name = ?, contact = ?, membership_type = ?, program = ?,
                start_date = ?, sessions = ?, total_cost = ?
            WHERE booking_id = ?
            "#,
        )
        .bind(&booking.full_name)
        .bind(&booking.contact)
        .bind(booking.membership_type.as_ref())
        .bind(&booking.program)
        .bind(booking.start_date)
        .bind(booking.sessions)
        .bind(booking.total_cost)
        .bind(code.id())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Booking {code}")));
        }
        Ok(())
    }

    async fn delete(&self, code: BookingCode) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE booking_id = ?")
            .bind(code.id())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Booking {code}")));
        }
        Ok(())
    }

    async fn max_id(&self) -> RepoResult<Option<u64>> {
        let max = sqlx::query_scalar::<_, Option<u64>>("SELECT MAX(booking_id) FROM bookings")
            .fetch_one(&self.pool)
            .await?;
        Ok(max)
    }
}
