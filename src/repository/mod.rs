//! Persistence seam. Each repository wraps one table behind an object-safe
//! trait so handlers can be served by MySQL in production and by in-memory
//! stores in tests.

pub mod account;
pub mod booking;
pub mod program;
pub mod staff;
pub mod token;

#[cfg(test)]
pub mod memory;
#[cfg(test)]
mod mysql_tests;

use std::sync::Arc;

use actix_web::web::{Data, ServiceConfig};
use sqlx::MySqlPool;
use thiserror::Error;

pub use account::{AccountRepository, MySqlAccountRepository};
pub use booking::{BookingRepository, MySqlBookingRepository};
pub use program::{MySqlProgramRepository, ProgramRepository};
pub use staff::{MySqlStaffRepository, StaffRepository};
pub use token::{MySqlTokenRepository, TokenRepository};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// MySQL reports unique-key violations as SQLSTATE 23000.
pub(crate) fn is_duplicate_key(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000"))
}

pub(crate) fn decode_error<E>(err: E) -> RepoError
where
    E: std::error::Error + Send + Sync + 'static,
{
    RepoError::Database(sqlx::Error::Decode(Box::new(err)))
}

#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub staff: Arc<dyn StaffRepository>,
    pub programs: Arc<dyn ProgramRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl Repositories {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            accounts: Arc::new(MySqlAccountRepository::new(pool.clone())),
            tokens: Arc::new(MySqlTokenRepository::new(pool.clone())),
            staff: Arc::new(MySqlStaffRepository::new(pool.clone())),
            programs: Arc::new(MySqlProgramRepository::new(pool.clone())),
            bookings: Arc::new(MySqlBookingRepository::new(pool)),
        }
    }

    /// Registers every repository as `Data<dyn …>` app data.
    pub fn register(&self, cfg: &mut ServiceConfig) {
        cfg.app_data(Data::from(self.accounts.clone()))
            .app_data(Data::from(self.tokens.clone()))
            .app_data(Data::from(self.staff.clone()))
            .app_data(Data::from(self.programs.clone()))
            .app_data(Data::from(self.bookings.clone()));
    }
}
