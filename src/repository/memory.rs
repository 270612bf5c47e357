//! In-memory repositories backing handler and service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{
    AccountRepository, BookingRepository, ProgramRepository, RepoError, RepoResult, Repositories,
    StaffRepository, TokenRepository,
};
use crate::booking_code::BookingCode;
use crate::model::{
    account::Account,
    booking::{Booking, BookingDetails},
    program::{Program, ProgramDetails},
    role::Role,
    staff::{Staff, StaffDetails, StaffRole},
};
use crate::utils::search::matches_any;

struct Table<T> {
    next_id: u64,
    rows: Vec<(u64, T)>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert(&mut self, row: T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push((id, row));
        id
    }

    fn insert_with_id(&mut self, id: u64, row: T) -> bool {
        if self.rows.iter().any(|(existing, _)| *existing == id) {
            return false;
        }
        self.next_id = self.next_id.max(id + 1);
        self.rows.push((id, row));
        self.rows.sort_by_key(|(id, _)| *id);
        true
    }

    fn get(&self, id: u64) -> Option<T> {
        self.rows.iter().find(|(i, _)| *i == id).map(|(_, r)| r.clone())
    }

    fn replace(&mut self, id: u64, row: T) -> bool {
        match self.rows.iter_mut().find(|(i, _)| *i == id) {
            Some((_, existing)) => {
                *existing = row;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|(i, _)| *i != id);
        self.rows.len() != before
    }
}

#[derive(Default)]
pub struct MemoryStaffRepository {
    table: Mutex<Table<StaffDetails>>,
}

#[async_trait]
impl StaffRepository for MemoryStaffRepository {
    async fn create(&self, staff: &StaffDetails) -> RepoResult<u64> {
        Ok(self.table.lock().unwrap().insert(staff.clone()))
    }

    async fn list(&self) -> RepoResult<Vec<Staff>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .map(|(id, details)| Staff {
                id: *id,
                details: details.clone(),
            })
            .collect())
    }

    async fn get(&self, id: u64) -> RepoResult<Option<Staff>> {
        let details = self.table.lock().unwrap().get(id);
        Ok(details.map(|details| Staff { id, details }))
    }

    async fn update(&self, id: u64, staff: &StaffDetails) -> RepoResult<()> {
        if self.table.lock().unwrap().replace(id, staff.clone()) {
            Ok(())
        } else {
            Err(RepoError::NotFound("Staff".to_string()))
        }
    }

    async fn delete(&self, id: u64) -> RepoResult<()> {
        if self.table.lock().unwrap().remove(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound("Staff".to_string()))
        }
    }

    async fn search(&self, keyword: &str) -> RepoResult<Vec<Staff>> {
        let all = self.list().await?;
        Ok(all
            .into_iter()
            .filter(|s| matches_any(&s.details.search_fields(), keyword))
            .collect())
    }

    async fn find_conflict(
        &self,
        email: &str,
        contact: &str,
        excluding: Option<u64>,
    ) -> RepoResult<bool> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().any(|(id, s)| {
            Some(*id) != excluding && (s.email.eq_ignore_ascii_case(email) || s.contact == contact)
        }))
    }

    async fn trainer_names(&self) -> RepoResult<Vec<String>> {
        let table = self.table.lock().unwrap();
        let mut names: Vec<String> = table
            .rows
            .iter()
            .filter(|(_, s)| s.role == StaffRole::Trainer)
            .map(|(_, s)| s.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}

#[derive(Default)]
pub struct MemoryProgramRepository {
    table: Mutex<Table<ProgramDetails>>,
}

#[async_trait]
impl ProgramRepository for MemoryProgramRepository {
    async fn create(&self, program: &ProgramDetails) -> RepoResult<u64> {
        Ok(self.table.lock().unwrap().insert(program.clone()))
    }

    async fn list(&self) -> RepoResult<Vec<Program>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .map(|(id, details)| Program {
                id: *id,
                details: details.clone(),
            })
            .collect())
    }

    async fn get(&self, id: u64) -> RepoResult<Option<Program>> {
        let details = self.table.lock().unwrap().get(id);
        Ok(details.map(|details| Program { id, details }))
    }

    async fn update(&self, id: u64, program: &ProgramDetails) -> RepoResult<()> {
        if self.table.lock().unwrap().replace(id, program.clone()) {
            Ok(())
        } else {
            Err(RepoError::NotFound("Program".to_string()))
        }
    }

    async fn delete(&self, id: u64) -> RepoResult<()> {
        if self.table.lock().unwrap().remove(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound("Program".to_string()))
        }
    }

    async fn search(&self, keyword: &str) -> RepoResult<Vec<Program>> {
        let all = self.list().await?;
        Ok(all
            .into_iter()
            .filter(|p| matches_any(&p.details.search_fields(), keyword))
            .collect())
    }

    async fn exists_by_name(&self, name: &str) -> RepoResult<bool> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .any(|(_, p)| p.name.eq_ignore_ascii_case(name.trim())))
    }
}

#[derive(Default)]
pub struct MemoryBookingRepository {
    table: Mutex<Table<BookingDetails>>,
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn create(
        &self,
        code: Option<BookingCode>,
        booking: &BookingDetails,
    ) -> RepoResult<BookingCode> {
        let mut table = self.table.lock().unwrap();
        let id = match code {
            Some(code) => {
                if !table.insert_with_id(code.id(), booking.clone()) {
                    return Err(RepoError::Duplicate(format!("Booking {code}")));
                }
                code.id()
            }
            None => table.insert(booking.clone()),
        };
        Ok(BookingCode::from_id(id).unwrap())
    }

    async fn list(&self) -> RepoResult<Vec<Booking>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .map(|(id, details)| Booking {
                booking_code: BookingCode::from_id(*id).unwrap(),
                details: details.clone(),
            })
            .collect())
    }

    async fn get(&self, code: BookingCode) -> RepoResult<Option<Booking>> {
        let details = self.table.lock().unwrap().get(code.id());
        Ok(details.map(|details| Booking {
            booking_code: code,
            details,
        }))
    }

    async fn update(&self, code: BookingCode, booking: &BookingDetails) -> RepoResult<()> {
        if self.table.lock().unwrap().replace(code.id(), booking.clone()) {
            Ok(())
        } else {
            Err(RepoError::NotFound(format!("Booking {code}")))
        }
    }

    async fn delete(&self, code: BookingCode) -> RepoResult<()> {
        if self.table.lock().unwrap().remove(code.id()) {
            Ok(())
        } else {
            Err(RepoError::NotFound(format!("Booking {code}")))
        }
    }

    async fn max_id(&self) -> RepoResult<Option<u64>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().map(|(id, _)| *id).max())
    }
}

#[derive(Default)]
pub struct MemoryAccountRepository {
    table: Mutex<Table<Account>>,
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .find(|(_, a)| a.username.to_lowercase() == username.to_lowercase())
            .map(|(_, a)| a.clone()))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn create(&self, username: &str, password_hash: &str, role: Role) -> RepoResult<u64> {
        if self.username_exists(username).await? {
            return Err(RepoError::Duplicate("Username".to_string()));
        }
        let mut table = self.table.lock().unwrap();
        let id = table.next_id;
        table.insert(Account {
            id,
            username: username.to_string(),
            password: password_hash.to_string(),
            role,
        });
        Ok(id)
    }

    async fn touch_last_login(&self, _id: u64) -> RepoResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenRepository {
    // jti -> (user_id, revoked)
    tokens: Mutex<HashMap<String, (u64, bool)>>,
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn store(&self, user_id: u64, jti: &str, _expires_at: usize) -> RepoResult<()> {
        self.tokens
            .lock()
            .unwrap()
            .insert(jti.to_string(), (user_id, false));
        Ok(())
    }

    async fn find_active(&self, jti: &str) -> RepoResult<Option<u64>> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .get(jti)
            .filter(|(_, revoked)| !revoked)
            .map(|(user_id, _)| *user_id))
    }

    async fn revoke(&self, jti: &str) -> RepoResult<bool> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.get_mut(jti) {
            Some((_, revoked)) if !*revoked => {
                *revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(MemoryAccountRepository::default()),
            tokens: Arc::new(MemoryTokenRepository::default()),
            staff: Arc::new(MemoryStaffRepository::default()),
            programs: Arc::new(MemoryProgramRepository::default()),
            bookings: Arc::new(MemoryBookingRepository::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::staff::Gender;

    fn yoga() -> ProgramDetails {
        ProgramDetails {
            name: "Power Yoga".into(),
            cost_per_session: 1200,
            description: "Morning flow".into(),
            trainer: "Anne Fernando".into(),
        }
    }

    fn trainer(name: &str, email: &str, contact: &str) -> StaffDetails {
        StaffDetails {
            name: name.into(),
            gender: Gender::Female,
            role: StaffRole::Trainer,
            contact: contact.into(),
            email: email.into(),
            salary: 70_000,
        }
    }

    #[actix_web::test]
    async fn program_round_trip() {
        let repo = MemoryProgramRepository::default();
        let id = repo.create(&yoga()).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].details, yoga());

        let mut changed = yoga();
        changed.cost_per_session = 1500;
        repo.update(id, &changed).await.unwrap();
        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].details, changed);

        repo.delete(id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
        assert!(matches!(repo.delete(id).await, Err(RepoError::NotFound(_))));
    }

    #[actix_web::test]
    async fn staff_conflicts_ignore_the_record_being_edited() {
        let repo = MemoryStaffRepository::default();
        let id = repo
            .create(&trainer("Anne", "anne@fitlife.lk", "0771111111"))
            .await
            .unwrap();

        assert!(repo.find_conflict("ANNE@fitlife.lk", "0000000000", None).await.unwrap());
        assert!(repo.find_conflict("x@fitlife.lk", "0771111111", None).await.unwrap());
        assert!(!repo.find_conflict("anne@fitlife.lk", "0771111111", Some(id)).await.unwrap());
    }

    #[actix_web::test]
    async fn explicit_booking_codes_advance_the_counter() {
        let repo = MemoryBookingRepository::default();
        let details = BookingDetails {
            full_name: "Sahan".into(),
            contact: "0761234567".into(),
            membership_type: crate::model::booking::MembershipType::Monthly,
            program: "Power Yoga".into(),
            start_date: None,
            sessions: 5,
            total_cost: 5000,
        };
        let explicit = BookingCode::from_id(7).unwrap();
        repo.create(Some(explicit), &details).await.unwrap();
        let next = repo.create(None, &details).await.unwrap();
        assert_eq!(next.to_string(), "B008");
        assert!(matches!(
            repo.create(Some(explicit), &details).await,
            Err(RepoError::Duplicate(_))
        ));
    }
}
