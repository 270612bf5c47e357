//! Runs the MySQL repositories against a live server. Skipped unless
//! `DATABASE_URL` points at a database the tests may write to; every row
//! they insert carries a random tag and is deleted again.

use chrono::NaiveDate;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{
    BookingRepository, MySqlBookingRepository, MySqlProgramRepository, MySqlStaffRepository,
    ProgramRepository, RepoError, StaffRepository,
};
use crate::{
    db::{ensure_schema, init_db},
    model::{
        booking::{BookingDetails, MembershipType},
        program::ProgramDetails,
        staff::{Gender, StaffDetails, StaffRole},
    },
};

async fn pool() -> Option<MySqlPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = init_db(&url).await.expect("connect to DATABASE_URL");
    ensure_schema(&pool).await.expect("create tables");
    Some(pool)
}

fn tag() -> String {
    Uuid::new_v4().to_simple().to_string()[..8].to_string()
}

fn contact() -> String {
    format!("07{:08}", Uuid::new_v4().as_u128() % 100_000_000)
}

fn staff(name: &str, tag: &str) -> StaffDetails {
    StaffDetails {
        name: name.to_string(),
        gender: Gender::Female,
        role: StaffRole::Reception,
        contact: contact(),
        email: format!("{}.{tag}@fitlife.lk", Uuid::new_v4().to_simple()),
        salary: 50_000,
    }
}

#[actix_web::test]
async fn staff_round_trip() {
    let Some(pool) = pool().await else { return };
    let repo = MySqlStaffRepository::new(pool);
    let tag = tag();

    let plain = staff(&format!("Rep {tag}"), &tag);
    let percent = staff(&format!("Rep {tag}% off"), &tag);
    let plain_id = repo.create(&plain).await.unwrap();
    let percent_id = repo.create(&percent).await.unwrap();

    let fetched = repo.get(plain_id).await.unwrap().unwrap();
    assert_eq!(fetched.details, plain);

    // `%` in the keyword is literal, and matching ignores case
    let hits = repo.search(&format!("{tag}%")).await.unwrap();
    assert_eq!(hits.iter().map(|s| s.id).collect::<Vec<_>>(), [percent_id]);
    let hits = repo.search(&tag.to_uppercase()).await.unwrap();
    assert_eq!(hits.len(), 2);

    let shouted = plain.email.to_uppercase();
    assert!(repo.find_conflict(&shouted, "0000000000", None).await.unwrap());
    assert!(!repo.find_conflict(&shouted, "0000000000", Some(plain_id)).await.unwrap());

    let mut clash = staff("Clash", &tag);
    clash.contact = plain.contact.clone();
    assert!(matches!(repo.create(&clash).await, Err(RepoError::Duplicate(_))));

    let mut changed = plain.clone();
    changed.role = StaffRole::Trainer;
    changed.salary = 70_000;
    repo.update(plain_id, &changed).await.unwrap();
    assert_eq!(repo.get(plain_id).await.unwrap().unwrap().details, changed);
    assert!(repo.trainer_names().await.unwrap().contains(&changed.name));

    repo.delete(plain_id).await.unwrap();
    repo.delete(percent_id).await.unwrap();
    assert!(repo.get(plain_id).await.unwrap().is_none());
    assert!(matches!(repo.delete(plain_id).await, Err(RepoError::NotFound(_))));
    assert!(matches!(
        repo.update(plain_id, &changed).await,
        Err(RepoError::NotFound(_))
    ));
}

#[actix_web::test]
async fn programs_and_bookings_round_trip() {
    let Some(pool) = pool().await else { return };
    let programs = MySqlProgramRepository::new(pool.clone());
    let bookings = MySqlBookingRepository::new(pool);
    let tag = tag();

    let program = ProgramDetails {
        name: format!("Spin {tag}"),
        cost_per_session: 1_000,
        description: "Indoor cycling".to_string(),
        trainer: "Anne Fernando".to_string(),
    };
    let program_id = programs.create(&program).await.unwrap();
    assert!(programs.exists_by_name(&program.name.to_uppercase()).await.unwrap());
    let hits = programs.search(&format!("  SPIN {tag} ")).await.unwrap();
    assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), [program_id]);

    let details = BookingDetails {
        full_name: format!("Member {tag}"),
        contact: contact(),
        membership_type: MembershipType::Quarterly,
        program: program.name.clone(),
        start_date: NaiveDate::from_ymd_opt(2026, 1, 5),
        sessions: 10,
        total_cost: 10_000,
    };
    let code = bookings.create(None, &details).await.unwrap();
    assert!(bookings.max_id().await.unwrap().unwrap() >= code.id());
    assert_eq!(bookings.get(code).await.unwrap().unwrap().details, details);

    assert!(matches!(
        bookings.create(Some(code), &details).await,
        Err(RepoError::Duplicate(_))
    ));

    let mut changed = details.clone();
    changed.sessions = 5;
    changed.total_cost = 5_000;
    changed.start_date = None;
    bookings.update(code, &changed).await.unwrap();
    assert_eq!(bookings.get(code).await.unwrap().unwrap().details, changed);

    bookings.delete(code).await.unwrap();
    programs.delete(program_id).await.unwrap();
    assert!(bookings.get(code).await.unwrap().is_none());
    assert!(matches!(bookings.delete(code).await, Err(RepoError::NotFound(_))));
    assert!(matches!(
        bookings.update(code, &changed).await,
        Err(RepoError::NotFound(_))
    ));
    assert!(matches!(programs.delete(program_id).await, Err(RepoError::NotFound(_))));
}
