use tracing::{debug, error, info};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        session::Session,
    },
    error::AppError,
    model::role::Role,
    repository::{AccountRepository, RepoError},
    utils::{username_cache, username_filter},
};

/// Checks a username/password pair. The username is matched without regard
/// to case, the password exactly. Every failure looks the same to the
/// caller so account names cannot be enumerated.
pub async fn authenticate(
    accounts: &dyn AccountRepository,
    username: &str,
    password: &str,
) -> Result<Session, AppError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::validation(
            "Please enter both username and password.",
        ));
    }

    let account = match accounts.find_by_username(username).await? {
        Some(account) => account,
        None => {
            info!("Invalid credentials: user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if let Err(e) = verify_password(password, &account.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::invalid_credentials());
    }

    debug!(user_id = account.id, "Password verified");

    Ok(Session {
        user_id: account.id,
        username: account.username,
        role: account.role,
    })
}

/// true  => username AVAILABLE
/// false => username TAKEN
pub async fn is_username_available(
    accounts: &dyn AccountRepository,
    username: &str,
) -> Result<bool, RepoError> {
    let username = username.to_lowercase();

    // cuckoo filter: a miss is definitive once warmed up
    if !username_filter::might_exist(&username) {
        return Ok(true);
    }

    // moka cache: a hit is definitive
    if username_cache::is_taken(&username).await {
        return Ok(false);
    }

    Ok(!accounts.username_exists(&username).await?)
}

/// Creates a member account. Returns the new account id.
pub async fn register(
    accounts: &dyn AccountRepository,
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<u64, AppError> {
    let username = username.trim();

    if username.is_empty() || password.trim().is_empty() || confirm_password.trim().is_empty() {
        return Err(AppError::validation("Please fill all fields."));
    }
    if password != confirm_password {
        return Err(AppError::validation("Passwords do not match."));
    }

    if !is_username_available(accounts, username).await? {
        return Err(AppError::Conflict(
            "That username is already taken.".to_string(),
        ));
    }

    let hashed = hash_password(password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        AppError::Internal
    })?;

    let id = accounts.create(username, &hashed, Role::Member).await.map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::Conflict("That username is already taken.".to_string()),
        other => other.into(),
    })?;

    username_filter::insert(username);
    username_cache::mark_taken(username).await;

    info!(user_id = id, "Account registered");
    Ok(id)
}
