use super::role::Role;

/// Row of the `login` table. `password` holds an argon2 PHC string.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub role: Role,
}
