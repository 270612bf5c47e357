use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter, ToSchema,
)]
pub enum StaffRole {
    Trainer,
    Reception,
    Cleaner,
    Nutritionist,
}

impl StaffRole {
    /// Salary pre-filled for a new hire in this role.
    pub fn default_salary(self) -> u32 {
        match self {
            StaffRole::Trainer => 70_000,
            StaffRole::Reception => 40_000,
            StaffRole::Cleaner => 30_000,
            StaffRole::Nutritionist => 60_000,
        }
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter, ToSchema,
)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Nimal Perera",
        "gender": "Male",
        "role": "Trainer",
        "contact": "0771234567",
        "email": "nimal@fitlife.lk",
        "salary": 70000
    })
)]
pub struct Staff {
    #[schema(example = 1)]
    pub id: u64,
    #[serde(flatten)]
    pub details: StaffDetails,
}

/// A staff record minus its store-assigned id. Only built from validated input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StaffDetails {
    pub name: String,
    pub gender: Gender,
    pub role: StaffRole,
    pub contact: String,
    pub email: String,
    pub salary: u32,
}

impl StaffDetails {
    pub fn search_fields(&self) -> [&str; 3] {
        [&self.name, self.role.as_ref(), &self.email]
    }
}
