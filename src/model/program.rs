use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 4,
        "name": "HIIT Blast",
        "cost_per_session": 1500,
        "description": "High intensity interval training",
        "trainer": "Nimal Perera"
    })
)]
pub struct Program {
    #[schema(example = 4)]
    pub id: u64,
    #[serde(flatten)]
    pub details: ProgramDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProgramDetails {
    pub name: String,
    pub cost_per_session: u32,
    pub description: String,
    /// Trainer name as shown in the trainer dropdown; not a foreign key.
    pub trainer: String,
}

impl ProgramDetails {
    pub fn search_fields(&self) -> [&str; 3] {
        [&self.name, &self.description, &self.trainer]
    }
}
