pub mod booking;
pub mod navigation;
pub mod program;
pub mod staff;

use serde::Deserialize;
use utoipa::IntoParams;

/// `?search=` on list endpoints. Blank means "everything".
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring
    pub search: Option<String>,
}

impl SearchQuery {
    pub fn keyword(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
