use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, model::role::Role};

/// Identity of the signed-in user for the lifetime of one token. Created
/// on login, injected into each protected request by the auth middleware,
/// dropped on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Session {
    pub user_id: u64,
    pub username: String,
    pub role: Role,
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Session>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string())),
        )
    }
}

impl Session {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin only".to_string()))
        }
    }
}
