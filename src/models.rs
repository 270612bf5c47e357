use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "kasun")]
    pub username: String,
    #[schema(example = "S3cret!")]
    pub password: String,
    #[schema(example = "S3cret!")]
    pub confirm_password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "Kasun")]
    pub username: String,
    #[schema(example = "S3cret!")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
