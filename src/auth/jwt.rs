use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{
    auth::session::Session,
    models::{Claims, TokenType},
};

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

fn claims_for(session: &Session, token_type: TokenType, ttl: usize) -> Claims {
    Claims {
        user_id: session.user_id,
        sub: session.username.clone(),
        role: session.role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type,
    }
}

pub fn generate_access_token(session: &Session, secret: &str, ttl: usize) -> Result<String, Error> {
    let claims = claims_for(session, TokenType::Access, ttl);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn generate_refresh_token(
    session: &Session,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    let claims = claims_for(session, TokenType::Refresh, ttl);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Session {
            user_id: claims.user_id,
            username: claims.sub,
            role: claims.role,
        }
    }
}
