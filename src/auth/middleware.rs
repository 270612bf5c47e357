use crate::auth::jwt::verify_token;
use crate::auth::session::Session;
use crate::config::Config;
use crate::models::TokenType;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;
use tracing::debug;

fn reject(req: ServiceRequest, body: serde_json::Value) -> ServiceResponse<BoxBody> {
    let resp = HttpResponse::Unauthorized().json(body);
    req.into_response(resp.map_into_boxed_body())
}

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?
        .clone();

    let header = req
        .headers()
        .get("Authorization")
        .map(|h| h.to_str().map(str::to_owned));

    let header_value = match header {
        Some(Ok(v)) => v,
        Some(Err(_)) => {
            return Ok(reject(
                req,
                json!({"error": "Invalid Authorization header encoding"}),
            ));
        }
        None => {
            return Ok(reject(req, json!({"error": "Missing Authorization header"})));
        }
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            return Ok(reject(
                req,
                json!({"error": "Authorization header must start with Bearer"}),
            ));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            return Ok(reject(
                req,
                json!({"error": "Invalid or expired token", "details": e}),
            ));
        }
    };

    // refresh tokens only buy new access tokens
    if claims.token_type != TokenType::Access {
        return Ok(reject(req, json!({"error": "Access token required"})));
    }

    let session = Session::from(claims);
    debug!(user_id = session.user_id, role = %session.role, "Session attached");
    req.extensions_mut().insert(session);

    next.call(req).await
}
