use crate::{
    auth::{
        credentials,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        session::Session,
    },
    config::Config,
    error::AppError,
    models::{LoginReqDto, RegisterReq, TokenType},
    repository::{AccountRepository, TokenRepository},
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub session: Session,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// Access + refresh pair for `session`; the refresh `jti` is persisted.
async fn issue_tokens(
    session: Session,
    tokens: &dyn TokenRepository,
    config: &Config,
) -> Result<LoginResponse, AppError> {
    let access_token =
        generate_access_token(&session, &config.jwt_secret, config.access_token_ttl).map_err(
            |e| {
                error!(error = %e, "Failed to sign access token");
                AppError::Internal
            },
        )?;

    let (refresh_token, refresh_claims) =
        generate_refresh_token(&session, &config.jwt_secret, config.refresh_token_ttl).map_err(
            |e| {
                error!(error = %e, "Failed to sign refresh token");
                AppError::Internal
            },
        )?;

    debug!(user_id = session.user_id, jti = %refresh_claims.jti, "Storing refresh token");
    tokens
        .store(session.user_id, &refresh_claims.jti, refresh_claims.exp)
        .await?;

    Ok(LoginResponse {
        access_token,
        refresh_token,
        session,
    })
}

/// Register a member account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Account created", body = Object, example = json!({
            "message": "Account created successfully!"
        })),
        (status = 400, description = "Missing fields or password mismatch"),
        (status = 409, description = "Username already taken")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_register", skip(accounts, user), fields(username = %user.username))]
pub async fn register(
    user: web::Json<RegisterReq>,
    accounts: web::Data<dyn AccountRepository>,
) -> Result<HttpResponse, AppError> {
    let id = credentials::register(
        accounts.get_ref(),
        &user.username,
        &user.password,
        &user.confirm_password,
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Account created successfully!",
        "user_id": id
    })))
}

/// Sign in
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(accounts, tokens, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    accounts: web::Data<dyn AccountRepository>,
    tokens: web::Data<dyn TokenRepository>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let session = credentials::authenticate(accounts.get_ref(), &user.username, &user.password)
        .await?;

    let user_id = session.user_id;
    let response = issue_tokens(session, tokens.get_ref(), &config).await?;

    if let Err(e) = accounts.touch_last_login(user_id).await {
        // not worth failing the login over
        error!(error = %e, "Failed to update last_login_at");
    }

    info!(user_id, "Login successful");
    Ok(HttpResponse::Ok().json(response))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New token pair", body = LoginResponse),
        (status = 401, description = "Missing, revoked or invalid refresh token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh_token(
    req: HttpRequest,
    tokens: web::Data<dyn TokenRepository>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let token =
        bearer_token(&req).ok_or_else(|| AppError::Unauthorized("No token".to_string()))?;

    let claims = verify_token(&token, &config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::Unauthorized("Refresh token required".to_string()));
    }

    match tokens.find_active(&claims.jti).await? {
        Some(owner) if owner == claims.user_id => {}
        _ => return Err(AppError::Unauthorized("Session has ended".to_string())),
    }

    // rotate: the presented token is spent, and only one caller may spend it
    if !tokens.revoke(&claims.jti).await? {
        return Err(AppError::Unauthorized("Session has ended".to_string()));
    }

    let response = issue_tokens(Session::from(claims), tokens.get_ref(), &config).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Sign out. Always succeeds; revokes the refresh token when one is presented.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Signed out")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    req: HttpRequest,
    tokens: web::Data<dyn TokenRepository>,
    config: web::Data<Config>,
) -> HttpResponse {
    let Some(token) = bearer_token(&req) else {
        return HttpResponse::NoContent().finish();
    };

    let Ok(claims) = verify_token(&token, &config.jwt_secret) else {
        return HttpResponse::NoContent().finish();
    };

    if claims.token_type == TokenType::Refresh {
        if let Err(e) = tokens.revoke(&claims.jti).await {
            error!(error = %e, "Failed to revoke refresh token");
        }
    }

    HttpResponse::NoContent().finish()
}

/// Current session
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, body = Session),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(session)
}
