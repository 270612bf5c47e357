use crate::{
    api::{booking, navigation, program, staff},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    HttpRequest,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    middleware::from_fn,
    web,
};
use std::sync::Arc;
use tracing::warn;

/// Per-route limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_else(|| {
            warn!(requests_per_min, "Rate limit rejected, using the default limiter");
            GovernorConfig::default()
        });
    Governor::new(&cfg)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match err {
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {e}"),
        JsonPayloadError::ContentType => "Request body must be JSON".to_string(),
        other => format!("Invalid request body: {other}"),
    };
    AppError::validation(message).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid query string: {err}")).into()
}

fn path_error(_err: PathError, req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound(format!("Nothing at {}", req.path())).into()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // extractor failures answer with the same {"error": ...} body as handlers
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error));

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter)
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter)
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .route("/me", web::get().to(handlers::me))
            .service(
                web::scope("/navigation")
                    .route("", web::get().to(navigation::menu))
                    .route("/{view}", web::get().to(navigation::open_view)),
            )
            .service(
                web::scope("/staff")
                    // /staff
                    .service(
                        web::resource("")
                            .route(web::get().to(staff::list_staff))
                            .route(web::post().to(staff::create_staff)),
                    )
                    // fixed segments before /{id}
                    .route("/trainers", web::get().to(staff::list_trainers))
                    .route("/roles", web::get().to(staff::list_roles))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(staff::get_staff))
                            .route(web::put().to(staff::update_staff))
                            .route(web::delete().to(staff::delete_staff)),
                    ),
            )
            .service(
                web::scope("/programs")
                    .service(
                        web::resource("")
                            .route(web::get().to(program::list_programs))
                            .route(web::post().to(program::create_program)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(program::get_program))
                            .route(web::put().to(program::update_program))
                            .route(web::delete().to(program::delete_program)),
                    ),
            )
            .service(
                web::scope("/bookings")
                    .service(
                        web::resource("")
                            .route(web::get().to(booking::list_bookings))
                            .route(web::post().to(booking::create_booking)),
                    )
                    .route("/quote", web::get().to(booking::quote))
                    .route("/next-code", web::get().to(booking::preview_next_code))
                    .service(
                        web::resource("/{code}")
                            .route(web::get().to(booking::get_booking))
                            .route(web::put().to(booking::update_booking))
                            .route(web::delete().to(booking::delete_booking)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns a new token pair, the old refresh token is revoked
