//! Helpers for driving the HTTP surface against in-memory repositories.

use std::net::SocketAddr;

use actix_web::test::TestRequest;

use crate::{
    auth::{jwt::generate_access_token, session::Session},
    config::Config,
    model::role::Role,
};

/// Builds the full application (routes, middleware, rate limiters) over the
/// given `Repositories`.
macro_rules! test_app {
    ($repos:expr) => {{
        let config = $crate::config::Config::for_tests();
        let repos: $crate::repository::Repositories = $repos.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(config.clone()))
                .configure(|cfg| repos.register(cfg))
                .configure(|cfg| $crate::routes::configure(cfg, config.clone())),
        )
        .await
    }};
}
pub(crate) use test_app;

fn peer() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 40_000))
}

pub fn get(uri: &str) -> TestRequest {
    TestRequest::get().uri(uri).peer_addr(peer())
}

pub fn post(uri: &str) -> TestRequest {
    TestRequest::post().uri(uri).peer_addr(peer())
}

pub fn put(uri: &str) -> TestRequest {
    TestRequest::put().uri(uri).peer_addr(peer())
}

pub fn delete(uri: &str) -> TestRequest {
    TestRequest::delete().uri(uri).peer_addr(peer())
}

/// `Authorization` header for a signed-in user of `role`.
pub fn bearer(role: Role) -> (&'static str, String) {
    let session = Session {
        user_id: match role {
            Role::Admin => 1,
            Role::Member => 2,
        },
        username: role.to_string(),
        role,
    };
    let config = Config::for_tests();
    let token = generate_access_token(&session, &config.jwt_secret, config.access_token_ttl)
        .expect("sign test token");
    ("Authorization", format!("Bearer {token}"))
}
