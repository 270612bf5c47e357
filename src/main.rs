use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

mod api;
mod auth;
mod booking_code;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod navigation;
mod pricing;
mod repository;
mod routes;
mod utils;

#[cfg(test)]
mod test_support;

use config::Config;
use db::{ensure_schema, init_db};
use repository::Repositories;

use crate::docs::ApiDoc;
use crate::utils::username_cache;
use crate::utils::username_filter;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "FitLife API"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("connecting to the database")?;
    ensure_schema(&pool)
        .await
        .context("creating tables")?;

    let pool_for_filter_warmup = pool.clone();
    let pool_for_cache_warmup = pool.clone();

    actix_web::rt::spawn(async move {
        if let Err(e) = username_filter::warmup_username_filter(&pool_for_filter_warmup, 100).await
        {
            error!(error = ?e, "Failed to warm up username filter");
        }
    });

    actix_web::rt::spawn(async move {
        // members who signed in during the last 30 days
        if let Err(e) = username_cache::warmup_username_cache(&pool_for_cache_warmup, 30, 250).await
        {
            error!(error = ?e, "Failed to warm up username cache");
        }
    });

    let repositories = Repositories::mysql(pool);
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        let routes_config = config.clone();
        let repositories = repositories.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard so the UI's JS/CSS assets match too
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .configure(|cfg| repositories.register(cfg))
            .service(index)
            .configure(|cfg| routes::configure(cfg, routes_config))
    })
    .bind(&server_addr)
    .with_context(|| format!("binding {server_addr}"))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
