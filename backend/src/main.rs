//! API server entry-point: wires persistence, the auth gateway, sessions,
//! and the HTTP surface.

use std::env;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use paticheck_backend::doc::ApiDoc;
use paticheck_backend::inbound::http::{self, HealthState, HttpState};
use paticheck_backend::outbound::auth::HttpAuthGateway;
use paticheck_backend::outbound::persistence::{
    DbPool, DieselPhotoRepository, DieselProfileRepository, DieselRecordRepository, PoolConfig,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn require_env(name: &str) -> std::io::Result<String> {
    env::var(name).map_err(|_| std::io::Error::other(format!("{name} must be set")))
}

/// Run pending migrations over a short-lived synchronous connection.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|error| std::io::Error::other(format!("database connection failed: {error}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|error| std::io::Error::other(format!("migrations failed: {error}")))?;
    if applied.is_empty() {
        info!("schema up to date");
    } else {
        info!(count = applied.len(), "applied migrations");
    }
    Ok(())
}

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, %error, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {error}"
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let database_url = require_env("DATABASE_URL")?;
    let auth_url: Url = require_env("AUTH_URL")?
        .parse()
        .map_err(|error| std::io::Error::other(format!("AUTH_URL invalid: {error}")))?;
    let auth_anon_key = require_env("AUTH_ANON_KEY")?;
    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    run_migrations(&database_url)?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| std::io::Error::other(error.to_string()))?;
    let gateway = HttpAuthGateway::new(auth_url, auth_anon_key)
        .map_err(|error| std::io::Error::other(error.to_string()))?;

    let state = HttpState::new(
        Arc::new(gateway),
        Arc::new(DieselRecordRepository::new(pool.clone())),
        Arc::new(DieselProfileRepository::new(pool.clone())),
        Arc::new(DieselPhotoRepository::new(pool)),
    );

    let health_state = HealthState::new();
    health_state.set_ready(true);
    let app_health = health_state.clone();
    let app_state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let app = App::new()
            .app_data(app_state.clone())
            .app_data(web::Data::new(app_health.clone()))
            .wrap(session)
            .configure(http::configure)
            .configure(http::health::configure);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(("0.0.0.0", 8080))?;

    info!("listening on 0.0.0.0:8080");
    server.run().await
}
