//! Rental admin backend entry point.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rental_admin::inbound::http::health::HealthState;
use rental_admin::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselListingRepository, DieselUserRepository, PoolConfig,
    run_pending_migrations,
};
use rental_admin::outbound::security::Argon2PasswordHasher;
use server::{AppSettings, BuildMode, Repositories, build_http_state, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppSettings::load()
        .wrap_err("failed to load settings")?
        .into_server_config(BuildMode::from_debug_assertions())
        .wrap_err("invalid settings")?;

    run_pending_migrations(&config.database_url)
        .await
        .wrap_err("failed to migrate database")?;

    let pool = DbPool::new(
        PoolConfig::new(config.database_url.clone()).with_max_size(config.db_max_connections),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let clock = Arc::new(DefaultClock);
    let http_state = build_http_state(
        Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone(), clock.clone())),
            listings: Arc::new(DieselListingRepository::new(pool.clone(), clock.clone())),
            bookings: Arc::new(DieselBookingRepository::new(pool, clock.clone())),
            hasher: Arc::new(Argon2PasswordHasher::default()),
        },
        config.auth.clone(),
        clock,
        config.cookie_secure,
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, config.bind_addr)
        .wrap_err("failed to start HTTP server")?;
    info!(bind_addr = %config.bind_addr, "rental admin listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("HTTP server failed")
}
