use std::time::Duration;

use actix_web::web;
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::{Pool, PooledConnection};

use crate::{configuration::DatabaseSettings, telemetry::spawn_blocking_with_tracing};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn get_connection_pool(settings: &DatabaseSettings) -> Result<DbPool, r2d2::Error>{
    let manager = ConnectionManager::<PgConnection>::new(settings.get_database_url());

    Pool::builder()
        .connection_timeout(CHECKOUT_TIMEOUT)
        .build(manager)
}

// Checkout blocks until a connection frees up, so it runs on the blocking pool
pub async fn get_pooled_connection(
    pool: &web::Data<DbPool>
) -> Result<DbConnection, anyhow::Error>{
    let pool = pool.clone();

    let conn = spawn_blocking_with_tracing(move || pool.get())
        .await
        .context("Failed due to threadpool error")?
        .context("No database connection available")?;

    Ok(conn)
}
