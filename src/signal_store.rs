//! Signal persistence
//!
//! A signal records that a referrer's avatar link was requested, together with
//! the client IP and user agent. Signals are write-once; nothing here reads them
//! back.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Value substituted for request metadata the client did not send
pub const NOT_AVAILABLE: &str = "Not Available";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signal {
    pub ref_id: String,
    pub ip: String,
    pub user_agent: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SignalStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Destination for tracking signals
#[async_trait]
pub trait SignalStore: Send + Sync {
    async fn insert(&self, signal: &Signal) -> Result<(), SignalStoreError>;
}

/// Pool settings for [`PgSignalStore::connect`]
#[derive(Clone, Debug)]
pub struct PgSignalStoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub connect_retries: u32,
    pub retry_delay: Duration,
}

impl PgSignalStoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
            connect_retries: 5,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Postgres-backed signal store writing into the `Signal` table
#[derive(Clone)]
pub struct PgSignalStore {
    pool: PgPool,
}

impl PgSignalStore {
    /// Connect with bounded retries and verify the connection with `SELECT 1`
    pub async fn connect(config: &PgSignalStoreConfig) -> Result<Self, SignalStoreError> {
        let mut attempt = 0;

        loop {
            let result = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout)
                .connect(&config.database_url)
                .await;

            match result {
                Ok(pool) => {
                    sqlx::query("SELECT 1").execute(&pool).await?;
                    info!("Connected to signal database");
                    return Ok(Self { pool });
                }
                Err(e) if attempt < config.connect_retries => {
                    attempt += 1;
                    info!(
                        "Database connection failed (attempt {}/{}): {}, retrying...",
                        attempt, config.connect_retries, e
                    );
                    tokio::time::sleep(config.retry_delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Create the `Signal` table when it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), SignalStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS "Signal" (
                "id" BIGSERIAL PRIMARY KEY,
                "refId" TEXT NOT NULL,
                "ip" TEXT NOT NULL,
                "userAgent" TEXT NOT NULL,
                "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(r#"CREATE INDEX IF NOT EXISTS "Signal_refId_idx" ON "Signal" ("refId")"#)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for checked out connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SignalStore for PgSignalStore {
    async fn insert(&self, signal: &Signal) -> Result<(), SignalStoreError> {
        sqlx::query(r#"INSERT INTO "Signal" ("refId", "ip", "userAgent") VALUES ($1, $2, $3)"#)
            .bind(&signal.ref_id)
            .bind(&signal.ip)
            .bind(&signal.user_agent)
            .execute(&self.pool)
            .await?;

        debug!("Stored signal for refId {}", signal.ref_id);
        Ok(())
    }
}
