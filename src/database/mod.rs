use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::config::{AppConfig, DbConfig};

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    pub async fn init(config: &AppConfig) -> Result<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let max_cons = if cfg!(test) { 1 } else { 5 };

        let db_pool = create_pool(&config.db_config, max_cons, Duration::from_millis(500)).await?;

        Ok(Self { db: db_pool })
    }

    /// Creates a fresh database named by a random uuid, runs the migrations on it and
    /// connects to it. `config.db_config.db_name` is ignored.
    pub async fn test_init(config: &AppConfig) -> Result<Self> {
        let mut db_config = config.db_config.clone();
        db_config.db_name = Uuid::new_v4().to_string();

        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;
        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;

        let db_pool = create_pool(&db_config, 1, Duration::from_millis(1000)).await?;
        let dm = Self { db: db_pool };
        dm.migrate().await?;

        Ok(dm)
    }

    /// Runs the embedded migrations from `./migrations`.
    pub async fn migrate(&self) -> Result<()> {
        info!("{:<20} - Running migrations", "migrate_db");
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

async fn create_pool(
    db_config: &DbConfig,
    max_cons: u32,
    acquire_timeout: Duration,
) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_cons)
        .acquire_timeout(acquire_timeout)
        .connect_with(db_config.connection_options())
        .await
        .map_err(Error::FailToCreatePool)
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(sqlx::Error),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}
