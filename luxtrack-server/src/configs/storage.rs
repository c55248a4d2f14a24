use std::path::Path;
use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Error, SqlitePool};

use crate::configs::schema::SchemaManager;
use crate::configs::settings::Database;

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(database: Database, schema_manager: SchemaManager) -> Result<Self, Error> {
        let in_memory = database.url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(&database.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1) // in memory db is dropped with its last connection
            // every connection to an in memory url opens a separate database
            .max_connections(if in_memory { 1 } else { 10 })
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.prepare_schema(&schema_manager, &database).await?;

        Ok(storage)
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn prepare_schema(&self, schema: &SchemaManager, database: &Database) -> Result<(), Error> {
        if database.clean_start {
            sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
                .execute(&self.pool)
                .await?;
            sqlx::query(&schema.dispose_schema().join("\n"))
                .execute(&self.pool)
                .await?;

            tracing::warn!("clean start: dropped light reading schema");
        }

        // Tables are created with IF NOT EXISTS, existing data survives a restart
        sqlx::query(&schema.create_schema().join("\n"))
            .execute(&self.pool)
            .await?;

        if let Some(migration_path) = &database.migration_path {
            let migrator = Migrator::new(Path::new(migration_path)).await?;
            migrator.run(&self.pool).await?;

            tracing::info!("database migration success");
        }

        Ok(())
    }
}
