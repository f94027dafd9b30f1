//! Per-request connection pools.
//!
//! Each `get_table_details` call opens its own small pool from the connection
//! descriptor using database-specific pools (MySqlPool, PgPool, SqlitePool),
//! runs its catalog queries concurrently on it and closes it again.

use crate::db::catalog::{CatalogConnection, CatalogExecutor, CatalogRow, Connector};
use crate::db::columns::ColumnInspector;
use crate::error::{DbError, DbResult};
use crate::models::{Column, ConnectionDescriptor, DatabaseType};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as _, MySqlPool, PgPool, Row, SqlitePool};
use std::time::Duration;
use tracing::{debug, info};

/// One connection per concurrent catalog query (columns + four fetcher queries).
pub const CATALOG_POOL_MAX_CONNECTIONS: u32 = 5;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Database-specific connection pool (avoids AnyPool limitations).
#[derive(Debug, Clone)]
pub enum DbPool {
    MySql(MySqlPool),
    Postgres(PgPool),
    SQLite(SqlitePool),
}

impl DbPool {
    /// Close the connection pool.
    pub async fn close(&self) {
        match self {
            DbPool::MySql(pool) => pool.close().await,
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::SQLite(pool) => pool.close().await,
        }
    }

    /// Get the database type for this pool.
    pub fn db_type(&self) -> DatabaseType {
        match self {
            DbPool::MySql(_) => DatabaseType::MySQL,
            DbPool::Postgres(_) => DatabaseType::PostgreSQL,
            DbPool::SQLite(_) => DatabaseType::SQLite,
        }
    }
}

/// Opens sqlx pools from connection descriptors.
#[derive(Debug, Clone)]
pub struct SqlxConnector {
    connect_timeout: Duration,
}

impl SqlxConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    async fn open_pool(
        &self,
        descriptor: &ConnectionDescriptor,
        db_type: DatabaseType,
    ) -> Result<DbPool, sqlx::Error> {
        match db_type {
            DatabaseType::MySQL => {
                let options = MySqlConnectOptions::new()
                    .host(&descriptor.host)
                    .port(descriptor.port)
                    .username(&descriptor.user)
                    .password(&descriptor.password)
                    .database(&descriptor.database)
                    .charset("utf8mb4");

                let pool = MySqlPoolOptions::new()
                    .max_connections(CATALOG_POOL_MAX_CONNECTIONS)
                    .acquire_timeout(self.connect_timeout)
                    .connect_with(options)
                    .await?;
                Ok(DbPool::MySql(pool))
            }
            DatabaseType::PostgreSQL => {
                let options = PgConnectOptions::new()
                    .host(&descriptor.host)
                    .port(descriptor.port)
                    .username(&descriptor.user)
                    .password(&descriptor.password)
                    .database(&descriptor.database);

                let pool = PgPoolOptions::new()
                    .max_connections(CATALOG_POOL_MAX_CONNECTIONS)
                    .acquire_timeout(self.connect_timeout)
                    .connect_with(options)
                    .await?;
                Ok(DbPool::Postgres(pool))
            }
            DatabaseType::SQLite => {
                let options = SqliteConnectOptions::new()
                    .filename(&descriptor.database)
                    .read_only(true);

                let pool = SqlitePoolOptions::new()
                    .max_connections(CATALOG_POOL_MAX_CONNECTIONS)
                    .acquire_timeout(self.connect_timeout)
                    .connect_with(options)
                    .await?;
                Ok(DbPool::SQLite(pool))
            }
        }
    }

    /// Generate a helpful suggestion based on the connection error.
    fn connection_suggestion(db_type: DatabaseType, error: &sqlx::Error) -> String {
        let error_str = error.to_string().to_lowercase();

        if error_str.contains("connection refused") {
            return format!(
                "Check that the {} server is running and accessible",
                db_type
            );
        }

        if error_str.contains("authentication") || error_str.contains("password") {
            return "Verify the user and password of the connection in the settings file"
                .to_string();
        }

        if error_str.contains("does not exist") || error_str.contains("unknown database") {
            return "Check that the database name exists".to_string();
        }

        if error_str.contains("tls") || error_str.contains("ssl") {
            return "Check TLS/SSL configuration or try disabling it".to_string();
        }

        match db_type {
            DatabaseType::SQLite => {
                "Verify the database file path exists and is readable".to_string()
            }
            _ => format!(
                "Verify host, port and database of the {} connection in the settings file",
                db_type
            ),
        }
    }
}

impl Default for SqlxConnector {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl Connector for SqlxConnector {
    type Connection = SqlxConnection;

    async fn connect(&self, descriptor: &ConnectionDescriptor) -> DbResult<SqlxConnection> {
        let db_type = descriptor.database_type().ok_or_else(|| {
            DbError::configuration(format!(
                "Unsupported client '{}' for connection '{}'",
                descriptor.dialect, descriptor.name
            ))
        })?;

        info!(
            connection = %descriptor.name,
            db_type = %db_type,
            host = %descriptor.host,
            database = %descriptor.database,
            "Opening database connection"
        );

        let pool = self.open_pool(descriptor, db_type).await.map_err(|e| {
            DbError::connection(
                format!("Failed to connect to '{}': {}", descriptor.name, e),
                Self::connection_suggestion(db_type, &e),
            )
        })?;

        Ok(SqlxConnection {
            pool,
            dialect: descriptor.dialect.clone(),
        })
    }
}

/// A pool opened for a single request.
#[derive(Debug, Clone)]
pub struct SqlxConnection {
    pool: DbPool,
    dialect: String,
}

impl CatalogExecutor for SqlxConnection {
    async fn fetch_catalog(&self, sql: &str, binds: &[&str]) -> DbResult<Vec<CatalogRow>> {
        let rows: Vec<CatalogRow> = match &self.pool {
            DbPool::MySql(pool) => {
                let mut query = sqlx::query(sql);
                for bind in binds {
                    query = query.bind(*bind);
                }
                query.fetch_all(pool).await?.iter().map(mysql_row).collect()
            }
            DbPool::Postgres(pool) => {
                let mut query = sqlx::query(sql);
                for bind in binds {
                    query = query.bind(*bind);
                }
                query.fetch_all(pool).await?.iter().map(pg_row).collect()
            }
            DbPool::SQLite(pool) => {
                let mut query = sqlx::query(sql);
                for bind in binds {
                    query = query.bind(*bind);
                }
                query.fetch_all(pool).await?.iter().map(sqlite_row).collect()
            }
        };
        Ok(rows)
    }
}

impl CatalogConnection for SqlxConnection {
    fn dialect(&self) -> &str {
        &self.dialect
    }

    async fn describe_columns(&self, table: &str) -> DbResult<Vec<Column>> {
        ColumnInspector::describe(self, self.pool.db_type(), table).await
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!(dialect = %self.dialect, "Closed database connection");
    }
}

/// MySQL may return VARBINARY instead of VARCHAR depending on charset
/// configuration, and unsigned or signed integers depending on version.
fn mysql_value(row: &MySqlRow, index: usize) -> Option<String> {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v;
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return v.map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map(|n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(index) {
        return v.map(|n| n.to_string());
    }
    None
}

fn mysql_row(row: &MySqlRow) -> CatalogRow {
    let mut out = CatalogRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        out.push(column.name(), mysql_value(row, index));
    }
    out
}

fn pg_value(row: &PgRow, index: usize) -> Option<String> {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v;
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return v.map(|n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map(|n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.map(|b| b.to_string());
    }
    None
}

fn pg_row(row: &PgRow) -> CatalogRow {
    let mut out = CatalogRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        out.push(column.name(), pg_value(row, index));
    }
    out
}

fn sqlite_value(row: &SqliteRow, index: usize) -> Option<String> {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v;
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map(|n| n.to_string());
    }
    None
}

fn sqlite_row(row: &SqliteRow) -> CatalogRow {
    let mut out = CatalogRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        out.push(column.name(), sqlite_value(row, index));
    }
    out
}
