//! Column inspection.
//!
//! Describes the columns of a table in the connection's current database or
//! schema. Every dialect returns the same four labels so one mapping covers all.

use crate::db::catalog::CatalogExecutor;
use crate::error::{DbError, DbResult};
use crate::models::{Column, DatabaseType};
use tracing::debug;

pub mod queries {
    pub const MYSQL: &str = r#"
        SELECT
            COLUMN_NAME AS column_name,
            DATA_TYPE AS data_type,
            IS_NULLABLE AS is_nullable,
            COLUMN_DEFAULT AS column_default
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
        "#;

    pub const POSTGRES: &str = r#"
        SELECT
            column_name::text AS column_name,
            data_type::text AS data_type,
            is_nullable::text AS is_nullable,
            column_default::text AS column_default
        FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name = $1
        ORDER BY ordinal_position
        "#;

    pub const SQLITE: &str = r#"
        SELECT
            name AS column_name,
            type AS data_type,
            CASE WHEN "notnull" = 0 THEN 'YES' ELSE 'NO' END AS is_nullable,
            dflt_value AS column_default
        FROM pragma_table_info(?)
        ORDER BY cid
        "#;
}

/// Column inspector for any database type the driver layer supports.
pub struct ColumnInspector;

impl ColumnInspector {
    /// Describe the columns of `table`.
    ///
    /// Fails with a schema error when the table does not exist or is not
    /// visible to the connected user.
    pub async fn describe<E: CatalogExecutor>(
        executor: &E,
        db_type: DatabaseType,
        table: &str,
    ) -> DbResult<Vec<Column>> {
        let sql = match db_type {
            DatabaseType::MySQL => queries::MYSQL,
            DatabaseType::PostgreSQL => queries::POSTGRES,
            DatabaseType::SQLite => queries::SQLITE,
        };

        let rows = executor.fetch_catalog(sql, &[table]).await?;
        if rows.is_empty() {
            return Err(DbError::schema(
                format!("Table '{}' not found", table),
                table,
            ));
        }

        let columns: Vec<Column> = rows
            .iter()
            .map(|row| {
                let nullable = row
                    .get("is_nullable")
                    .is_some_and(|v| v.eq_ignore_ascii_case("YES"));
                Column::new(row.text("column_name"), row.text("data_type"), nullable)
                    .with_default(row.get("column_default").map(str::to_string))
            })
            .collect();

        debug!(table = %table, db_type = %db_type, count = columns.len(), "Described columns");
        Ok(columns)
    }
}
