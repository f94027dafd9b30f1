//! Table details tool.
//!
//! This module implements the `get_table_details` MCP tool: it resolves the
//! named connection, collects columns and (when the dialect is supported)
//! key constraints, indexes and triggers, and always closes the connection.

use crate::db::catalog::{CatalogConnection, ConnectionGuard, Connector};
use crate::db::fetcher::MetadataFetcher;
use crate::db::pool::SqlxConnector;
use crate::db::resolver::ConnectionResolver;
use crate::error::{DbError, DbResult};
use crate::models::TableDetails;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Input for the get_table_details tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTableDetailsInput {
    /// Connection name from get_databases_available
    pub connection_name: String,
    /// Table to describe (matched as stored in the catalog)
    pub table_name: String,
}

/// Handler for table details operations.
pub struct TableDetailsToolHandler<K: Connector = SqlxConnector> {
    resolver: Arc<ConnectionResolver<K>>,
}

impl<K: Connector> TableDetailsToolHandler<K> {
    pub fn new(resolver: Arc<ConnectionResolver<K>>) -> Self {
        Self { resolver }
    }

    /// Collect the details of one table.
    ///
    /// An unknown connection name fails before anything is opened. Every
    /// other failure names the table and is returned after the connection
    /// has been closed.
    pub async fn get_table_details(&self, input: GetTableDetailsInput) -> DbResult<TableDetails> {
        let table = input.table_name.as_str();

        let (connection, database) = self
            .resolver
            .resolve(&input.connection_name)
            .await
            .map_err(|e| DbError::table_details(table, e))?;

        let guard = ConnectionGuard::new(connection, input.connection_name.as_str());
        let result = collect_table_details(guard.connection(), table, &database).await;
        guard.release().await;

        let details = result.map_err(|e| DbError::table_details(table, e))?;

        info!(
            connection = %input.connection_name,
            table = %table,
            columns = details.columns.len(),
            primary_key = ?details.primary_key_columns(),
            foreign_keys = details.foreign_key_constraints.len(),
            indexes = details.indexes.len(),
            triggers = details.triggers.len(),
            "Fetched table details"
        );

        Ok(details)
    }
}

/// Collect table details over an already open connection.
///
/// Without a fetcher for the connection's dialect only columns are returned.
/// Otherwise columns and the four metadata queries run concurrently; the
/// first failure aborts the rest.
pub async fn collect_table_details<C: CatalogConnection>(
    connection: &C,
    table: &str,
    database: &str,
) -> DbResult<TableDetails> {
    let Some(fetcher) = MetadataFetcher::select(connection.dialect()) else {
        let columns = connection.describe_columns(table).await?;
        return Ok(TableDetails::columns_only(table, columns));
    };

    debug!(fetcher = fetcher.name(), table = %table, "Fetching table metadata");
    let (columns, primary_key, foreign_keys, indexes, triggers) = tokio::try_join!(
        connection.describe_columns(table),
        fetcher.primary_key(connection, table, database),
        fetcher.foreign_keys(connection, table, database),
        fetcher.indexes(connection, table, database),
        fetcher.triggers(connection, table, database),
    )?;

    let mut details = TableDetails {
        table_name: table.to_string(),
        columns,
        primary_key_constraint: primary_key,
        foreign_key_constraints: foreign_keys,
        indexes,
        triggers,
    };
    details.apply_primary_key();
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_uses_camel_case() {
        let input: GetTableDetailsInput = serde_json::from_value(serde_json::json!({
            "connectionName": "agrotrace",
            "tableName": "users"
        }))
        .unwrap();
        assert_eq!(input.connection_name, "agrotrace");
        assert_eq!(input.table_name, "users");
    }

    #[test]
    fn test_input_requires_both_fields() {
        let result: Result<GetTableDetailsInput, _> =
            serde_json::from_value(serde_json::json!({ "connectionName": "agrotrace" }));
        assert!(result.is_err());
    }
}
