//! MySQL metadata fetcher. Queries are scoped by schema and table name.

use super::{foreign_keys_from_rows, group_by_name, primary_key_from_rows, queries, triggers_from_rows};
use crate::db::catalog::CatalogExecutor;
use crate::error::DbResult;
use crate::models::{Constraint, Index, Trigger};
use tracing::debug;

pub(super) async fn primary_key<E: CatalogExecutor>(
    executor: &E,
    table: &str,
    schema: &str,
) -> DbResult<Option<Constraint>> {
    let rows = executor
        .fetch_catalog(queries::mysql::PRIMARY_KEY, &[schema, table])
        .await?;
    Ok(primary_key_from_rows(&rows))
}

pub(super) async fn foreign_keys<E: CatalogExecutor>(
    executor: &E,
    table: &str,
    schema: &str,
) -> DbResult<Vec<Constraint>> {
    let rows = executor
        .fetch_catalog(queries::mysql::FOREIGN_KEYS, &[schema, table])
        .await?;
    let fks = foreign_keys_from_rows(&rows);
    debug!(table = %table, count = fks.len(), "Fetched MySQL foreign keys");
    Ok(fks)
}

pub(super) async fn indexes<E: CatalogExecutor>(
    executor: &E,
    table: &str,
    schema: &str,
) -> DbResult<Vec<Index>> {
    let rows = executor
        .fetch_catalog(queries::mysql::INDEXES, &[schema, table])
        .await?;

    let indexes: Vec<Index> = group_by_name(&rows, "name")
        .into_iter()
        .map(|(name, members)| Index {
            unique: members
                .first()
                .and_then(|row| row.get("non_unique"))
                .is_some_and(|v| v.trim() == "0"),
            // functional key parts have no column name
            columns: members
                .iter()
                .filter_map(|row| row.get("column_name"))
                .map(str::to_string)
                .collect(),
            name,
        })
        .collect();

    debug!(table = %table, count = indexes.len(), "Fetched MySQL indexes");
    Ok(indexes)
}

pub(super) async fn triggers<E: CatalogExecutor>(
    executor: &E,
    table: &str,
    schema: &str,
) -> DbResult<Vec<Trigger>> {
    let rows = executor
        .fetch_catalog(queries::mysql::TRIGGERS, &[schema, table])
        .await?;
    Ok(triggers_from_rows(&rows))
}
