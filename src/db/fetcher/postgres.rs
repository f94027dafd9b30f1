//! PostgreSQL metadata fetcher.
//!
//! Queries filter by table name only and rely on the connection being scoped
//! to the target database.

use super::{foreign_keys_from_rows, primary_key_from_rows, queries, triggers_from_rows};
use crate::db::catalog::CatalogExecutor;
use crate::error::DbResult;
use crate::models::{Constraint, Index, Trigger};
use tracing::debug;

pub(super) async fn primary_key<E: CatalogExecutor>(
    executor: &E,
    table: &str,
) -> DbResult<Option<Constraint>> {
    let rows = executor
        .fetch_catalog(queries::postgres::PRIMARY_KEY, &[table])
        .await?;
    Ok(primary_key_from_rows(&rows))
}

pub(super) async fn foreign_keys<E: CatalogExecutor>(
    executor: &E,
    table: &str,
) -> DbResult<Vec<Constraint>> {
    let rows = executor
        .fetch_catalog(queries::postgres::FOREIGN_KEYS, &[table])
        .await?;
    let fks = foreign_keys_from_rows(&rows);
    debug!(table = %table, count = fks.len(), "Fetched PostgreSQL foreign keys");
    Ok(fks)
}

pub(super) async fn indexes<E: CatalogExecutor>(executor: &E, table: &str) -> DbResult<Vec<Index>> {
    let rows = executor
        .fetch_catalog(queries::postgres::INDEXES, &[table])
        .await?;

    let indexes: Vec<Index> = rows
        .iter()
        .map(|row| {
            let (columns, unique) = parse_index_definition(row.get("definition").unwrap_or(""));
            Index {
                name: row.text("name"),
                columns,
                unique,
            }
        })
        .collect();

    debug!(table = %table, count = indexes.len(), "Fetched PostgreSQL indexes");
    Ok(indexes)
}

pub(super) async fn triggers<E: CatalogExecutor>(
    executor: &E,
    table: &str,
) -> DbResult<Vec<Trigger>> {
    let rows = executor
        .fetch_catalog(queries::postgres::TRIGGERS, &[table])
        .await?;
    Ok(triggers_from_rows(&rows))
}

/// Extract the column list and uniqueness from a `pg_indexes.indexdef` string.
///
/// Columns are the text between the first `(` and the following `)`, split on
/// `,` and trimmed. This is a heuristic, not a SQL parser: expression indexes
/// and quoted identifiers containing `(`, `)` or `,` come back mangled, and a
/// definition without parentheses yields no columns.
pub fn parse_index_definition(definition: &str) -> (Vec<String>, bool) {
    let unique = definition.contains("UNIQUE");
    let columns = definition
        .find('(')
        .map(|open| &definition[open + 1..])
        .and_then(|rest| rest.find(')').map(|close| &rest[..close]))
        .map(|list| list.split(',').map(|c| c.trim().to_string()).collect())
        .unwrap_or_default();
    (columns, unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_column_index() {
        let (columns, unique) = parse_index_definition(
            "CREATE INDEX products_category_id_idx ON public.products USING btree (category_id)",
        );
        assert_eq!(columns, vec!["category_id"]);
        assert!(!unique);
    }

    #[test]
    fn test_parse_unique_composite_index() {
        let (columns, unique) = parse_index_definition(
            "CREATE UNIQUE INDEX orders_tenant_number_key ON public.orders USING btree (tenant_id, number)",
        );
        assert_eq!(columns, vec!["tenant_id", "number"]);
        assert!(unique);
    }

    #[test]
    fn test_parse_expression_index_is_best_effort() {
        let (columns, _) = parse_index_definition(
            "CREATE INDEX users_lower_email_idx ON public.users USING btree (lower((email)::text))",
        );
        assert_eq!(columns, vec!["lower((email"]);
    }

    #[test]
    fn test_parse_definition_without_parentheses() {
        let (columns, unique) = parse_index_definition("garbage");
        assert!(columns.is_empty());
        assert!(!unique);
    }
}
