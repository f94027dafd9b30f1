//! Dialect metadata fetchers.
//!
//! A fetcher answers four independent catalog questions about a table:
//! primary key, foreign keys, indexes and triggers. One variant exists per
//! supported dialect and is picked from the static `FETCHERS` table by the
//! dialect identifier of the connection. Dialects without a fetcher are not an
//! error: callers fall back to column data only.

mod mysql;
mod postgres;
pub mod queries;

pub use postgres::parse_index_definition;

use crate::db::catalog::{CatalogExecutor, CatalogRow};
use crate::error::DbResult;
use crate::models::{Constraint, Index, Trigger};
use tracing::warn;

/// Metadata fetcher implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFetcher {
    MySql,
    Postgres,
}

/// Dialect identifier to fetcher. Matched exactly.
pub const FETCHERS: &[(&str, MetadataFetcher)] = &[
    ("mysql", MetadataFetcher::MySql),
    ("mysql2", MetadataFetcher::MySql),
    ("pg", MetadataFetcher::Postgres),
    ("postgres", MetadataFetcher::Postgres),
];

impl MetadataFetcher {
    /// Select the fetcher for a dialect identifier.
    ///
    /// Returns `None` for unsupported dialects and logs a warning.
    pub fn select(dialect: &str) -> Option<Self> {
        let fetcher = FETCHERS
            .iter()
            .find(|(name, _)| *name == dialect)
            .map(|(_, fetcher)| *fetcher);

        if fetcher.is_none() {
            warn!(
                dialect = %dialect,
                "No metadata fetcher for dialect, only columns will be returned"
            );
        }
        fetcher
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
        }
    }

    /// Primary key of `table`, or `None` when the table has none.
    pub async fn primary_key<E: CatalogExecutor>(
        &self,
        executor: &E,
        table: &str,
        database: &str,
    ) -> DbResult<Option<Constraint>> {
        match self {
            Self::MySql => mysql::primary_key(executor, table, database).await,
            Self::Postgres => postgres::primary_key(executor, table).await,
        }
    }

    /// Foreign keys of `table`, one constraint per name.
    pub async fn foreign_keys<E: CatalogExecutor>(
        &self,
        executor: &E,
        table: &str,
        database: &str,
    ) -> DbResult<Vec<Constraint>> {
        match self {
            Self::MySql => mysql::foreign_keys(executor, table, database).await,
            Self::Postgres => postgres::foreign_keys(executor, table).await,
        }
    }

    /// Secondary indexes of `table`.
    pub async fn indexes<E: CatalogExecutor>(
        &self,
        executor: &E,
        table: &str,
        database: &str,
    ) -> DbResult<Vec<Index>> {
        match self {
            Self::MySql => mysql::indexes(executor, table, database).await,
            Self::Postgres => postgres::indexes(executor, table).await,
        }
    }

    /// Triggers defined on `table`.
    pub async fn triggers<E: CatalogExecutor>(
        &self,
        executor: &E,
        table: &str,
        database: &str,
    ) -> DbResult<Vec<Trigger>> {
        match self {
            Self::MySql => mysql::triggers(executor, table, database).await,
            Self::Postgres => postgres::triggers(executor, table).await,
        }
    }
}

/// Group rows by the value under `label`, keeping first-appearance order of
/// the groups and row order within each group.
pub(crate) fn group_by_name<'a>(
    rows: &'a [CatalogRow],
    label: &str,
) -> Vec<(String, Vec<&'a CatalogRow>)> {
    let mut groups: Vec<(String, Vec<&CatalogRow>)> = Vec::new();
    for row in rows {
        let name = row.text(label);
        match groups.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, members)) => members.push(row),
            None => groups.push((name, vec![row])),
        }
    }
    groups
}

/// Rows labelled `name`, `column_name` into a single primary key constraint.
fn primary_key_from_rows(rows: &[CatalogRow]) -> Option<Constraint> {
    let first = rows.first()?;
    Some(Constraint::primary_key(
        first.get("name").map(str::to_string),
        rows.iter().map(|row| row.text("column_name")).collect(),
    ))
}

/// Rows labelled `name`, `column_name`, `referenced_table`, `referenced_column`
/// into one constraint per name.
fn foreign_keys_from_rows(rows: &[CatalogRow]) -> Vec<Constraint> {
    group_by_name(rows, "name")
        .into_iter()
        .map(|(name, members)| {
            let referenced_table = members
                .iter()
                .find_map(|row| row.get("referenced_table"))
                .map(str::to_string);
            let mut fk = Constraint::foreign_key(name, referenced_table);
            let mut referenced_columns = Vec::with_capacity(members.len());
            for row in members {
                fk.columns.push(row.text("column_name"));
                referenced_columns.push(row.text("referenced_column"));
            }
            fk.referenced_columns = Some(referenced_columns);
            fk
        })
        .collect()
}

fn triggers_from_rows(rows: &[CatalogRow]) -> Vec<Trigger> {
    rows.iter()
        .map(|row| Trigger {
            name: row.text("trigger_name"),
            event_manipulation: row.text("event_manipulation"),
            action_timing: row.text("action_timing"),
            action_statement: row.text("action_statement"),
        })
        .collect()
}
