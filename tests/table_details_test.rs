//! Integration tests for get_table_details against a scripted catalog.
//!
//! Tests verify that:
//! - MySQL and PostgreSQL connections return keys, indexes and triggers
//! - Dialects without a fetcher degrade to columns only
//! - Unknown connection names fail before anything is opened
//! - Every opened connection is closed exactly once, on success and failure
//! - The column query and the four metadata queries are in flight together

mod common;

use common::{ScriptedConnector, column_row, descriptor, resolver};
use db_metadata_mcp::db::columns::queries as column_queries;
use db_metadata_mcp::db::fetcher::queries::{mysql, postgres};
use db_metadata_mcp::db::{CatalogConnection, CatalogExecutor, CatalogRow, ColumnInspector};
use db_metadata_mcp::error::{DbError, DbResult};
use db_metadata_mcp::models::{Column, DatabaseType};
use db_metadata_mcp::tools::{GetTableDetailsInput, TableDetailsToolHandler, collect_table_details};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

fn input(connection: &str, table: &str) -> GetTableDetailsInput {
    GetTableDetailsInput {
        connection_name: connection.to_string(),
        table_name: table.to_string(),
    }
}

fn trigger_row(name: &str, event: &str) -> CatalogRow {
    CatalogRow::new()
        .with("TRIGGER_NAME", name)
        .with("EVENT_MANIPULATION", event)
        .with("ACTION_TIMING", "AFTER")
        .with("ACTION_STATEMENT", "BEGIN CALL getConnectionInfo(); END")
}

fn mysql_users_connector() -> ScriptedConnector {
    ScriptedConnector::new()
        .respond(
            column_queries::MYSQL,
            vec![
                column_row("uuid", "binary", false, Some("uuid_to_bin(uuid())")),
                column_row("id", "int", false, None),
                column_row("email", "varchar", false, None),
                column_row("perfil_id", "int", true, None),
            ],
        )
        .respond(
            mysql::PRIMARY_KEY,
            vec![
                CatalogRow::new()
                    .with("name", "PRIMARY")
                    .with("column_name", "id"),
            ],
        )
        .respond(
            mysql::FOREIGN_KEYS,
            vec![
                CatalogRow::new()
                    .with("name", "fk_users_perfil")
                    .with("column_name", "perfil_id")
                    .with("referenced_table", "perfil")
                    .with("referenced_column", "id"),
            ],
        )
        .respond(
            mysql::INDEXES,
            vec![
                CatalogRow::new()
                    .with("name", "email_UNIQUE")
                    .with("column_name", "email")
                    .with("non_unique", "0"),
                CatalogRow::new()
                    .with("name", "fk_users_perfil_idx")
                    .with("column_name", "perfil_id")
                    .with("non_unique", "1"),
            ],
        )
        .respond(
            mysql::TRIGGERS,
            vec![
                trigger_row("users_di", "INSERT"),
                trigger_row("users_da", "UPDATE"),
                trigger_row("users_de", "DELETE"),
            ],
        )
}

#[tokio::test]
async fn test_mysql_full_details() {
    let connector = mysql_users_connector();
    let stats = connector.stats();
    let handler = TableDetailsToolHandler::new(resolver(
        connector,
        vec![descriptor("agrotrace", "mysql2", "agrotrace_db")],
    ));

    let details = handler
        .get_table_details(input("agrotrace", "users"))
        .await
        .unwrap();

    assert_eq!(details.table_name, "users");
    assert_eq!(details.columns.len(), 4);
    assert_eq!(
        details.columns[0].default.as_deref(),
        Some("uuid_to_bin(uuid())")
    );

    let pk = details.primary_key_constraint.as_ref().unwrap();
    assert_eq!(pk.name.as_deref(), Some("PRIMARY"));
    assert_eq!(pk.columns, vec!["id"]);
    let flagged: Vec<_> = details
        .columns
        .iter()
        .filter(|c| c.is_primary_key)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(flagged, vec!["id"]);

    assert_eq!(details.foreign_key_constraints.len(), 1);
    let fk = &details.foreign_key_constraints[0];
    assert_eq!(fk.columns, vec!["perfil_id"]);
    assert_eq!(fk.referenced_table.as_deref(), Some("perfil"));
    assert_eq!(fk.referenced_columns.as_deref(), Some(&["id".to_string()][..]));

    assert_eq!(details.indexes.len(), 2);
    assert!(details.indexes[0].unique);
    assert!(!details.indexes[1].unique);

    let triggers: Vec<_> = details.triggers.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(triggers, vec!["users_di", "users_da", "users_de"]);
    assert_eq!(details.triggers[1].event_manipulation, "UPDATE");

    // MySQL catalog queries are scoped by schema, then table
    assert_eq!(
        stats.binds_for(mysql::TRIGGERS),
        vec![vec!["agrotrace_db".to_string(), "users".to_string()]]
    );
    assert_eq!(stats.connects(), 1);
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_postgres_foreign_keys_and_indexes() {
    let connector = ScriptedConnector::new()
        .respond(
            column_queries::POSTGRES,
            vec![
                column_row("id_product", "integer", false, Some("nextval('products_id_seq'::regclass)")),
                column_row("category_id", "integer", false, None),
                column_row("name", "text", false, None),
            ],
        )
        .respond(
            postgres::PRIMARY_KEY,
            vec![
                CatalogRow::new()
                    .with("name", "products_pkey")
                    .with("column_name", "id_product"),
            ],
        )
        .respond(
            postgres::FOREIGN_KEYS,
            vec![
                CatalogRow::new()
                    .with("name", "fk_products_category")
                    .with("column_name", "category_id")
                    .with("referenced_table", "categories")
                    .with("referenced_column", "id_category")
                    .with("position", "1"),
            ],
        )
        .respond(
            postgres::INDEXES,
            vec![
                CatalogRow::new()
                    .with("name", "products_category_id_idx")
                    .with(
                        "definition",
                        "CREATE INDEX products_category_id_idx ON public.products USING btree (category_id)",
                    ),
                CatalogRow::new().with("name", "products_name_key").with(
                    "definition",
                    "CREATE UNIQUE INDEX products_name_key ON public.products USING btree (name)",
                ),
            ],
        );
    let stats = connector.stats();
    let handler = TableDetailsToolHandler::new(resolver(
        connector,
        vec![descriptor("checkmilk", "pg", "checkmilk")],
    ));

    let details = handler
        .get_table_details(input("checkmilk", "products"))
        .await
        .unwrap();

    let fk = &details.foreign_key_constraints[0];
    assert_eq!(fk.name.as_deref(), Some("fk_products_category"));
    assert_eq!(fk.referenced_table.as_deref(), Some("categories"));
    assert_eq!(
        fk.referenced_columns.as_deref(),
        Some(&["id_category".to_string()][..])
    );

    assert_eq!(details.indexes.len(), 2);
    assert_eq!(details.indexes[0].columns, vec!["category_id"]);
    assert!(!details.indexes[0].unique);
    assert!(details.indexes[1].unique);
    assert!(details.triggers.is_empty());
    assert!(details.columns[0].is_primary_key);

    // PostgreSQL catalog queries bind the table only
    assert_eq!(
        stats.binds_for(postgres::INDEXES),
        vec![vec!["products".to_string()]]
    );
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_unsupported_dialect_returns_columns_only() {
    let connector = ScriptedConnector::new().respond(
        column_queries::SQLITE,
        vec![
            column_row("id", "INTEGER", false, None),
            column_row("label", "TEXT", true, Some("'none'")),
        ],
    );
    let stats = connector.stats();
    let handler = TableDetailsToolHandler::new(resolver(
        connector,
        vec![descriptor("local", "sqlite3", "/tmp/local.db")],
    ));

    let details = handler
        .get_table_details(input("local", "notes"))
        .await
        .unwrap();

    assert_eq!(details.columns.len(), 2);
    assert!(details.columns.iter().all(|c| !c.is_primary_key));
    assert!(details.primary_key_constraint.is_none());
    assert!(details.foreign_key_constraints.is_empty());
    assert!(details.indexes.is_empty());
    assert!(details.triggers.is_empty());

    // Only the column query ran
    assert_eq!(stats.query_count(), 1);
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_unknown_connection_never_connects() {
    let connector = mysql_users_connector();
    let stats = connector.stats();
    let handler = TableDetailsToolHandler::new(resolver(
        connector,
        vec![descriptor("agrotrace", "mysql2", "agrotrace")],
    ));

    let err = handler
        .get_table_details(input("Agrotrace", "users"))
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::ConnectionNotFound { .. }));
    assert_eq!(stats.connects(), 0);
    assert_eq!(stats.closes(), 0);
}

#[tokio::test]
async fn test_query_failure_closes_connection_once() {
    let connector = mysql_users_connector().fail(mysql::INDEXES, "Lost connection to MySQL server");
    let stats = connector.stats();
    let handler = TableDetailsToolHandler::new(resolver(
        connector,
        vec![descriptor("agrotrace", "mysql2", "agrotrace")],
    ));

    let err = handler
        .get_table_details(input("agrotrace", "users"))
        .await
        .unwrap_err();

    match err {
        DbError::Database { message, .. } => {
            assert!(message.contains("'users'"));
            assert!(message.contains("Lost connection"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
    assert_eq!(stats.connects(), 1);
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_missing_table_is_reported_with_table_name() {
    let connector = ScriptedConnector::new();
    let stats = connector.stats();
    let handler = TableDetailsToolHandler::new(resolver(
        connector,
        vec![descriptor("checkmilk", "postgres", "checkmilk")],
    ));

    let err = handler
        .get_table_details(input("checkmilk", "ghost"))
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Database { .. }));
    assert!(err.to_string().contains("ghost"));
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_connect_failure_names_table() {
    let connector = ScriptedConnector::new().refuse_connections();
    let stats = connector.stats();
    let handler = TableDetailsToolHandler::new(resolver(
        connector,
        vec![descriptor("agrotrace", "mysql", "agrotrace")],
    ));

    let err = handler
        .get_table_details(input("agrotrace", "users"))
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Connection { .. }));
    assert!(err.to_string().contains("users"));
    assert_eq!(stats.connects(), 1);
    assert_eq!(stats.closes(), 0);
}

#[tokio::test]
async fn test_repeated_calls_are_identical() {
    let connector = mysql_users_connector();
    let stats = connector.stats();
    let handler = TableDetailsToolHandler::new(resolver(
        connector,
        vec![descriptor("agrotrace", "mysql2", "agrotrace")],
    ));

    let first = handler
        .get_table_details(input("agrotrace", "users"))
        .await
        .unwrap();
    let second = handler
        .get_table_details(input("agrotrace", "users"))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(stats.connects(), 2);
    assert_eq!(stats.closes(), 2);
}

#[tokio::test]
async fn test_output_serializes_camel_case() {
    let handler = TableDetailsToolHandler::new(resolver(
        mysql_users_connector(),
        vec![descriptor("agrotrace", "mysql2", "agrotrace")],
    ));

    let details = handler
        .get_table_details(input("agrotrace", "users"))
        .await
        .unwrap();
    let value = serde_json::to_value(&details).unwrap();

    assert_eq!(value["tableName"], "users");
    assert_eq!(value["columns"][1]["isPrimaryKey"], true);
    assert_eq!(value["columns"][1]["type"], "int");
    assert_eq!(value["primaryKeyConstraint"]["columns"][0], "id");
    assert_eq!(value["foreignKeyConstraints"][0]["referencedTable"], "perfil");
    assert_eq!(value["triggers"][0]["eventManipulation"], "INSERT");
}

/// Connection whose queries only complete once all five are waiting.
struct GatedConnection {
    barrier: Arc<Barrier>,
}

impl CatalogExecutor for GatedConnection {
    async fn fetch_catalog(&self, sql: &str, _binds: &[&str]) -> DbResult<Vec<CatalogRow>> {
        self.barrier.wait().await;
        if sql == column_queries::MYSQL {
            Ok(vec![column_row("id", "int", false, None)])
        } else {
            Ok(Vec::new())
        }
    }
}

impl CatalogConnection for GatedConnection {
    fn dialect(&self) -> &str {
        "mysql"
    }

    async fn describe_columns(&self, table: &str) -> DbResult<Vec<Column>> {
        ColumnInspector::describe(self, DatabaseType::MySQL, table).await
    }

    async fn close(&self) {}
}

#[tokio::test]
async fn test_metadata_queries_run_concurrently() {
    let connection = GatedConnection {
        barrier: Arc::new(Barrier::new(5)),
    };

    // Sequential execution would park the first query on the barrier forever
    let details = tokio::time::timeout(
        Duration::from_secs(5),
        collect_table_details(&connection, "users", "agrotrace"),
    )
    .await
    .expect("queries did not overlap")
    .unwrap();

    assert_eq!(details.columns.len(), 1);
    assert!(details.primary_key_constraint.is_none());
    assert!(details.foreign_key_constraints.is_empty());
}
