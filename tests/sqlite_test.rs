//! Integration tests for the columns-only path on a real SQLite file.

use db_metadata_mcp::db::{ConnectionResolver, SqlxConnector};
use db_metadata_mcp::error::DbError;
use db_metadata_mcp::models::ConnectionDescriptor;
use db_metadata_mcp::tools::{GetTableDetailsInput, TableDetailsToolHandler};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Create a SQLite database with two related tables and return its directory and path.
async fn setup_db() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let db_path = path.to_str().unwrap().to_string();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true),
        )
        .await
        .unwrap();

    sqlx::query("CREATE TABLE categoria (id INTEGER PRIMARY KEY, nome TEXT NOT NULL)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE registro (
            id INTEGER PRIMARY KEY,
            nome VARCHAR(50) NOT NULL,
            descricao TEXT,
            ordem INTEGER NOT NULL DEFAULT 0,
            categoria_id INTEGER REFERENCES categoria (id)
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("CREATE INDEX registro_categoria_idx ON registro (categoria_id)")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    (dir, db_path)
}

fn handler(db_path: &str) -> TableDetailsToolHandler {
    let descriptor = ConnectionDescriptor::new("local", "sqlite3", "localhost", 0, "", "", db_path);
    let resolver = ConnectionResolver::new(
        vec![descriptor],
        SqlxConnector::new(Duration::from_secs(5)),
    );
    TableDetailsToolHandler::new(Arc::new(resolver))
}

#[tokio::test]
async fn test_sqlite_returns_columns_only() {
    let (_dir, db_path) = setup_db().await;
    let handler = handler(&db_path);

    let details = handler
        .get_table_details(GetTableDetailsInput {
            connection_name: "local".to_string(),
            table_name: "registro".to_string(),
        })
        .await
        .unwrap();

    let names: Vec<_> = details.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "nome", "descricao", "ordem", "categoria_id"]
    );
    assert_eq!(details.columns[1].data_type, "VARCHAR(50)");
    assert!(!details.columns[1].nullable);
    assert!(details.columns[2].nullable);
    assert_eq!(details.columns[3].default.as_deref(), Some("0"));
    assert_eq!(details.columns[2].default, None);

    // No metadata fetcher for SQLite: keys, indexes and triggers stay empty
    assert!(details.columns.iter().all(|c| !c.is_primary_key));
    assert!(details.primary_key_constraint.is_none());
    assert!(details.foreign_key_constraints.is_empty());
    assert!(details.indexes.is_empty());
    assert!(details.triggers.is_empty());
}

#[tokio::test]
async fn test_sqlite_missing_table() {
    let (_dir, db_path) = setup_db().await;
    let handler = handler(&db_path);

    let err = handler
        .get_table_details(GetTableDetailsInput {
            connection_name: "local".to_string(),
            table_name: "ghost".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        DbError::Database { message, .. } => assert!(message.contains("'ghost'")),
        other => panic!("expected database error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sqlite_repeated_calls_open_fresh_connections() {
    let (_dir, db_path) = setup_db().await;
    let handler = handler(&db_path);

    for _ in 0..3 {
        let details = handler
            .get_table_details(GetTableDetailsInput {
                connection_name: "local".to_string(),
                table_name: "categoria".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(details.columns.len(), 2);
    }
}

#[tokio::test]
async fn test_sqlite_missing_file_fails_to_connect() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.db");
    let handler = handler(missing.to_str().unwrap());

    let err = handler
        .get_table_details(GetTableDetailsInput {
            connection_name: "local".to_string(),
            table_name: "registro".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Connection { .. }));
    assert!(err.to_string().contains("registro"));
}
