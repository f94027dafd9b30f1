//! Scripted connector shared by the integration tests.
//!
//! Replays canned catalog rows keyed by the exact SQL text and records every
//! query, connect and close.

#![allow(dead_code)]

use db_metadata_mcp::db::{
    CatalogConnection, CatalogExecutor, CatalogRow, ColumnInspector, ConnectionResolver, Connector,
};
use db_metadata_mcp::error::{DbError, DbResult};
use db_metadata_mcp::models::{Column, ConnectionDescriptor, DatabaseType};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct Stats {
    pub connects: AtomicUsize,
    pub closes: AtomicUsize,
    queries: Mutex<Vec<(String, Vec<String>)>>,
}

impl Stats {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Binds of every execution of `sql`, in call order.
    pub fn binds_for(&self, sql: &str) -> Vec<Vec<String>> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|(query, _)| query == sql)
            .map(|(_, binds)| binds.clone())
            .collect()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, Vec<CatalogRow>>,
    failures: HashMap<String, String>,
    refuse_connect: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    script: Arc<Script>,
    stats: Arc<Stats>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn script_mut(&mut self) -> &mut Script {
        Arc::get_mut(&mut self.script).expect("script is only edited before use")
    }

    pub fn respond(mut self, sql: &str, rows: Vec<CatalogRow>) -> Self {
        self.script_mut().responses.insert(sql.to_string(), rows);
        self
    }

    pub fn fail(mut self, sql: &str, message: &str) -> Self {
        self.script_mut()
            .failures
            .insert(sql.to_string(), message.to_string());
        self
    }

    pub fn refuse_connections(mut self) -> Self {
        self.script_mut().refuse_connect = true;
        self
    }

    pub fn stats(&self) -> Arc<Stats> {
        self.stats.clone()
    }
}

impl Connector for ScriptedConnector {
    type Connection = ScriptedConnection;

    async fn connect(&self, descriptor: &ConnectionDescriptor) -> DbResult<ScriptedConnection> {
        self.stats.connects.fetch_add(1, Ordering::SeqCst);
        if self.script.refuse_connect {
            return Err(DbError::connection(
                format!("Failed to connect to '{}': refused", descriptor.name),
                "Check that the database server is running",
            ));
        }
        Ok(ScriptedConnection {
            dialect: descriptor.dialect.clone(),
            script: self.script.clone(),
            stats: self.stats.clone(),
        })
    }
}

pub struct ScriptedConnection {
    dialect: String,
    script: Arc<Script>,
    stats: Arc<Stats>,
}

impl CatalogExecutor for ScriptedConnection {
    async fn fetch_catalog(&self, sql: &str, binds: &[&str]) -> DbResult<Vec<CatalogRow>> {
        self.stats.queries.lock().unwrap().push((
            sql.to_string(),
            binds.iter().map(|b| b.to_string()).collect(),
        ));
        if let Some(message) = self.script.failures.get(sql) {
            return Err(DbError::database(message.clone(), None, "Check the query"));
        }
        Ok(self.script.responses.get(sql).cloned().unwrap_or_default())
    }
}

impl CatalogConnection for ScriptedConnection {
    fn dialect(&self) -> &str {
        &self.dialect
    }

    async fn describe_columns(&self, table: &str) -> DbResult<Vec<Column>> {
        let db_type = DatabaseType::from_dialect(&self.dialect)
            .ok_or_else(|| DbError::configuration(format!("Unsupported {}", self.dialect)))?;
        ColumnInspector::describe(self, db_type, table).await
    }

    async fn close(&self) {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn descriptor(name: &str, dialect: &str, database: &str) -> ConnectionDescriptor {
    ConnectionDescriptor::new(name, dialect, "127.0.0.1", 3306, "tester", "secret", database)
}

pub fn resolver(
    connector: ScriptedConnector,
    connections: Vec<ConnectionDescriptor>,
) -> Arc<ConnectionResolver<ScriptedConnector>> {
    Arc::new(ConnectionResolver::new(connections, connector))
}

/// A column row as produced by the column queries.
pub fn column_row(name: &str, data_type: &str, nullable: bool, default: Option<&str>) -> CatalogRow {
    let row = CatalogRow::new()
        .with("column_name", name)
        .with("data_type", data_type)
        .with("is_nullable", if nullable { "YES" } else { "NO" });
    match default {
        Some(value) => row.with("column_default", value),
        None => row.with_null("column_default"),
    }
}
