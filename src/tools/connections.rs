//! Connection listing tool.

use crate::db::catalog::Connector;
use crate::db::pool::SqlxConnector;
use crate::db::resolver::ConnectionResolver;
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;

/// Output for the get_databases_available tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DatabasesAvailableOutput {
    /// Connection names usable as `connectionName` in get_table_details
    pub databases: Vec<String>,
    /// Number of connections
    pub count: usize,
}

pub struct ConnectionsToolHandler<K: Connector = SqlxConnector> {
    resolver: Arc<ConnectionResolver<K>>,
}

impl<K: Connector> ConnectionsToolHandler<K> {
    pub fn new(resolver: Arc<ConnectionResolver<K>>) -> Self {
        Self { resolver }
    }

    /// List configured connection names. Never opens a connection.
    pub fn list(&self) -> DatabasesAvailableOutput {
        let databases = self.resolver.connection_names();
        let count = databases.len();
        DatabasesAvailableOutput { databases, count }
    }
}
