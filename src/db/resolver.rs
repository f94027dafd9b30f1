//! Connection resolution by logical name.

use crate::db::catalog::Connector;
use crate::db::pool::SqlxConnector;
use crate::error::{DbError, DbResult};
use crate::models::ConnectionDescriptor;
use tracing::debug;

/// Maps connection names to live connections.
///
/// Holds the validated descriptors for the lifetime of the process; nothing
/// is opened until `resolve` is called.
#[derive(Debug)]
pub struct ConnectionResolver<K: Connector = SqlxConnector> {
    connections: Vec<ConnectionDescriptor>,
    connector: K,
}

impl<K: Connector> ConnectionResolver<K> {
    pub fn new(connections: Vec<ConnectionDescriptor>, connector: K) -> Self {
        Self {
            connections,
            connector,
        }
    }

    /// Configured connection names, in configuration order.
    pub fn connection_names(&self) -> Vec<String> {
        self.connections.iter().map(|c| c.name.clone()).collect()
    }

    pub fn connections(&self) -> &[ConnectionDescriptor] {
        &self.connections
    }

    /// Look up a descriptor by exact, case-sensitive name.
    pub fn descriptor(&self, name: &str) -> DbResult<&ConnectionDescriptor> {
        self.connections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DbError::connection_not_found(name))
    }

    /// Open a connection for `name`.
    ///
    /// Returns the live connection and the database name from the descriptor,
    /// which scopes the catalog queries.
    pub async fn resolve(&self, name: &str) -> DbResult<(K::Connection, String)> {
        let descriptor = self.descriptor(name)?;
        debug!(
            connection = %name,
            dialect = %descriptor.dialect,
            "Resolving connection"
        );
        let connection = self.connector.connect(descriptor).await?;
        Ok((connection, descriptor.database.clone()))
    }
}
