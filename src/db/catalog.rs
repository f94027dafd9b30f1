//! Catalog access seam.
//!
//! Metadata fetchers and the column inspector only need to run read-only
//! catalog queries and read text values back. These traits keep them
//! independent of the concrete driver, and `ConnectionGuard` makes sure every
//! opened connection is closed exactly once.

use crate::error::DbResult;
use crate::models::{Column, ConnectionDescriptor};
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// One row of a catalog query, as ordered `(label, value)` pairs.
///
/// Labels are matched ASCII case-insensitively, so `EVENT_MANIPULATION` and
/// `event_manipulation` read the same value. NULL is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow {
    values: Vec<(String, Option<String>)>,
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a non-null value (builder style).
    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(label, Some(value.into()));
        self
    }

    /// Append a NULL value (builder style).
    pub fn with_null(mut self, label: impl Into<String>) -> Self {
        self.push(label, None);
        self
    }

    pub fn push(&mut self, label: impl Into<String>, value: Option<String>) {
        self.values.push((label.into(), value));
    }

    /// Value of the first column whose label matches, or `None` when missing or NULL.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .and_then(|(_, value)| value.as_deref())
    }

    /// Value as an owned string, empty when missing or NULL.
    pub fn text(&self, label: &str) -> String {
        self.get(label).map(str::to_string).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Runs read-only catalog queries with text bind parameters.
pub trait CatalogExecutor: Send + Sync {
    /// Execute `sql` with positional `binds` and return all rows.
    fn fetch_catalog(
        &self,
        sql: &str,
        binds: &[&str],
    ) -> impl Future<Output = DbResult<Vec<CatalogRow>>> + Send;
}

/// A live connection opened for a single request.
pub trait CatalogConnection: CatalogExecutor {
    /// Dialect identifier the connection was opened with (e.g. "mysql2", "pg").
    fn dialect(&self) -> &str;

    /// Column-level metadata of `table`, with `is_primary_key` always false.
    fn describe_columns(&self, table: &str) -> impl Future<Output = DbResult<Vec<Column>>> + Send;

    /// Release the underlying connection.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

/// Opens connections from descriptors.
pub trait Connector: Send + Sync {
    type Connection: CatalogConnection + 'static;

    fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> impl Future<Output = DbResult<Self::Connection>> + Send;
}

/// Owns an open connection and closes it exactly once.
///
/// Call `release()` when done. If the guard is dropped instead (early return,
/// panic, cancelled future), the close is spawned on the current runtime.
pub struct ConnectionGuard<C: CatalogConnection + 'static> {
    connection: Arc<C>,
    name: String,
    released: bool,
}

impl<C: CatalogConnection + 'static> std::fmt::Debug for ConnectionGuard<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("name", &self.name)
            .field("dialect", &self.connection.dialect())
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl<C: CatalogConnection + 'static> ConnectionGuard<C> {
    pub fn new(connection: C, name: impl Into<String>) -> Self {
        Self {
            connection: Arc::new(connection),
            name: name.into(),
            released: false,
        }
    }

    /// Get a reference to the guarded connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Explicitly close the connection (preferred over relying on Drop).
    pub async fn release(mut self) {
        self.released = true;
        self.connection.close().await;
    }
}

impl<C: CatalogConnection + 'static> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let connection = Arc::clone(&self.connection);
        let name = std::mem::take(&mut self.name);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    connection.close().await;
                    warn!(
                        connection = %name,
                        "Connection closed via Drop - consider using explicit release()"
                    );
                });
            }
            Err(_) => {
                warn!(
                    connection = %name,
                    "Connection dropped outside a runtime; it will not be closed gracefully"
                );
            }
        }
    }
}
