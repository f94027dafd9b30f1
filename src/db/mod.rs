//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Catalog access traits and the connection guard
//! - Per-request sqlx pools
//! - Connection resolution by name
//! - Column inspection
//! - Dialect metadata fetchers and their registry

pub mod catalog;
pub mod columns;
pub mod fetcher;
pub mod pool;
pub mod resolver;

pub use catalog::{CatalogConnection, CatalogExecutor, CatalogRow, ConnectionGuard, Connector};
pub use columns::ColumnInspector;
pub use fetcher::{FETCHERS, MetadataFetcher};
pub use pool::{DbPool, SqlxConnection, SqlxConnector};
pub use resolver::ConnectionResolver;
