//! MCP tool implementations.
//!
//! This module contains the tool handlers:
//! - `get_databases_available`: List configured connection names
//! - `get_table_details`: Columns, keys, indexes and triggers of a table

pub mod connections;
pub mod table_details;

pub use connections::{ConnectionsToolHandler, DatabasesAvailableOutput};
pub use table_details::{GetTableDetailsInput, TableDetailsToolHandler, collect_table_details};
