//! Data models for the database metadata MCP server.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod metadata;

// Re-export commonly used types
pub use connection::{ConnectionDescriptor, DatabaseType};
pub use metadata::{Column, Constraint, Index, TableDetails, Trigger};
