//! Database metadata MCP server library.
//!
//! This library provides MCP (Model Context Protocol) tools that let AI
//! assistants inspect table structure in MySQL and PostgreSQL databases
//! (columns only for other dialects), plus migration prompt templates.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod prompts;
pub mod settings;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::MetadataService;
