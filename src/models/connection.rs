//! Connection-related data models.
//!
//! This module defines the named connection descriptors supplied by the
//! settings files and the database types the driver layer can open.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported database types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    PostgreSQL,
    /// Includes MariaDB
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Parse database type from a dialect identifier (client name in the settings file).
    ///
    /// Accepts the common driver aliases, case-insensitively.
    pub fn from_dialect(dialect: &str) -> Option<Self> {
        match dialect.trim().to_lowercase().as_str() {
            "pg" | "postgres" | "postgresql" => Some(Self::PostgreSQL),
            "mysql" | "mysql2" | "mariadb" => Some(Self::MySQL),
            "sqlite" | "sqlite3" | "better-sqlite3" => Some(Self::SQLite),
            _ => None,
        }
    }

    /// Get the display name for this database type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PostgreSQL => "PostgreSQL",
            Self::MySQL => "MySQL",
            Self::SQLite => "SQLite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A named, validated set of parameters sufficient to open a database connection.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionDescriptor {
    /// Unique within the configuration; matched exactly.
    pub name: String,
    /// Driver/client identifier, e.g. "mysql2" or "pg".
    pub dialect: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Contains sensitive data - never log
    #[serde(skip_serializing)]
    pub password: String,
    /// Schema/database name used to scope catalog queries.
    pub database: String,
}

impl ConnectionDescriptor {
    /// Create a new connection descriptor.
    pub fn new(
        name: impl Into<String>,
        dialect: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dialect: dialect.into(),
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Database type the driver layer will use to open this connection.
    pub fn database_type(&self) -> Option<DatabaseType> {
        DatabaseType::from_dialect(&self.dialect)
    }
}

impl std::fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("name", &self.name)
            .field("dialect", &self.dialect)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("database", &self.database)
            .finish()
    }
}
