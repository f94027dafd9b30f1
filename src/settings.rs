//! Settings files with the named database connections.
//!
//! Settings are JSON documents merged from up to three sources, later sources
//! winning: the global file in the user's home directory, a local file in the
//! working directory, and an explicit `--config` path.

use crate::error::{DbError, DbResult};
use crate::models::ConnectionDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const GLOBAL_SETTINGS_DIR: &str = ".mcp-database-metadata";
pub const GLOBAL_SETTINGS_FILE: &str = "settings.json";
pub const LOCAL_SETTINGS_FILE: &str = "mcp-database-metadata.settings.json";

/// Root of a settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub database_connections: Vec<ConnectionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEntry {
    pub connection_name: String,
    pub config: ClientConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Driver identifier, e.g. "pg" or "mysql2"
    pub client: String,
    pub connection: ConnectionParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Settings {
    /// Parse and validate a (merged) settings document.
    ///
    /// All problems are reported together in one configuration error.
    pub fn from_value(value: Value) -> DbResult<Self> {
        let settings: Settings = serde_json::from_value(value)
            .map_err(|e| DbError::configuration(format!("Invalid settings document: {}", e)))?;

        let issues = settings.validate();
        if issues.is_empty() {
            Ok(settings)
        } else {
            Err(DbError::configuration(format!(
                "Invalid settings document: {}",
                issues.join("; ")
            )))
        }
    }

    /// Check field-level rules serde cannot express.
    fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for (i, entry) in self.database_connections.iter().enumerate() {
            let prefix = format!("databaseConnections[{}]", i);
            let connection = &entry.config.connection;

            let required = [
                ("connectionName", entry.connection_name.as_str()),
                ("config.client", entry.config.client.as_str()),
                ("config.connection.host", connection.host.as_str()),
                ("config.connection.user", connection.user.as_str()),
                ("config.connection.database", connection.database.as_str()),
            ];
            for (field, value) in required {
                if value.trim().is_empty() {
                    issues.push(format!("{}.{} must not be empty", prefix, field));
                }
            }

            if connection.port == 0 {
                issues.push(format!(
                    "{}.config.connection.port must be a positive number",
                    prefix
                ));
            }

            if !entry.connection_name.is_empty() && !seen.insert(entry.connection_name.as_str()) {
                issues.push(format!(
                    "{}.connectionName '{}' is already used by another connection",
                    prefix, entry.connection_name
                ));
            }
        }

        issues
    }

    /// Convert the entries into connection descriptors, keeping their order.
    pub fn into_descriptors(self) -> Vec<ConnectionDescriptor> {
        self.database_connections
            .into_iter()
            .map(|entry| {
                let params = entry.config.connection;
                ConnectionDescriptor::new(
                    entry.connection_name,
                    entry.config.client,
                    params.host,
                    params.port,
                    params.user,
                    params.password,
                    params.database,
                )
            })
            .collect()
    }

    /// Starter document written by the `init` command.
    pub fn example() -> Self {
        Self {
            database_connections: vec![ConnectionEntry {
                connection_name: "example_db".to_string(),
                config: ClientConfig {
                    client: "pg".to_string(),
                    connection: ConnectionParams {
                        host: "127.0.0.1".to_string(),
                        port: 5432,
                        user: "user".to_string(),
                        password: "password".to_string(),
                        database: "mydatabase".to_string(),
                    },
                },
            }],
        }
    }

    /// Write this document as pretty JSON, creating parent directories.
    pub fn write_to(&self, path: &Path) -> DbResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::configuration(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DbError::internal(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            DbError::configuration(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

/// Path of the global settings file, if a home directory is known.
pub fn global_settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(GLOBAL_SETTINGS_DIR).join(GLOBAL_SETTINGS_FILE))
}

/// Write `Settings::example()` to `path`.
///
/// An existing file is left untouched unless `force` is set.
pub fn init_settings(path: &Path, force: bool) -> DbResult<()> {
    if path.exists() && !force {
        return Err(DbError::configuration(format!(
            "Settings file already exists at {}. Use --force to overwrite it",
            path.display()
        )));
    }
    Settings::example().write_to(path)?;
    info!(path = %path.display(), "Wrote example settings");
    Ok(())
}

/// Loads and merges the settings sources.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    sources: Vec<PathBuf>,
}

impl SettingsLoader {
    /// Standard sources: global, local, then the optional CLI path.
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        let mut sources = Vec::new();
        if let Some(global) = global_settings_path() {
            sources.push(global);
        }
        sources.push(PathBuf::from(LOCAL_SETTINGS_FILE));
        sources.extend(cli_path);
        Self { sources }
    }

    /// Explicit sources in merge order (lowest precedence first).
    pub fn with_sources(sources: Vec<PathBuf>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Merge every readable source and validate the result.
    ///
    /// Returns `Ok(None)` when no source exists or the merged document is empty.
    pub fn load(&self) -> DbResult<Option<Settings>> {
        let merged = self
            .sources
            .iter()
            .filter_map(|path| read_settings_file(path))
            .reduce(deep_merge);

        match merged {
            None => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(value) => {
                let settings = Settings::from_value(value)?;
                info!(
                    connections = settings.database_connections.len(),
                    "Settings loaded"
                );
                Ok(Some(settings))
            }
        }
    }
}

/// Read one settings file. Missing files are skipped silently, unreadable
/// or malformed ones with a warning.
fn read_settings_file(path: &Path) -> Option<Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Settings file not found");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read settings file, skipping");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => {
            debug!(path = %path.display(), "Read settings file");
            Some(value)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Settings file is not valid JSON, skipping");
            None
        }
    }
}

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key by key; any other overlay value (arrays included)
/// replaces the base value.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}
