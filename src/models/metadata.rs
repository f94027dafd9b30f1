//! Table metadata models.
//!
//! These types form the uniform response shape shared by every dialect:
//! columns, key constraints, indexes and triggers of a single table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    /// Type name as the catalog reports it: `data_type` on MySQL and PostgreSQL
    /// (e.g. "int", "character varying"), the declared type on SQLite (e.g. "VARCHAR(50)")
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    /// Default expression as stored in the catalog, if any
    pub default: Option<String>,
    /// True when the column is part of the primary key
    pub is_primary_key: bool,
}

impl Column {
    /// Create a new column. `is_primary_key` always starts false.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
            default: None,
            is_primary_key: false,
        }
    }

    /// Set the default value expression.
    pub fn with_default(mut self, default: Option<String>) -> Self {
        self.default = default;
        self
    }
}

/// A primary or foreign key constraint.
///
/// For foreign keys, `columns` and `referenced_columns` are parallel sequences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_columns: Option<Vec<String>>,
}

impl Constraint {
    /// Create a primary key constraint.
    pub fn primary_key(name: Option<String>, columns: Vec<String>) -> Self {
        Self {
            name,
            columns,
            referenced_table: None,
            referenced_columns: None,
        }
    }

    /// Create an empty foreign key constraint to be filled row by row.
    pub fn foreign_key(name: impl Into<String>, referenced_table: Option<String>) -> Self {
        Self {
            name: Some(name.into()),
            columns: Vec::new(),
            referenced_table,
            referenced_columns: Some(Vec::new()),
        }
    }
}

/// A secondary index. Primary-key-backed indexes are never reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// A trigger defined on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub name: String,
    /// INSERT, UPDATE or DELETE
    pub event_manipulation: String,
    /// BEFORE or AFTER
    pub action_timing: String,
    /// Raw trigger body or definition text
    pub action_statement: String,
}

/// Aggregate metadata of a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableDetails {
    pub table_name: String,
    pub columns: Vec<Column>,
    /// Absent when the table has no primary key or the dialect has no metadata support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key_constraint: Option<Constraint>,
    pub foreign_key_constraints: Vec<Constraint>,
    pub indexes: Vec<Index>,
    pub triggers: Vec<Trigger>,
}

impl TableDetails {
    /// Result for a dialect without a metadata fetcher: columns and nothing else.
    pub fn columns_only(table_name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            primary_key_constraint: None,
            foreign_key_constraints: Vec::new(),
            indexes: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Mark exactly the columns named by the primary key constraint.
    pub fn apply_primary_key(&mut self) {
        let pk_columns: &[String] = self
            .primary_key_constraint
            .as_ref()
            .map(|pk| pk.columns.as_slice())
            .unwrap_or(&[]);

        for column in &mut self.columns {
            column.is_primary_key = pk_columns.contains(&column.name);
        }
    }

    /// Names of the columns currently flagged as primary key, in column order.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }
}
