//! Column metadata and column-type bindings.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::schema::Schema;
use crate::core::types::{self, SqlTypeCode};
use crate::error::{MarshalError, Result};

fn default_true() -> bool {
    true
}

/// Driver-reported metadata for one result or table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// SQL type code (JDBC numbering, or a vendor code).
    pub sql_type: SqlTypeCode,

    /// Declared type name, e.g. `VARCHAR2`, `BIGINT UNSIGNED`, `timestamptz`.
    #[serde(default)]
    pub type_name: String,

    /// Declared precision (0 when unconstrained or not applicable).
    #[serde(default)]
    pub precision: i32,

    /// Declared scale (may be negative for Oracle NUMBER).
    #[serde(default)]
    pub scale: i32,

    /// Whether the column accepts nulls.
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Whether a numeric column is signed.
    #[serde(default = "default_true")]
    pub signed: bool,

    /// Driver-reported native value class, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl ColumnDescriptor {
    /// Create a nullable, signed column with no precision.
    pub fn new(name: impl Into<String>, sql_type: SqlTypeCode, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type,
            type_name: type_name.into(),
            precision: 0,
            scale: 0,
            nullable: true,
            signed: true,
            class_name: None,
        }
    }

    #[must_use]
    pub fn with_precision(mut self, precision: i32, scale: i32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.signed = false;
        self
    }

    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Declared type name, upper-cased, for dialect matching.
    pub fn type_name_upper(&self) -> String {
        self.type_name.trim().to_ascii_uppercase()
    }

    /// Declared type name if present, else the standard code name.
    pub fn display_type(&self) -> String {
        if !self.type_name.is_empty() {
            return self.type_name.clone();
        }
        match types::type_code_name(self.sql_type) {
            Some(name) => name.to_string(),
            None => format!("type code {}", self.sql_type),
        }
    }
}

/// Optionally schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Field name to column name remapping for sinks.
///
/// Keys are matched case-insensitively; unmapped fields keep their name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnRemap(HashMap<String, String>);

impl ColumnRemap {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Target column name for a field.
    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(field))
            .map(|(_, v)| v.as_str())
            .unwrap_or(field)
    }
}

impl FromIterator<(String, String)> for ColumnRemap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One position of a sink's bound statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub field_name: String,
    pub column_name: String,
    pub type_name: String,
    pub sql_type: SqlTypeCode,
    pub precision: i32,
    pub scale: i32,
}

impl ColumnType {
    /// Declared type name, upper-cased.
    pub fn type_name_upper(&self) -> String {
        self.type_name.trim().to_ascii_uppercase()
    }
}

/// Ordered, immutable list of bound statement positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypeBinding {
    columns: Vec<ColumnType>,
}

impl ColumnTypeBinding {
    /// Bind every schema field, in schema order, to its table column.
    ///
    /// The schema must already be validated against `table_columns`.
    pub fn resolve(
        schema: &Schema,
        table_columns: &[ColumnDescriptor],
        remap: &ColumnRemap,
    ) -> Result<Self> {
        let mut columns = Vec::with_capacity(schema.len());
        for field in schema.fields() {
            let target = remap.column_for(&field.name);
            let col = table_columns
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(target))
                .ok_or_else(|| {
                    MarshalError::Config(format!(
                        "field '{}' maps to column '{}', which is not in the table",
                        field.name, target
                    ))
                })?;
            columns.push(ColumnType {
                field_name: field.name.clone(),
                column_name: col.name.clone(),
                type_name: col.type_name.clone(),
                sql_type: col.sql_type,
                precision: col.precision,
                scale: col.scale,
            });
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnType] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Target column names in bind order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.column_name.clone()).collect()
    }
}
