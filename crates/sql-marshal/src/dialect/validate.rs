//! Fields validator: is a canonical schema writable into a table?
//!
//! Validation never fails fast. Every field is checked and every problem is
//! reported, so one run shows the complete picture.

use std::fmt;

use serde::Serialize;

use crate::core::column::{ColumnDescriptor, ColumnRemap};
use crate::core::schema::{Field, FieldType, LogicalType, Schema};
use crate::core::types::{self, is_binary_type, is_string_type};

/// What went wrong for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompatibilityKind {
    /// No column with the field's (remapped) name.
    MissingColumn,
    /// Nullable field, NOT NULL column.
    Nullability,
    /// Field type cannot be written into the column type.
    Type,
}

/// One field/column problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incompatibility {
    pub field: String,
    pub kind: IncompatibilityKind,
    /// Canonical type (or nullability) the field needs.
    pub expected: String,
    /// Column type name (or nullability) actually found.
    pub actual: String,
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IncompatibilityKind::MissingColumn => write!(
                f,
                "field '{}' ({}) has no matching column",
                self.field, self.expected
            ),
            IncompatibilityKind::Nullability => write!(
                f,
                "field '{}' is {} but the column is {}",
                self.field, self.expected, self.actual
            ),
            IncompatibilityKind::Type => write!(
                f,
                "field '{}' of type {} cannot be written to column of type {}",
                self.field, self.expected, self.actual
            ),
        }
    }
}

/// Checks schemas against live table columns.
pub trait FieldsValidator: Send + Sync {
    /// Type compatibility of one field with one column.
    fn is_field_compatible(&self, field: &Field, column: &ColumnDescriptor) -> bool {
        default_compatible(field, column)
    }

    /// Check every field, matching columns by field name.
    fn validate(&self, schema: &Schema, columns: &[ColumnDescriptor]) -> Vec<Incompatibility> {
        self.validate_remapped(schema, columns, &ColumnRemap::default())
    }

    /// Check every field, matching columns through a field-to-column remap.
    fn validate_remapped(
        &self,
        schema: &Schema,
        columns: &[ColumnDescriptor],
        remap: &ColumnRemap,
    ) -> Vec<Incompatibility> {
        let mut problems = Vec::new();
        for field in schema.fields() {
            let target = remap.column_for(&field.name);
            let Some(column) = columns.iter().find(|c| c.name.eq_ignore_ascii_case(target)) else {
                problems.push(Incompatibility {
                    field: field.name.clone(),
                    kind: IncompatibilityKind::MissingColumn,
                    expected: field.type_name(),
                    actual: "<missing>".to_string(),
                });
                continue;
            };
            if field.nullable && !column.nullable {
                problems.push(Incompatibility {
                    field: field.name.clone(),
                    kind: IncompatibilityKind::Nullability,
                    expected: "nullable".to_string(),
                    actual: "NOT NULL".to_string(),
                });
            }
            if !self.is_field_compatible(field, column) {
                problems.push(Incompatibility {
                    field: field.name.clone(),
                    kind: IncompatibilityKind::Type,
                    expected: field.type_name(),
                    actual: column.display_type(),
                });
            }
        }
        problems
    }
}

/// Standard compatibility matrix. Logical type decides first, then primitive.
pub fn default_compatible(field: &Field, column: &ColumnDescriptor) -> bool {
    let code = column.sql_type;
    match field.logical_type {
        Some(LogicalType::Date) => code == types::DATE,
        Some(LogicalType::TimeMicros) => code == types::TIME,
        Some(LogicalType::TimestampMicros) => {
            matches!(code, types::TIMESTAMP | types::TIMESTAMP_WITH_TIMEZONE)
        }
        Some(LogicalType::Datetime) => code == types::TIMESTAMP,
        Some(LogicalType::Decimal { .. }) => types::is_fixed_point(code),
        None => match field.field_type {
            FieldType::Null => true,
            FieldType::Boolean => code == types::BOOLEAN || code == types::BIT,
            FieldType::Int => matches!(code, types::INTEGER | types::SMALLINT | types::TINYINT),
            // unsigned INTEGER overflows i32 and is read as a long
            FieldType::Long => {
                code == types::BIGINT || (code == types::INTEGER && !column.signed)
            }
            FieldType::Float => code == types::REAL || code == types::FLOAT,
            FieldType::Double => code == types::DOUBLE,
            FieldType::Bytes => is_binary_type(code),
            FieldType::String => {
                is_string_type(code)
                    || matches!(
                        code,
                        types::TIMESTAMP_WITH_TIMEZONE | types::TIME_WITH_TIMEZONE | types::ROWID
                    )
            }
        },
    }
}
