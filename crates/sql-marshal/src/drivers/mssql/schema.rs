//! MSSQL schema mapping and write compatibility.

use crate::core::column::ColumnDescriptor;
use crate::core::schema::{Field, FieldType, LogicalType};
use crate::core::types;
use crate::dialect::reader::default_field;
use crate::dialect::validate::default_compatible;
use crate::dialect::{FieldMapping, FieldsValidator, ReaderOptions, SchemaReader};
use crate::error::Result;

use super::{MssqlDialect, DATETIMEOFFSET, GEOGRAPHY, GEOMETRY, SQL_VARIANT};

/// SQL Server column families that need vendor handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MssqlType {
    Spatial,
    DateTimeOffset,
    Variant,
    RowVersion,
    /// `time(7)`: 100ns granularity.
    Time,
}

pub(super) fn classify(sql_type: i32, type_name: &str) -> Option<MssqlType> {
    let name = type_name.to_ascii_lowercase();
    match (sql_type, name.as_str()) {
        (GEOMETRY | GEOGRAPHY, _) | (_, "geometry" | "geography") => Some(MssqlType::Spatial),
        (DATETIMEOFFSET, _) | (_, "datetimeoffset") => Some(MssqlType::DateTimeOffset),
        (SQL_VARIANT, _) | (_, "sql_variant") => Some(MssqlType::Variant),
        (types::BINARY | types::VARBINARY, "timestamp" | "rowversion") => {
            Some(MssqlType::RowVersion)
        }
        (types::TIME, _) => Some(MssqlType::Time),
        _ => None,
    }
}

impl SchemaReader for MssqlDialect {
    fn reader_options(&self) -> &ReaderOptions {
        &self.options
    }

    fn get_field(&self, column: &ColumnDescriptor) -> Result<FieldMapping> {
        let name = column.name.as_str();
        let field = match classify(column.sql_type, &column.type_name) {
            Some(MssqlType::Spatial) | Some(MssqlType::RowVersion) => {
                Field::new(name, FieldType::Bytes)
            }
            Some(MssqlType::DateTimeOffset) => self.options.timezone_policy.field(name),
            Some(MssqlType::Variant) => Field::new(name, FieldType::String),
            Some(MssqlType::Time) | None => return default_field(column, &self.options),
        };
        Ok(FieldMapping::exact(field.with_nullable(column.nullable)))
    }
}

impl FieldsValidator for MssqlDialect {
    fn is_field_compatible(&self, field: &Field, column: &ColumnDescriptor) -> bool {
        let primitive = field.logical_type.is_none();
        let vendor = match classify(column.sql_type, &column.type_name) {
            Some(MssqlType::Spatial) => {
                primitive && matches!(field.field_type, FieldType::String | FieldType::Bytes)
            }
            Some(MssqlType::DateTimeOffset) => {
                (primitive && field.field_type == FieldType::String)
                    || field.logical_type == Some(LogicalType::TimestampMicros)
            }
            Some(MssqlType::Variant) => primitive && field.field_type == FieldType::String,
            _ => false,
        };
        vendor || default_compatible(field, column)
    }
}
