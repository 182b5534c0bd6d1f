//! MySQL schema mapping and write compatibility.

use crate::core::column::ColumnDescriptor;
use crate::core::schema::{Field, FieldType};
use crate::core::types;
use crate::dialect::reader::default_field;
use crate::dialect::validate::default_compatible;
use crate::dialect::{FieldMapping, FieldsValidator, ReaderOptions, SchemaReader};
use crate::error::Result;

use super::MysqlDialect;

const SPATIAL_TYPES: &[&str] = &[
    "GEOMETRY",
    "POINT",
    "LINESTRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
    "GEOMCOLLECTION",
];

/// MySQL column families that need vendor handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MysqlType {
    Year,
    BigintUnsigned,
    MultiBit,
    Textual,
    Spatial,
}

/// Declared type name without its `(n)` length, upper-cased.
fn base_type(type_name: &str) -> String {
    let name = type_name.trim().to_ascii_uppercase();
    name.split('(').next().unwrap_or_default().trim().to_string()
}

/// `YEAR` and `YEAR(4)`.
pub(super) fn is_year(type_name: &str) -> bool {
    base_type(type_name) == "YEAR"
}

pub(super) fn classify(column: &ColumnDescriptor) -> Option<MysqlType> {
    if is_year(&column.type_name) {
        return Some(MysqlType::Year);
    }
    let name = column.type_name_upper();
    let base = base_type(&name);
    let base = base.as_str();
    if name == "BIGINT UNSIGNED" || (column.sql_type == types::BIGINT && !column.signed) {
        return Some(MysqlType::BigintUnsigned);
    }
    if column.sql_type == types::BIT && column.precision > 1 {
        return Some(MysqlType::MultiBit);
    }
    if matches!(base, "JSON" | "ENUM" | "SET") {
        return Some(MysqlType::Textual);
    }
    if SPATIAL_TYPES.contains(&base) {
        return Some(MysqlType::Spatial);
    }
    None
}

impl SchemaReader for MysqlDialect {
    fn reader_options(&self) -> &ReaderOptions {
        &self.options
    }

    fn get_field(&self, column: &ColumnDescriptor) -> Result<FieldMapping> {
        let name = column.name.as_str();
        let field = match classify(column) {
            Some(MysqlType::Year) => Field::new(name, FieldType::Int),
            Some(MysqlType::BigintUnsigned) => Field::decimal(name, 20, 0),
            Some(MysqlType::MultiBit) | Some(MysqlType::Spatial) => Field::new(name, FieldType::Bytes),
            Some(MysqlType::Textual) => Field::new(name, FieldType::String),
            None => return default_field(column, &self.options),
        };
        Ok(FieldMapping::exact(field.with_nullable(column.nullable)))
    }
}

impl FieldsValidator for MysqlDialect {
    fn is_field_compatible(&self, field: &Field, column: &ColumnDescriptor) -> bool {
        let class = classify(column);
        let vendor = match (class, field.logical_type, field.field_type) {
            (Some(MysqlType::Year), None, FieldType::Int) => true,
            (Some(MysqlType::BigintUnsigned), Some(_), _) => field.decimal_spec().is_some(),
            (Some(MysqlType::MultiBit) | Some(MysqlType::Spatial), None, FieldType::Bytes) => true,
            (Some(MysqlType::Textual), None, FieldType::String) => true,
            _ => false,
        };
        if class == Some(MysqlType::Year) {
            // YEAR reports the DATE code but only holds integers
            return vendor;
        }
        vendor || default_compatible(field, column)
    }
}
