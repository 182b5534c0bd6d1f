//! Oracle schema mapping and write compatibility.

use crate::core::column::ColumnDescriptor;
use crate::core::schema::{Field, FieldType, LogicalType};
use crate::core::types;
use crate::dialect::reader::default_field;
use crate::dialect::validate::default_compatible;
use crate::dialect::{FieldMapping, FieldsValidator, ReaderOptions, SchemaReader};
use crate::error::Result;

use super::{
    OracleDialect, BFILE, BINARY_DOUBLE, BINARY_FLOAT, INTERVALDS, INTERVALYM, TIMESTAMPLTZ,
    TIMESTAMPTZ,
};

/// Runtime class the driver reports for FLOAT/REAL (binary precision) numbers.
const DOUBLE_CLASS: &str = "java.lang.Double";

pub(super) fn is_long(type_name: &str) -> bool {
    type_name.trim().eq_ignore_ascii_case("LONG")
}

pub(super) fn is_long_raw(type_name: &str) -> bool {
    type_name.trim().eq_ignore_ascii_case("LONG RAW")
}

fn is_double_number(column: &ColumnDescriptor) -> bool {
    types::is_fixed_point(column.sql_type) && column.class_name.as_deref() == Some(DOUBLE_CLASS)
}

/// NUMBER(p,0) with at least `digits` of precision.
fn integral_number(column: &ColumnDescriptor, digits: i32) -> bool {
    types::is_fixed_point(column.sql_type) && column.scale == 0 && column.precision >= digits
}

impl SchemaReader for OracleDialect {
    fn reader_options(&self) -> &ReaderOptions {
        &self.options
    }

    fn get_field(&self, column: &ColumnDescriptor) -> Result<FieldMapping> {
        let name = column.name.as_str();
        let field = match column.sql_type {
            TIMESTAMPTZ => self.options.timezone_policy.field(name),
            TIMESTAMPLTZ => Field::logical(name, LogicalType::TimestampMicros),
            BINARY_FLOAT => Field::new(name, FieldType::Float),
            BINARY_DOUBLE => Field::new(name, FieldType::Double),
            BFILE => Field::new(name, FieldType::Bytes),
            INTERVALYM | INTERVALDS => Field::new(name, FieldType::String),
            _ if is_long_raw(&column.type_name) => Field::new(name, FieldType::Bytes),
            _ if is_long(&column.type_name) => Field::new(name, FieldType::String),
            // deliberate heuristic: FLOAT/REAL surface as NUMBER with a Double class
            _ if is_double_number(column) => Field::new(name, FieldType::Double),
            _ => return default_field(column, &self.options),
        };
        Ok(FieldMapping::exact(field.with_nullable(column.nullable)))
    }
}

impl FieldsValidator for OracleDialect {
    fn is_field_compatible(&self, field: &Field, column: &ColumnDescriptor) -> bool {
        let code = column.sql_type;
        if code == BFILE {
            // locators are read-only, nothing binds to them
            return false;
        }
        let vendor = match (field.logical_type, field.field_type) {
            (None, FieldType::Int) => integral_number(column, 10),
            (None, FieldType::Long) => integral_number(column, 19),
            (None, FieldType::Boolean) => integral_number(column, 1),
            (None, FieldType::String) => {
                matches!(code, TIMESTAMPTZ | TIMESTAMPLTZ | INTERVALYM | INTERVALDS | types::ROWID)
                    || is_long(&column.type_name)
            }
            (None, FieldType::Bytes) => is_long_raw(&column.type_name),
            (None, FieldType::Float) => code == BINARY_FLOAT,
            (None, FieldType::Double) => code == BINARY_DOUBLE || is_double_number(column),
            (Some(LogicalType::TimestampMicros), _) => matches!(code, TIMESTAMPTZ | TIMESTAMPLTZ),
            // DATE carries a time of day and is reported as TIMESTAMP
            (Some(LogicalType::Date), _) => {
                code == types::TIMESTAMP && column.type_name_upper() == "DATE"
            }
            _ => false,
        };
        vendor || default_compatible(field, column)
    }
}
