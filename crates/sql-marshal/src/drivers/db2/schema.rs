//! DB2 schema mapping and write compatibility.

use crate::core::column::ColumnDescriptor;
use crate::core::schema::{Field, FieldType};
use crate::core::types;
use crate::dialect::reader::default_field;
use crate::dialect::validate::default_compatible;
use crate::dialect::{FieldMapping, FieldsValidator, ReaderOptions, SchemaReader};
use crate::error::Result;

use super::{Db2Dialect, DECFLOAT};

pub(super) fn is_decfloat(sql_type: i32, type_name: &str) -> bool {
    sql_type == DECFLOAT || type_name.eq_ignore_ascii_case("DECFLOAT")
}

pub(super) fn is_xml(sql_type: i32, type_name: &str) -> bool {
    sql_type == types::SQLXML || type_name.eq_ignore_ascii_case("XML")
}

impl SchemaReader for Db2Dialect {
    fn reader_options(&self) -> &ReaderOptions {
        &self.options
    }

    fn get_field(&self, column: &ColumnDescriptor) -> Result<FieldMapping> {
        let field_type = if is_decfloat(column.sql_type, &column.type_name) {
            FieldType::Double
        } else if is_xml(column.sql_type, &column.type_name) {
            FieldType::String
        } else {
            return default_field(column, &self.options);
        };
        Ok(FieldMapping::exact(
            Field::new(column.name.as_str(), field_type).with_nullable(column.nullable),
        ))
    }
}

impl FieldsValidator for Db2Dialect {
    fn is_field_compatible(&self, field: &Field, column: &ColumnDescriptor) -> bool {
        if is_decfloat(column.sql_type, &column.type_name) {
            return field.decimal_spec().is_some()
                || (field.logical_type.is_none() && field.field_type == FieldType::Double);
        }
        if is_xml(column.sql_type, &column.type_name) {
            return field.logical_type.is_none() && field.field_type == FieldType::String;
        }
        default_compatible(field, column)
    }
}
