//! DB2 value conversions.

use std::borrow::Cow;

use crate::core::column::ColumnType;
use crate::core::schema::Field;
use crate::core::traits::BoundStatement;
use crate::core::types;
use crate::core::value::{SqlValue, Value};
use crate::dialect::write::{bind_error, check_variant, write_default};
use crate::dialect::RecordMarshaller;
use crate::error::Result;

use super::schema::is_xml;
use super::Db2Dialect;

impl RecordMarshaller for Db2Dialect {
    fn write_value(
        &self,
        stmt: &mut dyn BoundStatement,
        index: usize,
        value: &Value,
        field: &Field,
        column: &ColumnType,
    ) -> Result<()> {
        if let Value::String(xml) = value {
            if is_xml(column.sql_type, &column.type_name) {
                check_variant(value, field, column)?;
                return stmt
                    .bind_as(index, SqlValue::Text(Cow::Borrowed(xml.as_str())), types::SQLXML)
                    .map_err(|e| bind_error(column, e));
            }
        }
        write_default(stmt, index, value, field, column)
    }
}
