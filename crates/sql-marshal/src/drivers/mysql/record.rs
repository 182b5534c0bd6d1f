//! MySQL value conversions.

use chrono::Datelike;

use crate::core::column::{ColumnDescriptor, ColumnType};
use crate::core::schema::Field;
use crate::core::traits::{Accessor, BoundStatement, ResultCursor};
use crate::core::types;
use crate::core::value::{SqlValue, Value};
use crate::dialect::read::{fetch, read_default, to_canonical};
use crate::dialect::write::{bind_error, check_variant, write_default};
use crate::dialect::RecordMarshaller;
use crate::error::Result;

use super::schema::{classify, is_year, MysqlType};
use super::MysqlDialect;

/// Big-endian bytes of a BIT(n) value, `ceil(n / 8)` bytes wide.
fn bit_bytes(value: i64, bits: i32) -> Vec<u8> {
    let width = ((bits.max(1) + 7) / 8).min(8) as usize;
    value.to_be_bytes()[8 - width..].to_vec()
}

impl RecordMarshaller for MysqlDialect {
    fn read_value(
        &self,
        cursor: &mut dyn ResultCursor,
        index: usize,
        column: &ColumnDescriptor,
        field: &Field,
    ) -> Result<Value> {
        match classify(column) {
            Some(MysqlType::Year) => match fetch(cursor, index, column, Accessor::Int)? {
                // Some drivers surface YEAR as a date on January 1st
                SqlValue::Date(d) => Ok(Value::Int(d.year())),
                other => to_canonical(other, column, field),
            },
            Some(MysqlType::MultiBit) => match fetch(cursor, index, column, Accessor::Bytes)? {
                SqlValue::I64(v) => Ok(Value::Bytes(bit_bytes(v, column.precision))),
                other => to_canonical(other, column, field),
            },
            _ => read_default(cursor, index, column, field),
        }
    }

    fn write_value(
        &self,
        stmt: &mut dyn BoundStatement,
        index: usize,
        value: &Value,
        field: &Field,
        column: &ColumnType,
    ) -> Result<()> {
        if let Value::Int(year) = value {
            if is_year(&column.type_name) {
                check_variant(value, field, column)?;
                return stmt
                    .bind_as(index, SqlValue::I32(*year), types::INTEGER)
                    .map_err(|e| bind_error(column, e));
            }
        }
        write_default(stmt, index, value, field, column)
    }
}
