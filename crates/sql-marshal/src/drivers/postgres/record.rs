//! PostgreSQL value conversions.

use std::borrow::Cow;

use crate::core::column::{ColumnDescriptor, ColumnType};
use crate::core::schema::{Field, FieldType};
use crate::core::traits::{Accessor, BoundStatement, ResultCursor};
use crate::core::types;
use crate::core::value::{SqlValue, Value};
use crate::dialect::read::{fetch, read_default, to_canonical};
use crate::dialect::write::{bind_error, check_variant, offset_from_text, write_default};
use crate::dialect::RecordMarshaller;
use crate::error::Result;

use super::schema::{classify, PgType};
use super::PostgresDialect;

impl RecordMarshaller for PostgresDialect {
    fn read_value(
        &self,
        cursor: &mut dyn ResultCursor,
        index: usize,
        column: &ColumnDescriptor,
        field: &Field,
    ) -> Result<Value> {
        match classify(&column.type_name, column.sql_type, column.precision) {
            Some(PgType::TimestampTz) => {
                let value = fetch(cursor, index, column, Accessor::TimestampTz)?;
                to_canonical(value, column, field)
            }
            Some(PgType::StringMapped) if field.field_type == FieldType::String => {
                match fetch(cursor, index, column, Accessor::String)? {
                    SqlValue::Bool(b) => Ok(Value::String(if b { "1" } else { "0" }.to_string())),
                    other => to_canonical(other, column, field),
                }
            }
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
        let class = classify(&column.type_name, column.sql_type, column.precision);
        let (target, sql) = match (class, value) {
            (Some(PgType::StringMapped), Value::String(s)) => {
                (types::OTHER, SqlValue::Text(Cow::Borrowed(s.as_str())))
            }
            (Some(PgType::UnconstrainedNumeric), Value::String(s)) => {
                (types::NUMERIC, SqlValue::Text(Cow::Borrowed(s.as_str())))
            }
            (Some(PgType::UnconstrainedNumeric), Value::Decimal(d)) => {
                (types::NUMERIC, SqlValue::Decimal(*d))
            }
            (Some(PgType::TimestampTz), Value::String(s)) => (
                types::TIMESTAMP_WITH_TIMEZONE,
                SqlValue::DateTimeOffset(offset_from_text(s, column)?),
            ),
            (Some(PgType::TimestampTz), Value::Timestamp(ts)) => (
                types::TIMESTAMP_WITH_TIMEZONE,
                SqlValue::DateTimeOffset(ts.fixed_offset()),
            ),
            _ => return write_default(stmt, index, value, field, column),
        };
        check_variant(value, field, column)?;
        stmt.bind_as(index, sql, target)
            .map_err(|e| bind_error(column, e))
    }
}
