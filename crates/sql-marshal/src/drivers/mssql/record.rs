//! MSSQL value conversions.

use std::borrow::Cow;

use chrono::{SecondsFormat, SubsecRound, Timelike};

use crate::core::column::{ColumnDescriptor, ColumnType};
use crate::core::schema::{Field, FieldType};
use crate::core::traits::{Accessor, BoundStatement, ResultCursor};
use crate::core::types;
use crate::core::value::{SqlValue, Value};
use crate::dialect::read::{fetch, parse_offset_datetime, read_default, to_canonical};
use crate::dialect::write::{bind_error, check_variant, offset_from_text, write_default};
use crate::dialect::RecordMarshaller;
use crate::error::Result;

use super::schema::{classify, MssqlType};
use super::{MssqlDialect, DATETIMEOFFSET};

/// `HH:MM:SS.fffffff`, the literal form `time(7)` accepts.
fn time_literal(t: &chrono::NaiveTime) -> String {
    format!("{}.{:07}", t.format("%H:%M:%S"), t.nanosecond() % 1_000_000_000 / 100)
}

impl RecordMarshaller for MssqlDialect {
    fn read_value(
        &self,
        cursor: &mut dyn ResultCursor,
        index: usize,
        column: &ColumnDescriptor,
        field: &Field,
    ) -> Result<Value> {
        match classify(column.sql_type, &column.type_name) {
            Some(MssqlType::Time) => {
                let value = fetch(cursor, index, column, Accessor::Timestamp)?;
                to_canonical(value, column, field)
            }
            Some(MssqlType::DateTimeOffset) => {
                match fetch(cursor, index, column, Accessor::TimestampTz)? {
                    SqlValue::Text(s) if field.field_type == FieldType::String && field.logical_type.is_none() => {
                        let text = match parse_offset_datetime(s.trim()) {
                            Some(dt) => dt.trunc_subsecs(6).to_rfc3339_opts(SecondsFormat::AutoSi, false),
                            None => s.into_owned(),
                        };
                        Ok(Value::String(text))
                    }
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
        let class = classify(column.sql_type, &column.type_name);
        let bound = match (class, value) {
            (Some(MssqlType::Spatial), Value::Null) => {
                check_variant(value, field, column)?;
                stmt.bind(index, SqlValue::Text(Cow::Borrowed("NULL")))
            }
            (Some(MssqlType::Spatial), Value::String(wkt)) => {
                check_variant(value, field, column)?;
                stmt.bind(index, SqlValue::Text(Cow::Borrowed(wkt.as_str())))
            }
            (Some(MssqlType::Time), Value::Time(t)) => {
                check_variant(value, field, column)?;
                stmt.bind_as(index, SqlValue::Text(Cow::Owned(time_literal(t))), types::VARCHAR)
            }
            (Some(MssqlType::DateTimeOffset), Value::String(s)) => {
                check_variant(value, field, column)?;
                let dt = offset_from_text(s, column)?;
                stmt.bind_as(index, SqlValue::DateTimeOffset(dt), DATETIMEOFFSET)
            }
            (Some(MssqlType::DateTimeOffset), Value::Timestamp(ts)) => {
                check_variant(value, field, column)?;
                stmt.bind_as(index, SqlValue::DateTimeOffset(ts.fixed_offset()), DATETIMEOFFSET)
            }
            _ => return write_default(stmt, index, value, field, column),
        };
        bound.map_err(|e| bind_error(column, e))
    }
}
