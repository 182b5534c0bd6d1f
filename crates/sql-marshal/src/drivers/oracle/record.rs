//! Oracle value conversions.

use std::borrow::Cow;

use crate::core::column::{ColumnDescriptor, ColumnType};
use crate::core::schema::Field;
use crate::core::traits::{Accessor, BoundStatement, ResultCursor};
use crate::core::types;
use crate::core::value::{SqlValue, Value};
use crate::dialect::read::{fetch, read_default, to_canonical};
use crate::dialect::write::{bind_error, check_variant, offset_from_text, write_default};
use crate::dialect::RecordMarshaller;
use crate::error::{MarshalError, Result};

use super::schema::{is_long, is_long_raw};
use super::{OracleDialect, BFILE, INTERVALDS, INTERVALYM, TIMESTAMPLTZ, TIMESTAMPTZ};

impl RecordMarshaller for OracleDialect {
    fn is_stream_column(&self, column: &ColumnDescriptor) -> bool {
        is_long(&column.type_name) || is_long_raw(&column.type_name)
    }

    fn read_value(
        &self,
        cursor: &mut dyn ResultCursor,
        index: usize,
        column: &ColumnDescriptor,
        field: &Field,
    ) -> Result<Value> {
        let accessor = match column.sql_type {
            TIMESTAMPTZ | TIMESTAMPLTZ => Accessor::TimestampTz,
            INTERVALYM | INTERVALDS => Accessor::String,
            _ => return read_default(cursor, index, column, field),
        };
        let value = fetch(cursor, index, column, accessor)?;
        to_canonical(value, column, field)
    }

    fn write_value(
        &self,
        stmt: &mut dyn BoundStatement,
        index: usize,
        value: &Value,
        field: &Field,
        column: &ColumnType,
    ) -> Result<()> {
        let code = column.sql_type;
        if code == BFILE {
            return Err(MarshalError::data_write(
                &column.column_name,
                "BFILE columns are read-only",
            ));
        }
        let sql = match (code, value) {
            (TIMESTAMPTZ | TIMESTAMPLTZ, Value::String(s)) => {
                SqlValue::DateTimeOffset(offset_from_text(s, column)?)
            }
            (TIMESTAMPTZ | TIMESTAMPLTZ, Value::Timestamp(ts)) => {
                SqlValue::DateTimeOffset(ts.fixed_offset())
            }
            (INTERVALYM | INTERVALDS, Value::String(s)) => SqlValue::Text(Cow::Borrowed(s.as_str())),
            (types::NUMERIC | types::DECIMAL, Value::Boolean(b)) => SqlValue::I32(i32::from(*b)),
            _ => return write_default(stmt, index, value, field, column),
        };
        check_variant(value, field, column)?;
        stmt.bind_as(index, sql, code)
            .map_err(|e| bind_error(column, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::FieldType;

    #[test]
    fn test_stream_columns() {
        let d = OracleDialect::default();
        assert!(d.is_stream_column(&ColumnDescriptor::new("l", types::LONGVARCHAR, "LONG")));
        assert!(d.is_stream_column(&ColumnDescriptor::new("r", types::LONGVARBINARY, "LONG RAW")));
        assert!(!d.is_stream_column(&ColumnDescriptor::new("c", types::CLOB, "CLOB")));
    }

    #[test]
    fn test_bfile_is_read_only() {
        struct Unused;
        impl BoundStatement for Unused {
            fn bind(&mut self, _: usize, _: SqlValue<'_>) -> crate::error::DriverResult<()> {
                panic!("nothing should be bound")
            }
            fn bind_null(&mut self, _: usize, _: i32) -> crate::error::DriverResult<()> {
                panic!("nothing should be bound")
            }
        }
        let column = ColumnType {
            field_name: "doc".into(),
            column_name: "DOC".into(),
            type_name: "BFILE".into(),
            sql_type: BFILE,
            precision: 0,
            scale: 0,
        };
        let field = Field::new("doc", FieldType::Bytes);
        let err = OracleDialect::default()
            .write_value(&mut Unused, 0, &Value::Bytes(vec![1, 2]), &field, &column)
            .unwrap_err();
        assert!(err.to_string().contains("read-only"));
    }
}
