//! Write path: canonical values to statement parameters.

use std::borrow::Cow;

use chrono::SubsecRound;

use crate::core::column::ColumnType;
use crate::core::schema::Field;
use crate::core::traits::BoundStatement;
use crate::core::types;
use crate::core::value::{SqlValue, Value};
use crate::dialect::read::{fit_decimal, parse_offset_datetime};
use crate::error::{DriverError, MarshalError, Result};

/// DataWrite error for a driver failure on a column.
pub fn bind_error(column: &ColumnType, err: DriverError) -> MarshalError {
    MarshalError::data_write(&column.column_name, err.to_string())
}

/// Reject a value whose variant contradicts its field.
pub fn check_variant(value: &Value, field: &Field, column: &ColumnType) -> Result<()> {
    if value.matches_field(field) {
        return Ok(());
    }
    Err(MarshalError::data_write(
        &column.column_name,
        format!(
            "{} value does not fit field '{}' of type {}",
            value.kind(),
            field.name,
            field.type_name()
        ),
    ))
}

/// Rescale a decimal to the column's declared scale, when it has one.
pub fn decimal_for_column(value: rust_decimal::Decimal, column: &ColumnType) -> Result<rust_decimal::Decimal> {
    if !types::is_fixed_point(column.sql_type) || column.precision <= 0 || column.scale < 0 {
        return Ok(value);
    }
    fit_decimal(value, column.precision as u32, column.scale as u32)
        .map_err(|msg| MarshalError::data_write(&column.column_name, msg))
}

/// Driver value for a canonical value under the standard rules.
pub fn default_sql_value<'v>(value: &'v Value, column: &ColumnType) -> Result<SqlValue<'v>> {
    let sql = match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Bool(*b),
        Value::Int(v) => SqlValue::I32(*v),
        Value::Long(v) => SqlValue::I64(*v),
        Value::Float(v) => SqlValue::F32(*v),
        Value::Double(v) => SqlValue::F64(*v),
        Value::Bytes(b) => SqlValue::Bytes(Cow::Borrowed(b)),
        Value::String(s) if column.sql_type == types::TIMESTAMP_WITH_TIMEZONE => {
            SqlValue::DateTimeOffset(offset_from_text(s, column)?)
        }
        Value::String(s) => SqlValue::Text(Cow::Borrowed(s)),
        Value::Date(d) => SqlValue::Date(*d),
        Value::Time(t) => SqlValue::Time(t.trunc_subsecs(6)),
        Value::Timestamp(ts) if column.sql_type == types::TIMESTAMP_WITH_TIMEZONE => {
            SqlValue::DateTimeOffset(ts.fixed_offset())
        }
        Value::Timestamp(ts) => SqlValue::DateTime(ts.naive_utc()),
        Value::DateTime(dt) => SqlValue::DateTime(*dt),
        Value::Decimal(d) => SqlValue::Decimal(decimal_for_column(*d, column)?),
    };
    Ok(sql)
}

/// Parse offset timestamp text, or fail with a DataWrite error.
pub fn offset_from_text(
    text: &str,
    column: &ColumnType,
) -> Result<chrono::DateTime<chrono::FixedOffset>> {
    parse_offset_datetime(text.trim()).ok_or_else(|| {
        MarshalError::data_write(
            &column.column_name,
            format!("'{}' is not a timestamp with offset", text),
        )
    })
}

/// Standard write of one value. NULL binds as a typed NULL of the column.
pub fn write_default(
    stmt: &mut dyn BoundStatement,
    index: usize,
    value: &Value,
    field: &Field,
    column: &ColumnType,
) -> Result<()> {
    check_variant(value, field, column)?;
    if value.is_null() {
        return stmt
            .bind_null(index, column.sql_type)
            .map_err(|e| bind_error(column, e));
    }
    let sql = default_sql_value(value, column)?;
    stmt.bind(index, sql).map_err(|e| bind_error(column, e))
}
