//! Read path: cursor values to canonical values.
//!
//! A read is two steps: fetch the column with an [`Accessor`], then convert
//! the driver value into the field's canonical variant. Dialect overrides
//! usually change only the accessor and reuse [`to_canonical`].

use std::str::FromStr;

use chrono::{
    DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, SubsecRound, Utc,
};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::core::column::ColumnDescriptor;
use crate::core::schema::{Field, FieldType, LogicalType, Schema};
use crate::core::traits::{Accessor, ResultCursor};
use crate::core::types;
use crate::core::value::{SqlValue, Value};
use crate::error::{MarshalError, Result};

/// Largest scale a canonical decimal can carry.
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// One column read: cursor position to schema position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadStep {
    pub column_index: usize,
    pub field_index: usize,
    pub column: ColumnDescriptor,
}

/// Order in which a row's columns are fetched.
///
/// Sequential-stream columns come first (ascending), then everything else
/// (ascending). Columns with no matching field are not read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadPlan {
    steps: Vec<ReadStep>,
}

impl ReadPlan {
    /// Plan reads of `columns` into `schema`; `is_stream` flags stream columns.
    pub fn new(
        columns: &[ColumnDescriptor],
        schema: &Schema,
        is_stream: impl Fn(&ColumnDescriptor) -> bool,
    ) -> Self {
        let mut streams = Vec::new();
        let mut rest = Vec::new();
        for (column_index, column) in columns.iter().enumerate() {
            let Some(field_index) = schema.index_of(&column.name) else {
                continue;
            };
            let step = ReadStep {
                column_index,
                field_index,
                column: column.clone(),
            };
            if is_stream(column) {
                streams.push(step);
            } else {
                rest.push(step);
            }
        }
        streams.extend(rest);
        Self { steps: streams }
    }

    pub fn steps(&self) -> &[ReadStep] {
        &self.steps
    }

    /// Cursor positions in fetch order.
    pub fn column_order(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.column_index).collect()
    }
}

/// Fetch one value, mapping driver failures to DataRead errors.
pub fn fetch<'c>(
    cursor: &'c mut dyn ResultCursor,
    index: usize,
    column: &ColumnDescriptor,
    accessor: Accessor,
) -> Result<SqlValue<'c>> {
    cursor
        .get(index, accessor)
        .map_err(|e| MarshalError::data_read(&column.name, e.to_string()))
}

/// Accessor the standard read path uses for a field.
pub fn default_accessor(column: &ColumnDescriptor, field: &Field) -> Accessor {
    match field.logical_type {
        Some(LogicalType::Decimal { scale, .. }) => Accessor::Decimal { scale },
        Some(LogicalType::Date) => Accessor::Date,
        Some(LogicalType::TimeMicros) => Accessor::Time,
        Some(LogicalType::TimestampMicros) if column.sql_type == types::TIMESTAMP_WITH_TIMEZONE => {
            Accessor::TimestampTz
        }
        Some(LogicalType::TimestampMicros) | Some(LogicalType::Datetime) => Accessor::Timestamp,
        None => match field.field_type {
            FieldType::Null => Accessor::Object,
            FieldType::Boolean => Accessor::Boolean,
            FieldType::Int => Accessor::Int,
            FieldType::Long => Accessor::Long,
            FieldType::Float => Accessor::Float,
            FieldType::Double => Accessor::Double,
            FieldType::Bytes => Accessor::Bytes,
            FieldType::String if column.sql_type == types::TIMESTAMP_WITH_TIMEZONE => {
                Accessor::TimestampTz
            }
            FieldType::String => Accessor::String,
        },
    }
}

/// Standard read of one column.
pub fn read_default(
    cursor: &mut dyn ResultCursor,
    index: usize,
    column: &ColumnDescriptor,
    field: &Field,
) -> Result<Value> {
    if field.field_type == FieldType::Null && field.logical_type.is_none() {
        return Ok(Value::Null);
    }
    let accessor = default_accessor(column, field);
    let value = fetch(cursor, index, column, accessor)?;
    to_canonical(value, column, field)
}

/// Convert a driver value into the canonical variant of `field`.
pub fn to_canonical(value: SqlValue<'_>, column: &ColumnDescriptor, field: &Field) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    if let Some((precision, scale)) = field.decimal_spec() {
        return read_decimal(value, column, precision, scale).map(Value::Decimal);
    }
    let kind = value.kind();
    let converted = match field.logical_type {
        Some(LogicalType::Date) => to_date(&value).map(Value::Date),
        Some(LogicalType::TimeMicros) => to_time(&value).map(Value::Time),
        Some(LogicalType::TimestampMicros) => to_timestamp(&value).map(Value::Timestamp),
        Some(LogicalType::Datetime) => to_datetime(&value).map(Value::DateTime),
        Some(LogicalType::Decimal { .. }) => None,
        None => match field.field_type {
            FieldType::Null => Some(Value::Null),
            FieldType::Boolean => to_bool(&value).map(Value::Boolean),
            FieldType::Int => to_i64(&value)
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::Int),
            FieldType::Long => to_i64(&value).map(Value::Long),
            FieldType::Float => to_f64(&value).map(|v| Value::Float(v as f32)),
            FieldType::Double => to_f64(&value).map(Value::Double),
            FieldType::Bytes => to_bytes(value).map(Value::Bytes),
            FieldType::String => to_text(value).map(Value::String),
        },
    };
    converted.ok_or_else(|| {
        MarshalError::data_read(
            &column.name,
            format!("{} value cannot be read as {}", kind, field.type_name()),
        )
    })
}

/// Read a fixed-point value into DECIMAL(precision, scale).
pub fn read_decimal(
    value: SqlValue<'_>,
    column: &ColumnDescriptor,
    precision: u32,
    scale: u32,
) -> Result<Decimal> {
    let kind = value.kind();
    let decimal = to_decimal(&value).ok_or_else(|| {
        MarshalError::data_read(
            &column.name,
            format!("{} value cannot be read as decimal({},{})", kind, precision, scale),
        )
    })?;
    fit_decimal(decimal, precision, scale).map_err(|msg| MarshalError::data_read(&column.name, msg))
}

/// Check a decimal against DECIMAL(precision, scale) and rescale it.
///
/// Digits beyond `scale` must be zero; the rescaled value must fit `precision`.
pub fn fit_decimal(value: Decimal, precision: u32, scale: u32) -> std::result::Result<Decimal, String> {
    if scale > MAX_DECIMAL_SCALE {
        return Err(format!(
            "scale {} exceeds the {} digits a decimal value can carry",
            scale, MAX_DECIMAL_SCALE
        ));
    }
    let mut d = value;
    if d.scale() > scale {
        let rounded = d.round_dp(scale);
        if rounded != d {
            return Err(format!(
                "{} has non-zero digits beyond scale {}",
                value, scale
            ));
        }
        d = rounded;
    }
    d.rescale(scale);
    if d.scale() != scale {
        return Err(format!("{} cannot be represented at scale {}", value, scale));
    }
    let digits = d.mantissa().unsigned_abs().to_string().len() as u32;
    if digits > precision {
        return Err(format!(
            "{} needs {} digits, exceeds precision {}",
            value, digits, precision
        ));
    }
    Ok(d)
}

fn to_bool(value: &SqlValue<'_>) -> Option<bool> {
    match value {
        SqlValue::Bool(b) => Some(*b),
        SqlValue::I16(v) => Some(*v != 0),
        SqlValue::I32(v) => Some(*v != 0),
        SqlValue::I64(v) => Some(*v != 0),
        SqlValue::Decimal(d) => Some(!d.is_zero()),
        SqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "y" => Some(true),
            "false" | "f" | "0" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_i64(value: &SqlValue<'_>) -> Option<i64> {
    match value {
        SqlValue::Bool(b) => Some(i64::from(*b)),
        SqlValue::I16(v) => Some(i64::from(*v)),
        SqlValue::I32(v) => Some(i64::from(*v)),
        SqlValue::I64(v) => Some(*v),
        SqlValue::Decimal(d) if d.fract().is_zero() => d.to_i64(),
        SqlValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_f64(value: &SqlValue<'_>) -> Option<f64> {
    match value {
        SqlValue::F32(v) => Some(f64::from(*v)),
        SqlValue::F64(v) => Some(*v),
        SqlValue::I16(v) => Some(f64::from(*v)),
        SqlValue::I32(v) => Some(f64::from(*v)),
        SqlValue::I64(v) => Some(*v as f64),
        SqlValue::Decimal(d) => d.to_f64(),
        SqlValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_decimal(value: &SqlValue<'_>) -> Option<Decimal> {
    match value {
        SqlValue::Decimal(d) => Some(*d),
        SqlValue::I16(v) => Some(Decimal::from(*v)),
        SqlValue::I32(v) => Some(Decimal::from(*v)),
        SqlValue::I64(v) => Some(Decimal::from(*v)),
        SqlValue::F32(v) => Decimal::from_f32(*v),
        SqlValue::F64(v) => Decimal::from_f64(*v),
        SqlValue::Text(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    }
}

fn to_bytes(value: SqlValue<'_>) -> Option<Vec<u8>> {
    match value {
        SqlValue::Bytes(b) => Some(b.into_owned()),
        SqlValue::Text(s) => Some(s.into_owned().into_bytes()),
        SqlValue::Uuid(u) => Some(u.as_bytes().to_vec()),
        _ => None,
    }
}

fn to_text(value: SqlValue<'_>) -> Option<String> {
    let text = match value {
        SqlValue::Text(s) => s.into_owned(),
        SqlValue::Bytes(b) => String::from_utf8(b.into_owned()).ok()?,
        SqlValue::Bool(b) => b.to_string(),
        SqlValue::I16(v) => v.to_string(),
        SqlValue::I32(v) => v.to_string(),
        SqlValue::I64(v) => v.to_string(),
        SqlValue::F32(v) => v.to_string(),
        SqlValue::F64(v) => v.to_string(),
        SqlValue::Decimal(d) => d.to_string(),
        SqlValue::Uuid(u) => u.hyphenated().to_string(),
        SqlValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        SqlValue::Time(t) => t.trunc_subsecs(6).format("%H:%M:%S%.f").to_string(),
        SqlValue::DateTime(dt) => format_local_datetime(&dt),
        SqlValue::DateTimeOffset(dt) => dt.trunc_subsecs(6).to_rfc3339_opts(SecondsFormat::AutoSi, false),
        SqlValue::Null => return None,
    };
    Some(text)
}

/// ISO-8601 local date-time text, microsecond precision at most.
pub fn format_local_datetime(dt: &NaiveDateTime) -> String {
    dt.trunc_subsecs(6).format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn to_date(value: &SqlValue<'_>) -> Option<NaiveDate> {
    match value {
        SqlValue::Date(d) => Some(*d),
        SqlValue::DateTime(dt) => Some(dt.date()),
        SqlValue::DateTimeOffset(dt) => Some(dt.date_naive()),
        SqlValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        _ => None,
    }
}

fn to_time(value: &SqlValue<'_>) -> Option<NaiveTime> {
    let time = match value {
        SqlValue::Time(t) => *t,
        SqlValue::DateTime(dt) => dt.time(),
        SqlValue::DateTimeOffset(dt) => dt.time(),
        SqlValue::Text(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M:%S%.f").ok()?,
        _ => return None,
    };
    Some(time.trunc_subsecs(6))
}

fn to_timestamp(value: &SqlValue<'_>) -> Option<DateTime<Utc>> {
    let ts = match value {
        SqlValue::DateTime(dt) => dt.and_utc(),
        SqlValue::DateTimeOffset(dt) => dt.with_timezone(&Utc),
        SqlValue::Date(d) => d.and_hms_opt(0, 0, 0)?.and_utc(),
        SqlValue::Text(s) => {
            let s = s.trim();
            match parse_offset_datetime(s) {
                Some(dt) => dt.with_timezone(&Utc),
                None => parse_local_datetime(s)?.and_utc(),
            }
        }
        _ => return None,
    };
    Some(ts.trunc_subsecs(6))
}

fn to_datetime(value: &SqlValue<'_>) -> Option<NaiveDateTime> {
    let dt = match value {
        SqlValue::DateTime(dt) => *dt,
        SqlValue::DateTimeOffset(dt) => dt.naive_local(),
        SqlValue::Date(d) => d.and_hms_opt(0, 0, 0)?,
        SqlValue::Text(s) => parse_local_datetime(s.trim())?,
        _ => return None,
    };
    Some(dt.trunc_subsecs(6))
}

/// Parse RFC 3339 or `YYYY-MM-DD HH:MM:SS[.f] ±hh:mm` text.
pub fn parse_offset_datetime(s: &str) -> Option<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f %:z"))
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f %z"))
        .ok()
}

/// Parse ISO-8601 local date-time text (`T` or space separated).
pub fn parse_local_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
