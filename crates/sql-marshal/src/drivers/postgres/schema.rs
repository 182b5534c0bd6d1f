//! PostgreSQL schema mapping and write compatibility.

use crate::core::column::ColumnDescriptor;
use crate::core::schema::{Field, FieldType, LogicalType};
use crate::core::types;
use crate::dialect::reader::{decimal_field, default_field};
use crate::dialect::validate::default_compatible;
use crate::dialect::{FieldMapping, FieldsValidator, ReaderOptions, SchemaReader};
use crate::error::Result;

use super::PostgresDialect;

/// Declared precision the server reports for a bare `numeric`.
const UNCONSTRAINED_PRECISION: i32 = 1000;

/// PostgreSQL column families that need vendor handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PgType {
    /// Read and written as text; the server casts on insert.
    StringMapped,
    TimestampTz,
    UnconstrainedNumeric,
}

pub(super) fn classify(type_name: &str, sql_type: i32, precision: i32) -> Option<PgType> {
    let name = type_name.to_ascii_lowercase();
    match name.as_str() {
        "bit" | "timetz" | "money" => return Some(PgType::StringMapped),
        "timestamptz" => return Some(PgType::TimestampTz),
        _ => {}
    }
    match sql_type {
        types::OTHER | types::ARRAY | types::SQLXML => Some(PgType::StringMapped),
        types::NUMERIC | types::DECIMAL
            if precision <= 0 || precision > UNCONSTRAINED_PRECISION =>
        {
            Some(PgType::UnconstrainedNumeric)
        }
        _ => None,
    }
}

fn classify_column(column: &ColumnDescriptor) -> Option<PgType> {
    classify(&column.type_name, column.sql_type, column.precision)
}

impl SchemaReader for PostgresDialect {
    fn reader_options(&self) -> &ReaderOptions {
        &self.options
    }

    fn get_field(&self, column: &ColumnDescriptor) -> Result<FieldMapping> {
        let name = column.name.as_str();
        let field = match classify_column(column) {
            Some(PgType::StringMapped) => Field::new(name, FieldType::String),
            Some(PgType::TimestampTz) => self.options.timezone_policy.field(name),
            Some(PgType::UnconstrainedNumeric) => {
                // numeric without a typmod reports 131089 as its precision
                let bare = column.clone().with_precision(0, 0);
                return decimal_field(&bare, &self.options);
            }
            None => return default_field(column, &self.options),
        };
        Ok(FieldMapping::exact(field.with_nullable(column.nullable)))
    }
}

impl FieldsValidator for PostgresDialect {
    fn is_field_compatible(&self, field: &Field, column: &ColumnDescriptor) -> bool {
        let string_field = field.logical_type.is_none() && field.field_type == FieldType::String;
        let vendor = match classify_column(column) {
            Some(PgType::StringMapped) => string_field,
            Some(PgType::UnconstrainedNumeric) => string_field,
            Some(PgType::TimestampTz) => {
                string_field || field.logical_type == Some(LogicalType::TimestampMicros)
            }
            None => false,
        };
        vendor || default_compatible(field, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::TimezonePolicy;

    fn field_for(d: &PostgresDialect, column: ColumnDescriptor) -> FieldMapping {
        d.get_field(&column).unwrap()
    }

    #[test]
    fn test_string_mapped_types() {
        let d = PostgresDialect::default();
        for column in [
            ColumnDescriptor::new("i", types::OTHER, "interval"),
            ColumnDescriptor::new("u", types::OTHER, "uuid"),
            ColumnDescriptor::new("j", types::OTHER, "jsonb"),
            ColumnDescriptor::new("g", types::OTHER, "geometry"),
            ColumnDescriptor::new("a", types::ARRAY, "_int4"),
            ColumnDescriptor::new("x", types::SQLXML, "xml"),
            ColumnDescriptor::new("b", types::BIT, "bit"),
            ColumnDescriptor::new("t", types::TIME, "timetz"),
            ColumnDescriptor::new("m", types::DOUBLE, "money"),
        ] {
            assert_eq!(field_for(&d, column).field.field_type, FieldType::String);
        }
        // bool is reported with the BIT code but keeps its boolean mapping
        let f = field_for(&d, ColumnDescriptor::new("b", types::BIT, "bool")).field;
        assert_eq!(f.field_type, FieldType::Boolean);
    }

    #[test]
    fn test_timestamptz_follows_policy() {
        let col = ColumnDescriptor::new("ts", types::TIMESTAMP, "timestamptz");
        let d = PostgresDialect::default();
        assert_eq!(field_for(&d, col.clone()).field.field_type, FieldType::String);
        let d = PostgresDialect::new(
            ReaderOptions::default().with_timezone_policy(TimezonePolicy::NormalizeUtc),
        );
        assert_eq!(
            field_for(&d, col).field.logical_type,
            Some(LogicalType::TimestampMicros)
        );
    }

    #[test]
    fn test_unconstrained_numeric() {
        let d = PostgresDialect::default();
        let col = ColumnDescriptor::new("n", types::NUMERIC, "numeric").with_precision(131089, 0);
        let mapping = field_for(&d, col);
        assert_eq!(mapping.field.decimal_spec(), Some((38, 0)));
        assert!(mapping.warning.is_some());

        let col = ColumnDescriptor::new("n", types::NUMERIC, "numeric").with_precision(12, 3);
        assert_eq!(field_for(&d, col).field.decimal_spec(), Some((12, 3)));
    }

    #[test]
    fn test_vendor_compatibility() {
        let d = PostgresDialect::default();
        let s = Field::new("f", FieldType::String);
        assert!(d.is_field_compatible(&s, &ColumnDescriptor::new("f", types::OTHER, "uuid")));
        assert!(d.is_field_compatible(
            &s,
            &ColumnDescriptor::new("f", types::NUMERIC, "numeric").with_precision(131089, 0)
        ));
        assert!(!d.is_field_compatible(
            &s,
            &ColumnDescriptor::new("f", types::NUMERIC, "numeric").with_precision(10, 2)
        ));
        let tz = ColumnDescriptor::new("f", types::TIMESTAMP, "timestamptz");
        assert!(d.is_field_compatible(&s, &tz));
        assert!(d.is_field_compatible(&Field::logical("f", LogicalType::TimestampMicros), &tz));
        assert!(!d.is_field_compatible(&Field::new("f", FieldType::Long), &tz));
    }
}
