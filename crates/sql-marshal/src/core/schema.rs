//! Canonical schema model.
//!
//! The portable, dialect-independent description of a record: primitive
//! types, logical refinements, fields, and ordered schemas. Every dialect
//! maps its column metadata into these types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MarshalError, Result};

/// Largest decimal precision the canonical model supports.
pub const MAX_DECIMAL_PRECISION: u32 = 38;

/// Canonical primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Null => "null",
            FieldType::Boolean => "boolean",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Bytes => "bytes",
            FieldType::String => "string",
        };
        f.write_str(name)
    }
}

/// Semantic refinement of a primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    /// Days since the epoch, carried as INT.
    Date,
    /// Microseconds since midnight, carried as LONG.
    TimeMicros,
    /// Microseconds since the epoch (UTC), carried as LONG.
    TimestampMicros,
    /// Local date-time without a zone, carried as STRING.
    Datetime,
    /// Fixed precision/scale decimal, carried as BYTES.
    Decimal { precision: u32, scale: u32 },
}

impl LogicalType {
    /// The primitive type this logical type is carried as.
    pub fn carrier(&self) -> FieldType {
        match self {
            LogicalType::Date => FieldType::Int,
            LogicalType::TimeMicros | LogicalType::TimestampMicros => FieldType::Long,
            LogicalType::Datetime => FieldType::String,
            LogicalType::Decimal { .. } => FieldType::Bytes,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Date => f.write_str("date"),
            LogicalType::TimeMicros => f.write_str("time_micros"),
            LogicalType::TimestampMicros => f.write_str("timestamp_micros"),
            LogicalType::Datetime => f.write_str("datetime"),
            LogicalType::Decimal { precision, scale } => {
                write!(f, "decimal({},{})", precision, scale)
            }
        }
    }
}

/// A single canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name. Matched against column names case-insensitively.
    pub name: String,

    /// Primitive type (the carrier when a logical type is present).
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Optional logical refinement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_type: Option<LogicalType>,

    /// Whether the field accepts nulls.
    #[serde(default)]
    pub nullable: bool,
}

impl Field {
    /// Create a non-nullable primitive field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            logical_type: None,
            nullable: false,
        }
    }

    /// Create a non-nullable field with a logical type.
    pub fn logical(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            field_type: logical_type.carrier(),
            logical_type: Some(logical_type),
            nullable: false,
        }
    }

    /// Create a non-nullable DECIMAL(precision, scale) field.
    pub fn decimal(name: impl Into<String>, precision: u32, scale: u32) -> Self {
        Self::logical(name, LogicalType::Decimal { precision, scale })
    }

    /// Set nullability.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Same field under a different name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Decimal precision and scale, if this is a DECIMAL field.
    pub fn decimal_spec(&self) -> Option<(u32, u32)> {
        match self.logical_type {
            Some(LogicalType::Decimal { precision, scale }) => Some((precision, scale)),
            _ => None,
        }
    }

    /// Human readable type (logical type when present, else primitive).
    pub fn type_name(&self) -> String {
        match &self.logical_type {
            Some(logical) => logical.to_string(),
            None => self.field_type.to_string(),
        }
    }

    /// Check the field's own invariants.
    pub fn check(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(MarshalError::InvalidSchema("field name is empty".into()));
        }
        if let Some(logical) = &self.logical_type {
            if logical.carrier() != self.field_type {
                return Err(MarshalError::InvalidSchema(format!(
                    "field '{}': logical type {} must be carried as {}, not {}",
                    self.name,
                    logical,
                    logical.carrier(),
                    self.field_type
                )));
            }
            if let LogicalType::Decimal { precision, scale } = logical {
                if *precision == 0 || *precision > MAX_DECIMAL_PRECISION || scale > precision {
                    return Err(MarshalError::InvalidSchema(format!(
                        "field '{}': invalid decimal({},{})",
                        self.name, precision, scale
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Ordered sequence of unique-named canonical fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct Schema {
    fields: Vec<Field>,
}

#[derive(Deserialize)]
struct RawSchema {
    fields: Vec<Field>,
}

impl TryFrom<RawSchema> for Schema {
    type Error = MarshalError;

    fn try_from(raw: RawSchema) -> Result<Self> {
        Schema::new(raw.fields)
    }
}

impl Schema {
    /// Build a schema, rejecting invalid fields and duplicate names.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        for (i, field) in fields.iter().enumerate() {
            field.check()?;
            if fields[..i]
                .iter()
                .any(|f| f.name.eq_ignore_ascii_case(&field.name))
            {
                return Err(MarshalError::InvalidSchema(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Parse a schema from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fields in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a field by name (case-insensitive).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Look up a field by name (case-insensitive).
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|i| &self.fields[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_type_fixes_carrier() {
        let f = Field::logical("d", LogicalType::Date);
        assert_eq!(f.field_type, FieldType::Int);
        let f = Field::decimal("amount", 10, 2);
        assert_eq!(f.field_type, FieldType::Bytes);
        assert_eq!(f.decimal_spec(), Some((10, 2)));
        assert_eq!(f.type_name(), "decimal(10,2)");
        assert_eq!(Field::logical("t", LogicalType::Datetime).field_type, FieldType::String);
    }

    #[test]
    fn test_schema_rejects_duplicates_case_insensitively() {
        let err = Schema::new(vec![
            Field::new("Id", FieldType::Int),
            Field::new("ID", FieldType::Long),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_schema_rejects_wrong_carrier() {
        let mut f = Field::logical("d", LogicalType::Date);
        f.field_type = FieldType::String;
        assert!(Schema::new(vec![f]).is_err());
    }

    #[test]
    fn test_schema_rejects_bad_decimal() {
        assert!(Schema::new(vec![Field::decimal("x", 0, 0)]).is_err());
        assert!(Schema::new(vec![Field::decimal("x", 5, 6)]).is_err());
        assert!(Schema::new(vec![Field::decimal("x", 39, 0)]).is_err());
        assert!(Schema::new(vec![Field::decimal("x", 38, 0)]).is_ok());
    }

    #[test]
    fn test_field_lookup_case_insensitive() {
        let schema = Schema::new(vec![
            Field::new("ID", FieldType::Int),
            Field::new("Name", FieldType::String).with_nullable(true),
        ])
        .unwrap();
        assert_eq!(schema.index_of("name"), Some(1));
        assert!(schema.field("id").is_some());
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_schema_json() {
        let json = r#"{
            "fields": [
                {"name": "id", "type": "int"},
                {"name": "price", "type": "bytes", "logical_type": {"decimal": {"precision": 10, "scale": 2}}, "nullable": true},
                {"name": "created", "type": "long", "logical_type": "timestamp_micros"}
            ]
        }"#;
        let schema = Schema::from_json(json).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.fields()[1].decimal_spec(), Some((10, 2)));
        assert!(schema.fields()[1].nullable);
        assert_eq!(
            schema.fields()[2].logical_type,
            Some(LogicalType::TimestampMicros)
        );

        let back = Schema::from_json(&schema.to_json().unwrap()).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn test_schema_json_validates() {
        let json = r#"{"fields": [{"name": "a", "type": "int"}, {"name": "A", "type": "int"}]}"#;
        assert!(Schema::from_json(json).is_err());
    }
}
