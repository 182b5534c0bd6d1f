//! Schema reader: column metadata to canonical fields.
//!
//! [`default_field`] is the dialect-independent mapping table. Dialects
//! override [`SchemaReader::get_field`] for the vendor types they know and
//! fall back to it for everything else.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::column::ColumnDescriptor;
use crate::core::schema::{Field, FieldType, LogicalType, Schema, MAX_DECIMAL_PRECISION};
use crate::core::types::{self, is_binary_type, is_string_type};
use crate::error::{MarshalError, Result};

/// How timezone-bearing timestamp columns are represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimezonePolicy {
    /// STRING holding ISO-8601 text with the original offset.
    #[default]
    PreserveOffset,
    /// TIMESTAMP_MICROS holding the instant in UTC.
    NormalizeUtc,
}

impl TimezonePolicy {
    /// Field for a timezone-bearing column under this policy.
    pub fn field(&self, name: &str) -> Field {
        match self {
            TimezonePolicy::PreserveOffset => Field::new(name, FieldType::String),
            TimezonePolicy::NormalizeUtc => Field::logical(name, LogicalType::TimestampMicros),
        }
    }
}

impl std::str::FromStr for TimezonePolicy {
    type Err = MarshalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "preserve_offset" => Ok(TimezonePolicy::PreserveOffset),
            "normalize_utc" | "utc" => Ok(TimezonePolicy::NormalizeUtc),
            other => Err(MarshalError::Config(format!(
                "Invalid timezone policy '{}'. Valid: preserve_offset, normalize_utc",
                other
            ))),
        }
    }
}

/// Precision/scale pair used for unconstrained numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecimalSpec {
    pub precision: u32,
    pub scale: u32,
}

impl Default for DecimalSpec {
    fn default() -> Self {
        Self {
            precision: MAX_DECIMAL_PRECISION,
            scale: 0,
        }
    }
}

/// Options every schema reader consults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderOptions {
    /// Connector session id; helper columns derived from it are ignored.
    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub timezone_policy: TimezonePolicy,

    /// Pair used instead of DECIMAL(38,0) for unconstrained numerics.
    #[serde(default)]
    pub default_decimal: Option<DecimalSpec>,
}

impl ReaderOptions {
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    #[must_use]
    pub fn with_timezone_policy(mut self, policy: TimezonePolicy) -> Self {
        self.timezone_policy = policy;
        self
    }

    #[must_use]
    pub fn with_default_decimal(mut self, precision: u32, scale: u32) -> Self {
        self.default_decimal = Some(DecimalSpec { precision, scale });
        self
    }
}

/// Result of mapping one column: the field plus an optional advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub field: Field,
    /// Non-fatal warning (e.g. possible precision loss).
    pub warning: Option<String>,
}

impl FieldMapping {
    /// A mapping with no warning.
    pub fn exact(field: Field) -> Self {
        Self {
            field,
            warning: None,
        }
    }

    pub fn with_warning(field: Field, warning: impl Into<String>) -> Self {
        Self {
            field,
            warning: Some(warning.into()),
        }
    }
}

/// Maps column metadata to canonical fields.
///
/// `get_field` must be a pure function of the metadata.
pub trait SchemaReader: Send + Sync {
    /// Options this reader was configured with.
    fn reader_options(&self) -> &ReaderOptions;

    /// Map one column. Defaults to the standard table.
    fn get_field(&self, column: &ColumnDescriptor) -> Result<FieldMapping> {
        default_field(column, self.reader_options())
    }

    /// Check whether a column is connector bookkeeping rather than data.
    fn should_ignore_column(&self, column: &ColumnDescriptor) -> bool {
        is_session_column(&column.name, self.reader_options())
    }

    /// Map every non-ignored column, keeping warnings.
    fn infer_fields(&self, columns: &[ColumnDescriptor]) -> Result<Vec<FieldMapping>> {
        let mut mappings = Vec::with_capacity(columns.len());
        for column in columns {
            if self.should_ignore_column(column) {
                debug!("Ignoring column {}", column.name);
                continue;
            }
            mappings.push(self.get_field(column)?);
        }
        Ok(mappings)
    }

    /// Infer the canonical schema of a result, logging every advisory.
    fn infer_schema(&self, columns: &[ColumnDescriptor]) -> Result<Schema> {
        let mappings = self.infer_fields(columns)?;
        let mut fields = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            if let Some(warning) = &mapping.warning {
                warn!("{}", warning);
            }
            fields.push(mapping.field);
        }
        Schema::new(fields)
    }
}

/// Check for `c_<session_id>` / `sqn_<session_id>` helper columns.
pub fn is_session_column(name: &str, options: &ReaderOptions) -> bool {
    let Some(session_id) = options.session_id.as_deref() else {
        return false;
    };
    if session_id.is_empty() {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    let session_id = session_id.to_ascii_lowercase();
    lower
        .strip_prefix("c_")
        .or_else(|| lower.strip_prefix("sqn_"))
        .is_some_and(|rest| rest == session_id)
}

/// Standard mapping table shared by every dialect.
pub fn default_field(column: &ColumnDescriptor, options: &ReaderOptions) -> Result<FieldMapping> {
    let name = column.name.as_str();
    let field = match column.sql_type {
        types::NULL => return Ok(FieldMapping::exact(Field::new(name, FieldType::Null).with_nullable(true))),
        types::BOOLEAN | types::BIT => Field::new(name, FieldType::Boolean),
        types::TINYINT | types::SMALLINT => Field::new(name, FieldType::Int),
        types::INTEGER if column.signed => Field::new(name, FieldType::Int),
        types::INTEGER => Field::new(name, FieldType::Long),
        types::BIGINT => Field::new(name, FieldType::Long),
        types::REAL | types::FLOAT => Field::new(name, FieldType::Float),
        types::DOUBLE => Field::new(name, FieldType::Double),
        types::NUMERIC | types::DECIMAL => return decimal_field(column, options),
        types::DATE => Field::logical(name, LogicalType::Date),
        types::TIME => Field::logical(name, LogicalType::TimeMicros),
        types::TIMESTAMP => Field::logical(name, LogicalType::TimestampMicros),
        types::TIMESTAMP_WITH_TIMEZONE => options.timezone_policy.field(name),
        types::TIME_WITH_TIMEZONE | types::ROWID => Field::new(name, FieldType::String),
        code if is_string_type(code) => Field::new(name, FieldType::String),
        code if is_binary_type(code) => Field::new(name, FieldType::Bytes),
        _ => return Err(unsupported(column)),
    };
    Ok(FieldMapping::exact(field.with_nullable(column.nullable)))
}

/// SchemaInference error for a column no mapping covers.
pub fn unsupported(column: &ColumnDescriptor) -> MarshalError {
    MarshalError::schema_inference(
        &column.name,
        format!(
            "unsupported column type {} (SQL type code {})",
            column.display_type(),
            column.sql_type
        ),
    )
}

/// Map a NUMERIC/DECIMAL column, applying the unconstrained-precision policy.
pub fn decimal_field(column: &ColumnDescriptor, options: &ReaderOptions) -> Result<FieldMapping> {
    let name = column.name.as_str();
    let (precision, scale) = (column.precision, column.scale);

    if precision <= 0 {
        let spec = options.default_decimal.unwrap_or_default();
        let field = Field::decimal(name, spec.precision, spec.scale).with_nullable(column.nullable);
        let warning = format!(
            "Column '{}' is an unconstrained {}; mapping to decimal({},{}) may lose precision or scale",
            name,
            column.display_type(),
            spec.precision,
            spec.scale
        );
        return Ok(FieldMapping::with_warning(field, warning));
    }

    let precision = precision as u32;
    let (precision, scale) = if scale < 0 {
        // NUMBER(p,-s) stores p significant digits left of s rounded zeros
        ((precision + scale.unsigned_abs()).min(MAX_DECIMAL_PRECISION), 0)
    } else {
        let scale = scale as u32;
        if precision > MAX_DECIMAL_PRECISION {
            return Err(MarshalError::schema_inference(
                name,
                format!(
                    "decimal precision {} exceeds the maximum of {}",
                    precision, MAX_DECIMAL_PRECISION
                ),
            ));
        }
        // NUMBER(2,5) holds 0.00012: widen precision to cover the scale
        (precision.max(scale), scale)
    };

    Ok(FieldMapping::exact(
        Field::decimal(name, precision, scale).with_nullable(column.nullable),
    ))
}
