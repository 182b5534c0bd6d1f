//! Canonical records.

use std::sync::Arc;

use crate::core::schema::Schema;
use crate::core::value::Value;
use crate::error::{MarshalError, Result};

/// One row in canonical form.
///
/// Values are positional and line up with the schema's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Record {
    /// Start building a record for a schema.
    pub fn builder(schema: Arc<Schema>) -> RecordBuilder {
        RecordBuilder::new(schema)
    }

    /// Build a record from positional values, checking each against its field.
    pub fn from_values(schema: Arc<Schema>, values: Vec<Value>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(MarshalError::InvalidSchema(format!(
                "record has {} values, schema has {} fields",
                values.len(),
                schema.len()
            )));
        }
        let mut builder = RecordBuilder::new(schema);
        for (i, value) in values.into_iter().enumerate() {
            builder.set_at(i, value)?;
        }
        builder.build()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value by field name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).map(|i| &self.values[i])
    }
}

/// Collects values for one record; positions may be filled in any order.
#[derive(Debug)]
pub struct RecordBuilder {
    schema: Arc<Schema>,
    values: Vec<Option<Value>>,
}

impl RecordBuilder {
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = vec![None; schema.len()];
        Self { schema, values }
    }

    /// Set a value by position.
    pub fn set_at(&mut self, index: usize, value: Value) -> Result<&mut Self> {
        let field = self.schema.fields().get(index).ok_or_else(|| {
            MarshalError::InvalidSchema(format!("field index {} out of range", index))
        })?;
        if !value.matches_field(field) {
            return Err(MarshalError::data_read(
                &field.name,
                format!(
                    "{} value does not fit field of type {}",
                    value.kind(),
                    field.type_name()
                ),
            ));
        }
        self.values[index] = Some(value);
        Ok(self)
    }

    /// Set a value by field name.
    pub fn set(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| MarshalError::InvalidSchema(format!("unknown field '{}'", name)))?;
        self.set_at(index, value)
    }

    /// Finish the record. Unset fields become NULL.
    pub fn build(self) -> Result<Record> {
        let mut values = Vec::with_capacity(self.values.len());
        for (field, value) in self.schema.fields().iter().zip(self.values) {
            let value = value.unwrap_or(Value::Null);
            if value.is_null() && !field.nullable {
                return Err(MarshalError::data_read(
                    &field.name,
                    "null value in non-nullable field",
                ));
            }
            values.push(value);
        }
        Ok(Record {
            schema: self.schema,
            values,
        })
    }
}
