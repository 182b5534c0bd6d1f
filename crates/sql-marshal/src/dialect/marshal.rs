//! Record marshaller: rows in, rows out.

use std::sync::Arc;

use tracing::debug;

use crate::core::column::{ColumnDescriptor, ColumnType, ColumnTypeBinding};
use crate::core::record::{Record, RecordBuilder};
use crate::core::schema::{Field, Schema};
use crate::core::traits::{BoundStatement, ResultCursor};
use crate::core::value::Value;
use crate::dialect::read::{read_default, ReadPlan};
use crate::dialect::write::write_default;
use crate::error::{MarshalError, Result};

/// Converts cursor rows to records and records to bound parameters.
///
/// Implementations hold configuration only and may be shared across tasks.
pub trait RecordMarshaller: Send + Sync {
    /// Sequential-stream columns must be read before any other column.
    fn is_stream_column(&self, column: &ColumnDescriptor) -> bool {
        let _ = column;
        false
    }

    /// Read one column of the current row.
    fn read_value(
        &self,
        cursor: &mut dyn ResultCursor,
        index: usize,
        column: &ColumnDescriptor,
        field: &Field,
    ) -> Result<Value> {
        read_default(cursor, index, column, field)
    }

    /// Plan the fetch order for a result.
    fn read_plan(&self, columns: &[ColumnDescriptor], schema: &Schema) -> ReadPlan {
        let plan = ReadPlan::new(columns, schema, |c| self.is_stream_column(c));
        debug!("Read plan column order: {:?}", plan.column_order());
        plan
    }

    /// Read the current row using a precomputed plan.
    fn read_planned(
        &self,
        cursor: &mut dyn ResultCursor,
        plan: &ReadPlan,
        schema: &Arc<Schema>,
    ) -> Result<Record> {
        let mut builder = RecordBuilder::new(schema.clone());
        for step in plan.steps() {
            let field = &schema.fields()[step.field_index];
            let value = self.read_value(cursor, step.column_index, &step.column, field)?;
            if value.is_null() && !field.nullable {
                return Err(MarshalError::data_read(
                    &step.column.name,
                    "null value in non-nullable field",
                ));
            }
            builder.set_at(step.field_index, value)?;
        }
        builder.build()
    }

    /// Read the current row of `cursor` into a record of `schema`.
    fn read_row(&self, cursor: &mut dyn ResultCursor, schema: &Arc<Schema>) -> Result<Record> {
        let plan = ReadPlan::new(cursor.columns(), schema, |c| self.is_stream_column(c));
        self.read_planned(cursor, &plan, schema)
    }

    /// Bind one value.
    fn write_value(
        &self,
        stmt: &mut dyn BoundStatement,
        index: usize,
        value: &Value,
        field: &Field,
        column: &ColumnType,
    ) -> Result<()> {
        write_default(stmt, index, value, field, column)
    }

    /// Bind every position of `binding` from `record`.
    fn write_row(
        &self,
        stmt: &mut dyn BoundStatement,
        record: &Record,
        binding: &ColumnTypeBinding,
    ) -> Result<()> {
        let schema = record.schema();
        for (position, column) in binding.columns().iter().enumerate() {
            let index = schema.index_of(&column.field_name).ok_or_else(|| {
                MarshalError::data_write(
                    &column.column_name,
                    format!("record has no field '{}'", column.field_name),
                )
            })?;
            let field = &schema.fields()[index];
            let value = &record.values()[index];
            self.write_value(stmt, position, value, field, column)?;
        }
        Ok(())
    }
}
