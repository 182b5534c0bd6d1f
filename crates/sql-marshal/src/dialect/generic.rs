//! Generic dialect: standard mappings only.

use crate::config::ConnectionConfig;
use crate::core::column::TableRef;
use crate::dialect::{
    Dialect, DialectKind, FieldsValidator, ReaderOptions, RecordMarshaller, SchemaReader,
};
use crate::error::{MarshalError, Result};

/// Dialect for databases without vendor overrides.
#[derive(Debug, Clone, Default)]
pub struct GenericDialect {
    options: ReaderOptions,
}

impl GenericDialect {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }
}

impl SchemaReader for GenericDialect {
    fn reader_options(&self) -> &ReaderOptions {
        &self.options
    }
}

impl RecordMarshaller for GenericDialect {}

impl FieldsValidator for GenericDialect {}

impl Dialect for GenericDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Generic
    }

    fn connection_string(&self, conn: &ConnectionConfig) -> Result<String> {
        conn.url.clone().ok_or_else(|| {
            MarshalError::Config("connection.url is required for the generic dialect".into())
        })
    }

    fn random_sample_query(&self, table: &TableRef, limit: u64) -> Result<String> {
        Ok(format!(
            "SELECT * FROM {} FETCH FIRST {} ROWS ONLY",
            self.qualify_table(table)?,
            limit
        ))
    }
}
