//! Source side: result cursor to records.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{Config, ConnectionConfig, SourceConfig};
use crate::core::record::Record;
use crate::core::registry;
use crate::core::schema::Schema;
use crate::core::traits::{ResultCursor, SqlSession};
use crate::dialect::{Dialect, ReadPlan, RecordMarshaller, SchemaReader};
use crate::error::{MarshalError, Result};

use super::session::run_init_queries;

/// Reads one query result through a dialect.
pub struct SourceTask {
    dialect: Arc<dyn Dialect>,
    config: SourceConfig,
    connection: String,
}

impl SourceTask {
    pub fn new(dialect: Arc<dyn Dialect>, config: SourceConfig, connection: &ConnectionConfig) -> Self {
        Self {
            dialect,
            config,
            connection: connection.redacted(),
        }
    }

    /// Build a task for the configured dialect and `source` section.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = config
            .source
            .clone()
            .ok_or_else(|| MarshalError::Config("source section is required".into()))?;
        let dialect = registry::builtin(config.connection.dialect, source.reader_options());
        Ok(Self::new(dialect, source, &config.connection))
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    /// Run the configured init queries on a new session.
    pub async fn init<S: SqlSession + ?Sized>(&self, session: &mut S) -> Result<()> {
        run_init_queries(session, &self.config.init_queries, &self.connection).await
    }

    /// Random sample query for the configured table, when sampling is set up.
    pub fn sample_query(&self) -> Result<Option<String>> {
        match (self.config.table_ref(), self.config.sample_size) {
            (Some(table), Some(limit)) => self.dialect.random_sample_query(&table, limit).map(Some),
            _ => Ok(None),
        }
    }

    /// Infer the schema of `cursor` and stream its rows as records.
    pub fn stream<C: ResultCursor>(&self, cursor: C) -> Result<RecordStream<C>> {
        RecordStream::open(self.dialect.clone(), cursor, self.connection.clone())
    }
}

/// Iterator of records over a result cursor.
///
/// The schema is inferred and the read plan computed once, up front. The
/// stream ends after the first error.
pub struct RecordStream<C> {
    dialect: Arc<dyn Dialect>,
    cursor: C,
    schema: Arc<Schema>,
    plan: ReadPlan,
    connection: String,
    rows: u64,
    done: bool,
}

impl<C: ResultCursor> RecordStream<C> {
    pub fn open(dialect: Arc<dyn Dialect>, cursor: C, connection: String) -> Result<Self> {
        let schema = Arc::new(dialect.infer_schema(cursor.columns())?);
        let plan = dialect.read_plan(cursor.columns(), &schema);
        info!(
            "{}: reading {} of {} columns",
            dialect.name(),
            plan.steps().len(),
            cursor.columns().len()
        );
        Ok(Self {
            dialect,
            cursor,
            schema,
            plan,
            connection,
            rows: 0,
            done: false,
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Rows produced so far.
    pub fn rows_read(&self) -> u64 {
        self.rows
    }

    fn read_next(&mut self) -> Result<Option<Record>> {
        let more = self
            .cursor
            .advance()
            .map_err(|e| MarshalError::connectivity(&self.connection, e.to_string()))?;
        if !more {
            return Ok(None);
        }
        let record = self
            .dialect
            .read_planned(&mut self.cursor, &self.plan, &self.schema)?;
        Ok(Some(record))
    }
}

impl<C: ResultCursor> Iterator for RecordStream<C> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_next() {
            Ok(Some(record)) => {
                self.rows += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.done = true;
                debug!("{} rows read", self.rows);
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
