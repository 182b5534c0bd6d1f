//! Sink side: records to batched, transactional writes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{Config, ConnectionConfig, SinkConfig};
use crate::core::column::{ColumnDescriptor, ColumnTypeBinding};
use crate::core::record::Record;
use crate::core::registry;
use crate::core::schema::{Field, Schema};
use crate::core::traits::{BatchExecutor, MetadataProvider};
use crate::dialect::{Dialect, FieldsValidator, RecordMarshaller};
use crate::error::{MarshalError, Result};

use super::session::run_init_queries;

/// Writes records into one table through a dialect.
pub struct SinkTask {
    dialect: Arc<dyn Dialect>,
    config: SinkConfig,
    connection: String,
}

/// Everything `prepare` resolved: projected schema, binding and statement.
#[derive(Debug, Clone)]
pub struct SinkPlan {
    pub schema: Arc<Schema>,
    pub binding: ColumnTypeBinding,
    /// Parameterised INSERT or upsert, one placeholder per binding position.
    pub statement: String,
}

/// Counters for one sink run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub rows_written: u64,
    pub batches: u64,
    /// Row count reported by the executor across all batches.
    pub rows_affected: u64,
    pub elapsed: Duration,
}

impl SinkTask {
    pub fn new(dialect: Arc<dyn Dialect>, config: SinkConfig, connection: &ConnectionConfig) -> Self {
        Self {
            dialect,
            config,
            connection: connection.redacted(),
        }
    }

    /// Build a task for the configured dialect and `sink` section.
    pub fn from_config(config: &Config) -> Result<Self> {
        let sink = config
            .sink
            .clone()
            .ok_or_else(|| MarshalError::Config("sink section is required".into()))?;
        let dialect = registry::builtin(config.connection.dialect, sink.reader_options());
        Ok(Self::new(dialect, sink, &config.connection))
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    /// Fetch the table's columns, bounded by the introspection timeout.
    pub async fn table_columns(&self, provider: &dyn MetadataProvider) -> Result<Vec<ColumnDescriptor>> {
        let table = self.config.table_ref();
        let timeout = self.config.introspection_timeout();
        match tokio::time::timeout(timeout, provider.table_columns(&table)).await {
            Ok(Ok(columns)) if columns.is_empty() => Err(MarshalError::connectivity(
                &self.connection,
                format!("table {} not found or has no columns", table),
            )),
            Ok(Ok(columns)) => Ok(columns),
            Ok(Err(e)) => Err(MarshalError::connectivity(
                &self.connection,
                format!("failed to read columns of {}: {}", table, e),
            )),
            Err(_) => Err(MarshalError::connectivity(
                &self.connection,
                format!(
                    "reading columns of {} timed out after {}s",
                    table,
                    timeout.as_secs()
                ),
            )),
        }
    }

    /// Fields written by this sink: the configured columns, or every field.
    pub fn select_fields(&self, schema: &Schema) -> Result<Schema> {
        let Some(columns) = &self.config.columns else {
            return Ok(schema.clone());
        };
        let remap = &self.config.field_mapping;
        let mut fields: Vec<Field> = Vec::with_capacity(columns.len());
        for column in columns {
            let field = schema
                .fields()
                .iter()
                .find(|f| remap.column_for(&f.name).eq_ignore_ascii_case(column))
                .ok_or_else(|| {
                    MarshalError::Config(format!(
                        "sink column '{}' has no matching field in the schema",
                        column
                    ))
                })?;
            fields.push(field.clone());
        }
        Schema::new(fields)
    }

    /// Introspect the table, validate `schema` against it and build the plan.
    pub async fn prepare(&self, provider: &dyn MetadataProvider, schema: &Schema) -> Result<SinkPlan> {
        let table_columns = self.table_columns(provider).await?;
        let projected = self.select_fields(schema)?;
        let remap = &self.config.field_mapping;

        let problems = self
            .dialect
            .validate_remapped(&projected, &table_columns, remap);
        if !problems.is_empty() {
            for problem in &problems {
                warn!("{}", problem);
            }
            return Err(MarshalError::Validation(problems));
        }

        let binding = ColumnTypeBinding::resolve(&projected, &table_columns, remap)?;
        let table = self.config.table_ref();
        let columns = binding.column_names();
        let statement = if self.config.upsert_keys.is_empty() {
            self.dialect.insert_statement(&table, &columns)?
        } else {
            self.dialect
                .upsert_statement(&table, &columns, &self.config.upsert_keys)?
        };
        info!(
            "{}: prepared {} columns for {}",
            self.dialect.name(),
            binding.len(),
            table
        );
        debug!("Sink statement: {}", statement);
        Ok(SinkPlan {
            schema: Arc::new(projected),
            binding,
            statement,
        })
    }

    /// Run init queries on `executor` and start writing through it.
    ///
    /// `executor` must already hold `plan.statement` prepared.
    pub async fn open<E: BatchExecutor>(&self, plan: SinkPlan, mut executor: E) -> Result<SinkWriter<E>> {
        run_init_queries(&mut executor, &self.config.init_queries, &self.connection).await?;
        Ok(SinkWriter {
            dialect: self.dialect.clone(),
            plan,
            executor,
            batch_size: self.config.batch_size.max(1),
            connection: self.connection.clone(),
            pending: 0,
            failed: false,
            started: Instant::now(),
            stats: SinkStats::default(),
        })
    }
}

/// Binds records into a batch executor, flushing every `batch_size` rows.
///
/// Any bind or flush failure rolls the transaction back; the writer then
/// refuses further rows.
pub struct SinkWriter<E: BatchExecutor> {
    dialect: Arc<dyn Dialect>,
    plan: SinkPlan,
    executor: E,
    batch_size: usize,
    connection: String,
    pending: usize,
    failed: bool,
    started: Instant,
    stats: SinkStats,
}

impl<E: BatchExecutor> SinkWriter<E> {
    pub fn plan(&self) -> &SinkPlan {
        &self.plan
    }

    pub fn stats(&self) -> &SinkStats {
        &self.stats
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Bind and queue one record.
    pub async fn write(&mut self, record: &Record) -> Result<()> {
        self.ensure_open()?;
        let queued = self
            .dialect
            .write_row(&mut self.executor, record, &self.plan.binding)
            .and_then(|()| {
                self.executor
                    .add_batch()
                    .map_err(|e| MarshalError::connectivity(&self.connection, e.to_string()))
            });
        if let Err(e) = queued {
            return Err(self.abort(e).await);
        }
        self.pending += 1;
        self.stats.rows_written += 1;
        if self.pending >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Execute the queued rows.
    pub async fn flush(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.pending == 0 {
            return Ok(());
        }
        match self.executor.execute_batch().await {
            Ok(affected) => {
                debug!("Flushed batch of {} rows", self.pending);
                self.stats.batches += 1;
                self.stats.rows_affected += affected;
                self.pending = 0;
                Ok(())
            }
            Err(e) => {
                let err = MarshalError::connectivity(
                    &self.connection,
                    format!("batch of {} rows failed: {}", self.pending, e),
                );
                Err(self.abort(err).await)
            }
        }
    }

    /// Flush the remaining rows and commit.
    pub async fn finish(mut self) -> Result<SinkStats> {
        self.flush().await?;
        if let Err(e) = self.executor.commit().await {
            let err = MarshalError::connectivity(&self.connection, format!("commit failed: {}", e));
            return Err(self.abort(err).await);
        }
        self.stats.elapsed = self.started.elapsed();
        info!(
            "Committed {} rows in {} batches ({:?})",
            self.stats.rows_written, self.stats.batches, self.stats.elapsed
        );
        Ok(self.stats)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.failed {
            return Err(MarshalError::Config(
                "sink writer already failed and was rolled back".into(),
            ));
        }
        Ok(())
    }

    /// Roll back after a failure and return the original error.
    async fn abort(&mut self, err: MarshalError) -> MarshalError {
        self.failed = true;
        self.pending = 0;
        if let Err(e) = self.executor.rollback().await {
            warn!("Rollback failed: {}", e);
        } else {
            warn!("Rolled back after error: {}", err);
        }
        err
    }
}
