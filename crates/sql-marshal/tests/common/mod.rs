//! In-memory driver fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use sql_marshal::core::traits::{
    Accessor, BatchExecutor, BoundStatement, MetadataProvider, ResultCursor, SqlSession,
};
use sql_marshal::core::types::SqlTypeCode;
use sql_marshal::error::{DriverError, DriverResult};
use sql_marshal::{ColumnDescriptor, SqlValue, TableRef};

/// Cursor over fixed rows. Records every access; optionally rejects a
/// stream column touched after any other column of the same row.
pub struct FakeCursor {
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Vec<SqlValue<'static>>>,
    current: Option<usize>,
    stream_columns: HashSet<usize>,
    touched_other: bool,
    pub accesses: Vec<(usize, Accessor)>,
    pub fail_advance_at: Option<usize>,
}

impl FakeCursor {
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Vec<SqlValue<'static>>>) -> Self {
        Self {
            columns,
            rows,
            current: None,
            stream_columns: HashSet::new(),
            touched_other: false,
            accesses: Vec::new(),
            fail_advance_at: None,
        }
    }

    /// Enforce sequential-stream access for these column positions.
    pub fn with_streams(mut self, positions: &[usize]) -> Self {
        self.stream_columns = positions.iter().copied().collect();
        self
    }

    pub fn accessor_for(&self, index: usize) -> Option<Accessor> {
        self.accesses
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, a)| *a)
    }
}

impl ResultCursor for FakeCursor {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn advance(&mut self) -> DriverResult<bool> {
        let next = self.current.map_or(0, |c| c + 1);
        if self.fail_advance_at == Some(next) {
            return Err(DriverError::new("connection reset by peer"));
        }
        self.current = Some(next);
        self.touched_other = false;
        Ok(next < self.rows.len())
    }

    fn get(&mut self, index: usize, accessor: Accessor) -> DriverResult<SqlValue<'_>> {
        let row = self
            .current
            .ok_or_else(|| DriverError::new("cursor is before the first row"))?;
        if self.stream_columns.contains(&index) {
            if self.touched_other {
                return Err(DriverError::new("Stream has already been closed"));
            }
        } else {
            self.touched_other = true;
        }
        self.accesses.push((index, accessor));
        self.rows[row]
            .get(index)
            .cloned()
            .ok_or_else(|| DriverError::new(format!("no column at index {}", index)))
    }
}

/// One bound parameter: value and the explicit target type, if any.
pub type Param = (SqlValue<'static>, Option<SqlTypeCode>);

/// Statement, session and batch executor in one.
#[derive(Default)]
pub struct FakeExecutor {
    pub current: Vec<Option<Param>>,
    pub queued: Vec<Vec<Option<Param>>>,
    pub executed_batches: Vec<Vec<Vec<Option<Param>>>>,
    pub session_sql: Vec<String>,
    pub fail_bind_at: Option<usize>,
    pub fail_batch: Option<usize>,
    pub committed: bool,
    pub rolled_back: bool,
}

impl FakeExecutor {
    fn set(&mut self, index: usize, param: Param) {
        if self.current.len() <= index {
            self.current.resize(index + 1, None);
        }
        self.current[index] = Some(param);
    }

    /// Every row that reached a successful `execute_batch`.
    pub fn executed_rows(&self) -> Vec<Vec<Option<Param>>> {
        self.executed_batches.iter().flatten().cloned().collect()
    }
}

impl BoundStatement for FakeExecutor {
    fn bind(&mut self, index: usize, value: SqlValue<'_>) -> DriverResult<()> {
        if self.fail_bind_at == Some(index) {
            return Err(DriverError::new("invalid parameter").with_sql_state("22023"));
        }
        self.set(index, (value.into_owned(), None));
        Ok(())
    }

    fn bind_null(&mut self, index: usize, sql_type: SqlTypeCode) -> DriverResult<()> {
        self.set(index, (SqlValue::Null, Some(sql_type)));
        Ok(())
    }

    fn bind_as(&mut self, index: usize, value: SqlValue<'_>, sql_type: SqlTypeCode) -> DriverResult<()> {
        self.set(index, (value.into_owned(), Some(sql_type)));
        Ok(())
    }
}

#[async_trait]
impl SqlSession for FakeExecutor {
    async fn execute(&mut self, sql: &str) -> DriverResult<u64> {
        self.session_sql.push(sql.to_string());
        Ok(0)
    }
}

#[async_trait]
impl BatchExecutor for FakeExecutor {
    fn add_batch(&mut self) -> DriverResult<()> {
        let row = std::mem::take(&mut self.current);
        self.queued.push(row);
        Ok(())
    }

    async fn execute_batch(&mut self) -> DriverResult<u64> {
        if self.fail_batch == Some(self.executed_batches.len()) {
            return Err(DriverError::new("duplicate key value violates unique constraint").with_sql_state("23505"));
        }
        let batch = std::mem::take(&mut self.queued);
        let n = batch.len() as u64;
        self.executed_batches.push(batch);
        Ok(n)
    }

    async fn commit(&mut self) -> DriverResult<()> {
        self.committed = true;
        Ok(())
    }

    async fn rollback(&mut self) -> DriverResult<()> {
        self.rolled_back = true;
        self.queued.clear();
        Ok(())
    }
}

/// Metadata provider returning fixed columns, optionally slowly or failing.
pub struct FakeMetadata {
    pub columns: Vec<ColumnDescriptor>,
    pub delay: Option<Duration>,
    pub error: Option<String>,
}

impl FakeMetadata {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            delay: None,
            error: None,
        }
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn table_columns(&self, _table: &TableRef) -> DriverResult<Vec<ColumnDescriptor>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.error {
            Some(message) => Err(DriverError::new(message.clone())),
            None => Ok(self.columns.clone()),
        }
    }
}
