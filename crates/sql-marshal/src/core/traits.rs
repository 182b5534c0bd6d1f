//! Driver-side collaborator traits.
//!
//! The marshalling layer never talks to a database directly. Drivers (or
//! test fakes) implement these traits:
//!
//! - [`ResultCursor`]: positional, forward-only access to a query result
//! - [`BoundStatement`]: positional parameter binding
//! - [`SqlSession`]: ad-hoc statement execution (init queries)
//! - [`BatchExecutor`]: batched, transactional writes
//! - [`MetadataProvider`]: live table column metadata
//!
//! Per-value cursor and statement access is synchronous. Round trips to the
//! server are `async`. Implementations release their resources on `Drop`.

use async_trait::async_trait;

use crate::core::column::{ColumnDescriptor, TableRef};
use crate::core::types::SqlTypeCode;
use crate::core::value::SqlValue;
use crate::error::DriverResult;

/// How a cursor should materialize a column value.
///
/// Mirrors the typed getters most drivers expose; the driver converts the
/// stored value into the requested representation where it can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessor {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    /// Fixed-point, fetched at the given scale.
    Decimal { scale: u32 },
    String,
    Bytes,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    /// Driver's native representation.
    Object,
}

/// Forward-only query result.
///
/// `get` borrows the cursor mutably, so a value (including its lent buffer)
/// must be materialized before the next column is touched. This is what
/// sequential-stream columns require.
pub trait ResultCursor: Send {
    /// Metadata of the result columns, in select order.
    fn columns(&self) -> &[ColumnDescriptor];

    /// Move to the next row. Returns `false` when the result is exhausted.
    fn advance(&mut self) -> DriverResult<bool>;

    /// Fetch a column of the current row (0-based).
    fn get(&mut self, index: usize, accessor: Accessor) -> DriverResult<SqlValue<'_>>;
}

/// Positional parameter sink for one statement (0-based positions).
pub trait BoundStatement: Send {
    /// Bind a value using the driver's default type for it.
    fn bind(&mut self, index: usize, value: SqlValue<'_>) -> DriverResult<()>;

    /// Bind a typed NULL.
    fn bind_null(&mut self, index: usize, sql_type: SqlTypeCode) -> DriverResult<()>;

    /// Bind a value with an explicit target SQL type, letting the server cast.
    fn bind_as(
        &mut self,
        index: usize,
        value: SqlValue<'_>,
        sql_type: SqlTypeCode,
    ) -> DriverResult<()> {
        let _ = sql_type;
        self.bind(index, value)
    }
}

/// A live database session.
#[async_trait]
pub trait SqlSession: Send {
    /// Execute a statement that returns no rows.
    async fn execute(&mut self, sql: &str) -> DriverResult<u64>;
}

/// Transactional batch writer over a prepared statement.
#[async_trait]
pub trait BatchExecutor: SqlSession + BoundStatement {
    /// Queue the currently bound parameters as one batch entry.
    fn add_batch(&mut self) -> DriverResult<()>;

    /// Execute all queued entries. Returns the affected row count.
    async fn execute_batch(&mut self) -> DriverResult<u64>;

    async fn commit(&mut self) -> DriverResult<()>;

    async fn rollback(&mut self) -> DriverResult<()>;
}

/// Live table metadata lookup.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Columns of a table, in ordinal order.
    async fn table_columns(&self, table: &TableRef) -> DriverResult<Vec<ColumnDescriptor>>;
}
