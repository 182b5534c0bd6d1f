//! # sql-marshal
//!
//! Cross-dialect schema mapping and record marshalling for relational
//! ETL connectors.
//!
//! This library provides, per SQL dialect:
//!
//! - **Schema inference** from driver column metadata to a canonical schema
//! - **Record reading** from result cursors into canonical records
//! - **Record writing** from canonical records into bound statements
//! - **Write validation** of a canonical schema against live table columns
//! - **Source and sink tasks** with init queries, batching and rollback
//!
//! Supported dialects: MySQL (plus Aurora and CloudSQL), PostgreSQL (plus
//! Aurora and CloudSQL), Oracle, SQL Server, DB2 and a generic ANSI dialect.
//!
//! ## Example
//!
//! ```rust
//! use sql_marshal::core::types;
//! use sql_marshal::{ColumnDescriptor, DialectRegistry, ReaderOptions, SchemaReader};
//!
//! let registry = DialectRegistry::with_builtins(ReaderOptions::default());
//! let oracle = registry.require("oracle")?;
//! let columns = vec![
//!     ColumnDescriptor::new("ID", types::NUMERIC, "NUMBER").with_precision(10, 0),
//!     ColumnDescriptor::new("NOTES", types::LONGVARCHAR, "LONG"),
//! ];
//! let schema = oracle.infer_schema(&columns)?;
//! assert_eq!(schema.fields()[0].type_name(), "decimal(10,0)");
//! # Ok::<(), sql_marshal::MarshalError>(())
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod drivers;
pub mod error;
pub mod pipeline;

// Re-exports for convenient access
pub use crate::config::{Config, ConnectionConfig, SinkConfig, SourceConfig};
pub use crate::core::{
    ColumnDescriptor, ColumnRemap, ColumnTypeBinding, DialectRegistry, Field, FieldType,
    LogicalType, Record, Schema, SqlValue, TableRef, Value,
};
pub use crate::dialect::{
    Dialect, DialectKind, FieldsValidator, Incompatibility, IncompatibilityKind, ReaderOptions,
    RecordMarshaller, SchemaReader, TimezonePolicy,
};
pub use crate::error::{DriverError, MarshalError, Result};
pub use crate::pipeline::{RecordStream, SinkTask, SinkWriter, SourceTask};
