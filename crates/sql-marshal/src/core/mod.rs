//! Core abstractions shared by every dialect.
//!
//! - [`schema`]: canonical fields and schemas
//! - [`value`]: canonical values and driver values
//! - [`column`]: column metadata, table references, column-type bindings
//! - [`record`]: schema-bound rows
//! - [`traits`]: driver-side collaborators (cursor, statement, session, metadata)
//! - [`registry`]: dialect registry for dependency injection
//!
//! # Architecture
//!
//! The core module is database-agnostic. Vendor behaviour lives in the
//! driver modules (`drivers/mysql`, `drivers/postgres`, etc.), which plug
//! into the capability traits of [`crate::dialect`].

pub mod column;
pub mod identifier;
pub mod record;
pub mod registry;
pub mod schema;
pub mod traits;
pub mod types;
pub mod value;

// Re-export commonly used types for convenience
pub use column::{ColumnDescriptor, ColumnRemap, ColumnType, ColumnTypeBinding, TableRef};
pub use record::{Record, RecordBuilder};
pub use registry::DialectRegistry;
pub use schema::{Field, FieldType, LogicalType, Schema};
pub use traits::{
    Accessor, BatchExecutor, BoundStatement, MetadataProvider, ResultCursor, SqlSession,
};
pub use types::SqlTypeCode;
pub use value::{SqlValue, Value};
