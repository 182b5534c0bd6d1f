//! Vendor dialect implementations.
//!
//! - [`mysql`]: MySQL, Aurora MySQL, CloudSQL MySQL
//! - [`postgres`]: PostgreSQL, Aurora PostgreSQL, CloudSQL PostgreSQL
//! - [`oracle`]: Oracle
//! - [`mssql`]: Microsoft SQL Server
//! - [`db2`]: IBM DB2
//! - [`common`]: connection string helpers
//!
//! # Adding New Databases
//!
//! 1. Create a module under `drivers/` with `dialect.rs`, `schema.rs` and `record.rs`
//! 2. Implement `SchemaReader`, `RecordMarshaller`, `FieldsValidator` and `Dialect`,
//!    overriding only the vendor types and delegating to the standard functions
//! 3. Add a `DialectKind` tag and register it in `DialectRegistry::with_builtins()`

pub mod common;
pub mod db2;
pub mod mssql;
pub mod mysql;
pub mod oracle;
pub mod postgres;

pub use db2::Db2Dialect;
pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
