//! Microsoft SQL Server dialect.
//!
//! - [`MssqlDialect`]: bracket quoting, `@Pn` placeholders, `MERGE` upserts
//! - schema overrides: spatial types, `DATETIMEOFFSET`, `SQL_VARIANT`, `rowversion`
//! - record overrides: 100ns `TIME`, offset timestamps, WKB/WKT spatial values

mod dialect;
mod record;
mod schema;

pub use dialect::MssqlDialect;

use crate::core::types::SqlTypeCode;

pub const DATETIMEOFFSET: SqlTypeCode = -155;
pub const SQL_VARIANT: SqlTypeCode = -156;
pub const GEOMETRY: SqlTypeCode = -157;
pub const GEOGRAPHY: SqlTypeCode = -158;
