//! Oracle dialect.
//!
//! Oracle reports several vendor type codes outside the standard numbering,
//! and `LONG` / `LONG RAW` columns are sequential streams that must be read
//! before any other column of the row.

mod dialect;
mod record;
mod schema;

pub use dialect::OracleDialect;

use crate::core::types::SqlTypeCode;

pub const TIMESTAMPTZ: SqlTypeCode = -101;
pub const TIMESTAMPLTZ: SqlTypeCode = -102;
pub const INTERVALYM: SqlTypeCode = -103;
pub const INTERVALDS: SqlTypeCode = -104;
pub const BFILE: SqlTypeCode = -13;
pub const BINARY_FLOAT: SqlTypeCode = 100;
pub const BINARY_DOUBLE: SqlTypeCode = 101;
