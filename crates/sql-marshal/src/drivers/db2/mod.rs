//! IBM DB2 dialect.

mod dialect;
mod record;
mod schema;

pub use dialect::Db2Dialect;

use crate::core::types::SqlTypeCode;

pub const DECFLOAT: SqlTypeCode = -360;
