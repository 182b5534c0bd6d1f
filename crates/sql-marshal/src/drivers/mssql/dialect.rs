//! MSSQL SQL dialect.

use crate::config::ConnectionConfig;
use crate::core::column::TableRef;
use crate::core::identifier;
use crate::dialect::{sql, Dialect, DialectKind, ReaderOptions};
use crate::drivers::common::{keyword_arguments, keyword_value};
use crate::error::Result;

/// SQL Server dialect.
#[derive(Debug, Clone, Default)]
pub struct MssqlDialect {
    pub(super) options: ReaderOptions,
}

impl MssqlDialect {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }
}

impl Dialect for MssqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::SqlServer
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        identifier::quote_bracket(name)
    }

    fn placeholder(&self, position: usize) -> String {
        // MSSQL uses @P1, @P2, etc.
        format!("@P{}", position)
    }

    fn upsert_statement(&self, table: &TableRef, columns: &[String], keys: &[String]) -> Result<String> {
        let source = format!("({}) src", sql::select_placeholders(self, columns)?);
        let mut stmt = sql::merge(self, table, columns, keys, &source)?;
        // MSSQL MERGE requires semicolon terminator
        stmt.push(';');
        Ok(stmt)
    }

    /// ADO.NET style `key=value;` connection string.
    fn connection_string(&self, conn: &ConnectionConfig) -> Result<String> {
        let mut out = format!(
            "Server=tcp:{},{};Database={};User Id={};Password={};",
            conn.host,
            conn.port_or_default(),
            keyword_value(&conn.database),
            keyword_value(&conn.user),
            keyword_value(&conn.password)
        );
        keyword_arguments(&mut out, &conn.connection_arguments);
        Ok(out)
    }

    /// `NEWID()` checksum filter keeping about `limit` rows, capped by `TOP`.
    fn random_sample_query(&self, table: &TableRef, limit: u64) -> Result<String> {
        let t = self.qualify_table(table)?;
        Ok(format!(
            "SELECT TOP ({limit}) * FROM {t} WHERE (ABS(CHECKSUM(NEWID())) % 10000) < \
             (SELECT CASE WHEN COUNT_BIG(*) = 0 THEN 10000 ELSE 10000 * {limit} / COUNT_BIG(*) + 1 END FROM {t})"
        ))
    }
}
