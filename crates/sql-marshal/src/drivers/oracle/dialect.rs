//! Oracle SQL dialect.

use crate::config::ConnectionConfig;
use crate::core::column::TableRef;
use crate::dialect::{sql, Dialect, DialectKind, ReaderOptions};
use crate::error::{MarshalError, Result};

/// Oracle dialect.
#[derive(Debug, Clone, Default)]
pub struct OracleDialect {
    pub(super) options: ReaderOptions,
}

impl OracleDialect {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }
}

/// Quote an EZConnect credential that contains anything but word characters.
fn ez_credential(value: &str) -> Result<String> {
    if value.contains('"') {
        return Err(MarshalError::Config(
            "Oracle credentials cannot contain double quotes".into(),
        ));
    }
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#'));
    if plain {
        Ok(value.to_string())
    } else {
        Ok(format!("\"{}\"", value))
    }
}

impl Dialect for OracleDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn placeholder(&self, position: usize) -> String {
        format!(":{}", position)
    }

    fn upsert_statement(&self, table: &TableRef, columns: &[String], keys: &[String]) -> Result<String> {
        let source = format!("({} FROM DUAL) src", sql::select_placeholders(self, columns)?);
        sql::merge(self, table, columns, keys, &source)
    }

    /// EZConnect: `user/password@//host:port/service[?k=v&...]`.
    fn connection_string(&self, conn: &ConnectionConfig) -> Result<String> {
        let mut out = String::new();
        if !conn.user.is_empty() {
            out.push_str(&ez_credential(&conn.user)?);
            if !conn.password.is_empty() {
                out.push('/');
                out.push_str(&ez_credential(&conn.password)?);
            }
            out.push('@');
        }
        out.push_str(&format!(
            "//{}:{}/{}",
            conn.host,
            conn.port_or_default(),
            conn.database
        ));
        sql::append_arguments(&mut out, &conn.connection_arguments, "?", "&");
        Ok(out)
    }

    fn random_sample_query(&self, table: &TableRef, limit: u64) -> Result<String> {
        Ok(format!(
            "SELECT * FROM {} ORDER BY DBMS_RANDOM.VALUE FETCH FIRST {} ROWS ONLY",
            self.qualify_table(table)?,
            limit
        ))
    }
}
