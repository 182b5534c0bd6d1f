//! MySQL SQL dialect.

use crate::config::ConnectionConfig;
use crate::core::column::TableRef;
use crate::core::identifier;
use crate::dialect::{sql, Dialect, DialectKind, ReaderOptions};
use crate::drivers::common::{url_query, url_userinfo};
use crate::error::Result;

/// MySQL dialect, shared by the Aurora and CloudSQL variants.
#[derive(Debug, Clone)]
pub struct MysqlDialect {
    kind: DialectKind,
    pub(super) options: ReaderOptions,
}

impl MysqlDialect {
    /// Create a plain MySQL dialect.
    pub fn new(options: ReaderOptions) -> Self {
        Self::with_kind(DialectKind::Mysql, options)
    }

    /// Create a dialect for one MySQL-family tag.
    pub fn with_kind(kind: DialectKind, options: ReaderOptions) -> Self {
        debug_assert!(kind.is_mysql_family());
        Self { kind, options }
    }
}

impl Default for MysqlDialect {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl Dialect for MysqlDialect {
    fn kind(&self) -> DialectKind {
        self.kind
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        identifier::quote_backtick(name)
    }

    fn upsert_statement(&self, table: &TableRef, columns: &[String], keys: &[String]) -> Result<String> {
        let (key_cols, value_cols) = sql::split_keys(columns, keys)?;
        let mut stmt = self.insert_statement(table, columns)?;
        let updates = if value_cols.is_empty() {
            // Keep the row untouched; the key assignment is a no-op
            let q = self.quote_ident(key_cols[0])?;
            vec![format!("{q} = {q}")]
        } else {
            value_cols
                .iter()
                .map(|c| {
                    let q = self.quote_ident(c)?;
                    Ok(format!("{q} = VALUES({q})"))
                })
                .collect::<Result<Vec<_>>>()?
        };
        stmt.push_str(" ON DUPLICATE KEY UPDATE ");
        stmt.push_str(&updates.join(", "));
        Ok(stmt)
    }

    fn connection_string(&self, conn: &ConnectionConfig) -> Result<String> {
        let userinfo = url_userinfo(&conn.user, &conn.password);
        let db = urlencoding::encode(&conn.database);
        match (&self.kind, &conn.instance) {
            (DialectKind::CloudSqlMysql, Some(instance)) => Ok(format!(
                "mysql://{}localhost/{}{}",
                userinfo,
                db,
                url_query(
                    &conn.connection_arguments,
                    &[("socket", format!("/cloudsql/{}", instance))]
                )
            )),
            _ => Ok(format!(
                "mysql://{}{}:{}/{}{}",
                userinfo,
                conn.host,
                conn.port_or_default(),
                db,
                url_query(&conn.connection_arguments, &[])
            )),
        }
    }

    fn random_sample_query(&self, table: &TableRef, limit: u64) -> Result<String> {
        Ok(format!(
            "SELECT * FROM {} ORDER BY RAND() LIMIT {}",
            self.qualify_table(table)?,
            limit
        ))
    }
}
