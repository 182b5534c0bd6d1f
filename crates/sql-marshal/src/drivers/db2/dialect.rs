//! DB2 SQL dialect.

use crate::config::ConnectionConfig;
use crate::core::column::TableRef;
use crate::dialect::{sql, Dialect, DialectKind, ReaderOptions};
use crate::drivers::common::{keyword_arguments, keyword_value};
use crate::error::Result;

/// DB2 for LUW / z/OS dialect.
#[derive(Debug, Clone, Default)]
pub struct Db2Dialect {
    pub(super) options: ReaderOptions,
}

impl Db2Dialect {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }
}

impl Dialect for Db2Dialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Db2
    }

    fn upsert_statement(&self, table: &TableRef, columns: &[String], keys: &[String]) -> Result<String> {
        let source = format!(
            "(VALUES ({})) AS src ({})",
            sql::placeholders(self, columns.len()).join(", "),
            sql::quoted_columns(self, columns)?.join(", ")
        );
        sql::merge(self, table, columns, keys, &source)
    }

    /// CLI `KEY=value;` connection string.
    fn connection_string(&self, conn: &ConnectionConfig) -> Result<String> {
        let mut out = format!(
            "DATABASE={};HOSTNAME={};PORT={};PROTOCOL=TCPIP;UID={};PWD={};",
            keyword_value(&conn.database),
            conn.host,
            conn.port_or_default(),
            keyword_value(&conn.user),
            keyword_value(&conn.password)
        );
        keyword_arguments(&mut out, &conn.connection_arguments);
        Ok(out)
    }

    fn random_sample_query(&self, table: &TableRef, limit: u64) -> Result<String> {
        Ok(format!(
            "SELECT * FROM {} ORDER BY RAND() FETCH FIRST {} ROWS ONLY",
            self.qualify_table(table)?,
            limit
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_uses_values_source() {
        let d = Db2Dialect::default();
        let sql = d
            .upsert_statement(
                &TableRef::qualified("APP", "ITEMS"),
                &["ID".into(), "QTY".into()],
                &["ID".into()],
            )
            .unwrap();
        assert_eq!(
            sql,
            "MERGE INTO \"APP\".\"ITEMS\" tgt USING (VALUES (?, ?)) AS src (\"ID\", \"QTY\") \
             ON (tgt.\"ID\" = src.\"ID\") WHEN MATCHED THEN UPDATE SET tgt.\"QTY\" = src.\"QTY\" \
             WHEN NOT MATCHED THEN INSERT (\"ID\", \"QTY\") VALUES (src.\"ID\", src.\"QTY\")"
        );
    }

    #[test]
    fn test_connection_string() {
        let d = Db2Dialect::default();
        let mut c = ConnectionConfig::new(DialectKind::Db2);
        c.host = "db2.local".into();
        c.database = "SAMPLE".into();
        c.user = "db2inst1".into();
        c.password = "pw".into();
        c.connection_arguments.insert("SECURITY".into(), "SSL".into());
        assert_eq!(
            d.connection_string(&c).unwrap(),
            "DATABASE=SAMPLE;HOSTNAME=db2.local;PORT=50000;PROTOCOL=TCPIP;UID=db2inst1;PWD=pw;SECURITY=SSL;"
        );
    }

    #[test]
    fn test_sample_query() {
        let d = Db2Dialect::default();
        assert_eq!(
            d.random_sample_query(&TableRef::new("ITEMS"), 10).unwrap(),
            "SELECT * FROM \"ITEMS\" ORDER BY RAND() FETCH FIRST 10 ROWS ONLY"
        );
    }
}
