//! Dialect capabilities.
//!
//! A dialect bundles three capability traits:
//!
//! - [`SchemaReader`]: column metadata to canonical fields
//! - [`RecordMarshaller`]: cursor rows to records and records to parameters
//! - [`FieldsValidator`]: schema against table columns
//!
//! Each trait carries default (template) methods backed by free functions in
//! [`reader`], [`read`], [`write`] and [`validate`]. Vendor dialects under
//! `drivers/` override only what differs and fall back to those functions.

pub mod generic;
pub mod marshal;
pub mod read;
pub mod reader;
pub mod sql;
pub mod validate;
pub mod write;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConnectionConfig;
use crate::core::column::TableRef;
use crate::core::identifier;
use crate::error::{MarshalError, Result};

pub use generic::GenericDialect;
pub use marshal::RecordMarshaller;
pub use read::ReadPlan;
pub use reader::{DecimalSpec, FieldMapping, ReaderOptions, SchemaReader, TimezonePolicy};
pub use validate::{FieldsValidator, Incompatibility, IncompatibilityKind};

/// Supported dialect tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DialectKind {
    Mysql,
    AuroraMysql,
    CloudSqlMysql,
    Postgres,
    AuroraPostgres,
    CloudSqlPostgres,
    Oracle,
    SqlServer,
    Db2,
    Generic,
}

impl DialectKind {
    /// Every tag, in registry order.
    pub const ALL: [DialectKind; 10] = [
        DialectKind::Mysql,
        DialectKind::AuroraMysql,
        DialectKind::CloudSqlMysql,
        DialectKind::Postgres,
        DialectKind::AuroraPostgres,
        DialectKind::CloudSqlPostgres,
        DialectKind::Oracle,
        DialectKind::SqlServer,
        DialectKind::Db2,
        DialectKind::Generic,
    ];

    /// Canonical tag.
    pub fn tag(&self) -> &'static str {
        match self {
            DialectKind::Mysql => "mysql",
            DialectKind::AuroraMysql => "aurora-mysql",
            DialectKind::CloudSqlMysql => "cloudsql-mysql",
            DialectKind::Postgres => "postgres",
            DialectKind::AuroraPostgres => "aurora-postgres",
            DialectKind::CloudSqlPostgres => "cloudsql-postgres",
            DialectKind::Oracle => "oracle",
            DialectKind::SqlServer => "sqlserver",
            DialectKind::Db2 => "db2",
            DialectKind::Generic => "generic",
        }
    }

    /// Human readable product name.
    pub fn display_name(&self) -> &'static str {
        match self {
            DialectKind::Mysql => "MySQL",
            DialectKind::AuroraMysql => "Aurora MySQL",
            DialectKind::CloudSqlMysql => "CloudSQL MySQL",
            DialectKind::Postgres => "PostgreSQL",
            DialectKind::AuroraPostgres => "Aurora PostgreSQL",
            DialectKind::CloudSqlPostgres => "CloudSQL PostgreSQL",
            DialectKind::Oracle => "Oracle",
            DialectKind::SqlServer => "SQL Server",
            DialectKind::Db2 => "DB2",
            DialectKind::Generic => "Generic",
        }
    }

    pub fn is_mysql_family(&self) -> bool {
        matches!(
            self,
            DialectKind::Mysql | DialectKind::AuroraMysql | DialectKind::CloudSqlMysql
        )
    }

    pub fn is_postgres_family(&self) -> bool {
        matches!(
            self,
            DialectKind::Postgres | DialectKind::AuroraPostgres | DialectKind::CloudSqlPostgres
        )
    }

    pub fn is_cloudsql(&self) -> bool {
        matches!(self, DialectKind::CloudSqlMysql | DialectKind::CloudSqlPostgres)
    }

    /// Standard server port.
    pub fn default_port(&self) -> u16 {
        match self {
            k if k.is_mysql_family() => 3306,
            k if k.is_postgres_family() => 5432,
            DialectKind::Oracle => 1521,
            DialectKind::SqlServer => 1433,
            DialectKind::Db2 => 50000,
            _ => 0,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DialectKind {
    type Err = MarshalError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "mysql" | "mariadb" => DialectKind::Mysql,
            "aurora-mysql" | "auroramysql" => DialectKind::AuroraMysql,
            "cloudsql-mysql" | "cloudsqlmysql" => DialectKind::CloudSqlMysql,
            "postgres" | "postgresql" | "pg" | "pgsql" => DialectKind::Postgres,
            "aurora-postgres" | "aurora-postgresql" | "aurorapostgres" => {
                DialectKind::AuroraPostgres
            }
            "cloudsql-postgres" | "cloudsql-postgresql" | "cloudsqlpostgres" => {
                DialectKind::CloudSqlPostgres
            }
            "oracle" | "ora" => DialectKind::Oracle,
            "sqlserver" | "sql-server" | "mssql" | "sqlsrv" => DialectKind::SqlServer,
            "db2" | "ibm-db2" => DialectKind::Db2,
            "generic" | "ansi" => DialectKind::Generic,
            _ => {
                return Err(MarshalError::Config(format!(
                    "Unknown dialect '{}'. Valid: {}",
                    s,
                    DialectKind::ALL.map(|k| k.tag()).join(", ")
                )))
            }
        };
        Ok(kind)
    }
}

impl TryFrom<String> for DialectKind {
    type Error = MarshalError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<DialectKind> for String {
    fn from(kind: DialectKind) -> Self {
        kind.tag().to_string()
    }
}

/// Full capability set of one SQL dialect.
pub trait Dialect: SchemaReader + RecordMarshaller + FieldsValidator {
    fn kind(&self) -> DialectKind;

    /// Dialect tag.
    fn name(&self) -> &'static str {
        self.kind().tag()
    }

    /// Quote an identifier. Defaults to ANSI double quotes.
    fn quote_ident(&self, name: &str) -> Result<String> {
        identifier::quote_double(name)
    }

    /// Quote an optionally schema-qualified table name.
    fn qualify_table(&self, table: &TableRef) -> Result<String> {
        identifier::qualify(table, |n| self.quote_ident(n))
    }

    /// Positional parameter marker (1-based position).
    fn placeholder(&self, position: usize) -> String {
        let _ = position;
        "?".to_string()
    }

    /// Parameterised INSERT for the given columns.
    fn insert_statement(&self, table: &TableRef, columns: &[String]) -> Result<String> {
        sql::insert(self, table, columns)
    }

    /// Parameterised upsert keyed on `keys`. Defaults to ANSI MERGE.
    fn upsert_statement(&self, table: &TableRef, columns: &[String], keys: &[String]) -> Result<String> {
        let source = format!("({}) src", sql::select_placeholders(self, columns)?);
        sql::merge(self, table, columns, keys, &source)
    }

    /// Driver connection string. Contains credentials: never log it.
    fn connection_string(&self, conn: &ConnectionConfig) -> Result<String>;

    /// Query returning about `limit` random rows of `table`.
    fn random_sample_query(&self, table: &TableRef, limit: u64) -> Result<String>;
}
