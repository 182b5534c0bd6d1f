//! Dialect registry for explicit dependency injection.
//!
//! The [`DialectRegistry`] is constructed by the caller and handed to the
//! tasks that need a dialect, rather than living in a global.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::dialect::{Dialect, DialectKind, GenericDialect, ReaderOptions};
use crate::drivers::{Db2Dialect, MssqlDialect, MysqlDialect, OracleDialect, PostgresDialect};
use crate::error::{MarshalError, Result};

/// Registry of dialects keyed by tag.
#[derive(Default)]
pub struct DialectRegistry {
    dialects: BTreeMap<DialectKind, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in dialect, all sharing `options`.
    pub fn with_builtins(options: ReaderOptions) -> Self {
        let mut registry = Self::new();
        for kind in DialectKind::ALL {
            registry.register_arc(builtin(kind, options.clone()));
        }
        registry
    }

    /// Register a dialect under its own tag, replacing any previous entry.
    pub fn register(&mut self, dialect: impl Dialect + 'static) {
        self.register_arc(Arc::new(dialect));
    }

    /// Register a dialect as an Arc (for sharing).
    pub fn register_arc(&mut self, dialect: Arc<dyn Dialect>) {
        self.dialects.insert(dialect.kind(), dialect);
    }

    /// Get a dialect by tag or alias.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        let kind = name.parse::<DialectKind>().ok()?;
        self.get_kind(kind)
    }

    pub fn get_kind(&self, kind: DialectKind) -> Option<Arc<dyn Dialect>> {
        self.dialects.get(&kind).cloned()
    }

    /// Get a dialect by tag or alias, returning an error if not found.
    pub fn require(&self, name: &str) -> Result<Arc<dyn Dialect>> {
        let kind: DialectKind = name.parse()?;
        self.get_kind(kind)
            .ok_or_else(|| MarshalError::Config(format!("Dialect not registered: {}", kind)))
    }

    /// Check if a dialect is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered tags, in registry order.
    pub fn kinds(&self) -> Vec<DialectKind> {
        self.dialects.keys().copied().collect()
    }
}

/// Built-in dialect for a tag.
pub fn builtin(kind: DialectKind, options: ReaderOptions) -> Arc<dyn Dialect> {
    match kind {
        k if k.is_mysql_family() => Arc::new(MysqlDialect::with_kind(k, options)),
        k if k.is_postgres_family() => Arc::new(PostgresDialect::with_kind(k, options)),
        DialectKind::Oracle => Arc::new(OracleDialect::new(options)),
        DialectKind::SqlServer => Arc::new(MssqlDialect::new(options)),
        DialectKind::Db2 => Arc::new(Db2Dialect::new(options)),
        _ => Arc::new(GenericDialect::new(options)),
    }
}
