//! Configuration validation.

use super::{Config, ConnectionConfig, SinkConfig, SourceConfig};
use crate::core::schema::MAX_DECIMAL_PRECISION;
use crate::dialect::DialectKind;
use crate::error::{MarshalError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    validate_connection(&config.connection)?;
    if let Some(source) = &config.source {
        validate_source(source)?;
    }
    if let Some(sink) = &config.sink {
        validate_sink(sink)?;
    }
    Ok(())
}

/// Validate connection parameters for the configured dialect.
pub fn validate_connection(conn: &ConnectionConfig) -> Result<()> {
    if conn.dialect == DialectKind::Generic {
        return match &conn.url {
            Some(url) if !url.is_empty() => Ok(()),
            _ => Err(MarshalError::Config(
                "connection.url is required for the generic dialect".into(),
            )),
        };
    }

    if conn.dialect.is_cloudsql() {
        if conn.instance.as_deref().unwrap_or_default().is_empty() {
            return Err(MarshalError::Config(format!(
                "connection.instance is required for {}",
                conn.dialect
            )));
        }
    } else if conn.host.is_empty() {
        return Err(MarshalError::Config("connection.host is required".into()));
    }
    if conn.database.is_empty() {
        return Err(MarshalError::Config("connection.database is required".into()));
    }
    if conn.user.is_empty() {
        return Err(MarshalError::Config("connection.user is required".into()));
    }
    if let Some(0) = conn.port {
        return Err(MarshalError::Config("connection.port must be at least 1".into()));
    }
    Ok(())
}

fn validate_source(source: &SourceConfig) -> Result<()> {
    if let Some(0) = source.sample_size {
        return Err(MarshalError::Config(
            "source.sample_size must be at least 1".into(),
        ));
    }
    if source.sample_size.is_some() && source.table.is_none() {
        return Err(MarshalError::Config(
            "source.table is required when source.sample_size is set".into(),
        ));
    }
    if source.init_queries.iter().any(|q| q.trim().is_empty()) {
        return Err(MarshalError::Config(
            "source.init_queries cannot contain empty statements".into(),
        ));
    }
    Ok(())
}

fn validate_sink(sink: &SinkConfig) -> Result<()> {
    if sink.table.is_empty() {
        return Err(MarshalError::Config("sink.table is required".into()));
    }
    if sink.batch_size == 0 {
        return Err(MarshalError::Config("sink.batch_size must be at least 1".into()));
    }
    if sink.introspection_timeout_secs == 0 {
        return Err(MarshalError::Config(
            "sink.introspection_timeout_secs must be at least 1".into(),
        ));
    }
    if let Some(spec) = sink.default_decimal {
        if spec.precision == 0 || spec.precision > MAX_DECIMAL_PRECISION || spec.scale > spec.precision {
            return Err(MarshalError::Config(format!(
                "sink.default_decimal must satisfy 1 <= precision <= {} and scale <= precision, got ({}, {})",
                MAX_DECIMAL_PRECISION, spec.precision, spec.scale
            )));
        }
    }
    if let Some(columns) = &sink.columns {
        if columns.is_empty() {
            return Err(MarshalError::Config(
                "sink.columns cannot be empty when set".into(),
            ));
        }
        for key in &sink.upsert_keys {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(key)) {
                return Err(MarshalError::Config(format!(
                    "sink.upsert_keys entry '{}' is not in sink.columns",
                    key
                )));
            }
        }
    }
    if sink.init_queries.iter().any(|q| q.trim().is_empty()) {
        return Err(MarshalError::Config(
            "sink.init_queries cannot contain empty statements".into(),
        ));
    }
    Ok(())
}
