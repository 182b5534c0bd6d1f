//! Identifier validation and quoting for generated SQL.
//!
//! Identifiers cannot be bound as parameters, so generated statements quote
//! them. Each dialect picks one of the quoting styles below.

use crate::core::column::TableRef;
use crate::error::{MarshalError, Result};

/// Maximum identifier length (conservative limit across databases).
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier before it is embedded in SQL.
///
/// Rejects empty identifiers, null bytes and over-long names.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MarshalError::Config("Identifier cannot be empty".to_string()));
    }

    if name.contains('\0') {
        return Err(MarshalError::Config(format!(
            "Identifier contains a null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MarshalError::Config(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// ANSI double-quote style (PostgreSQL, Oracle, DB2).
pub fn quote_double(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Backtick style (MySQL).
pub fn quote_backtick(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}

/// Bracket style (SQL Server).
pub fn quote_bracket(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("[{}]", name.replace(']', "]]")))
}

/// Render `schema.table` with the given quoting function.
pub fn qualify(table: &TableRef, quote: impl Fn(&str) -> Result<String>) -> Result<String> {
    match &table.schema {
        Some(schema) => Ok(format!("{}.{}", quote(schema)?, quote(&table.name)?)),
        None => quote(&table.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_styles() {
        assert_eq!(quote_double("users").unwrap(), "\"users\"");
        assert_eq!(quote_double("a\"b").unwrap(), "\"a\"\"b\"");
        assert_eq!(quote_backtick("a`b").unwrap(), "`a``b`");
        assert_eq!(quote_bracket("a]b").unwrap(), "[a]]b]");
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        assert!(quote_double("").is_err());
        assert!(quote_backtick("a\0b").is_err());
        assert!(quote_bracket(&"x".repeat(129)).is_err());
        assert!(quote_bracket(&"x".repeat(128)).is_ok());
    }

    #[test]
    fn test_qualify() {
        let t = TableRef::qualified("dbo", "orders");
        assert_eq!(qualify(&t, quote_bracket).unwrap(), "[dbo].[orders]");
        assert_eq!(qualify(&TableRef::new("orders"), quote_double).unwrap(), "\"orders\"");
    }
}
