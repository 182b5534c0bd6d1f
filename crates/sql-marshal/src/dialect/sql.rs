//! Statement builders shared by the dialects.

use crate::core::column::TableRef;
use crate::dialect::Dialect;
use crate::error::{MarshalError, Result};

/// Quote every column name.
pub fn quoted_columns<D: Dialect + ?Sized>(dialect: &D, columns: &[String]) -> Result<Vec<String>> {
    columns.iter().map(|c| dialect.quote_ident(c)).collect()
}

/// Placeholders `1..=n` in the dialect's style.
pub fn placeholders<D: Dialect + ?Sized>(dialect: &D, count: usize) -> Vec<String> {
    (1..=count).map(|i| dialect.placeholder(i)).collect()
}

/// `INSERT INTO t (a, b) VALUES (?, ?)`.
pub fn insert<D: Dialect + ?Sized>(dialect: &D, table: &TableRef, columns: &[String]) -> Result<String> {
    if columns.is_empty() {
        return Err(MarshalError::Config("insert needs at least one column".into()));
    }
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.qualify_table(table)?,
        quoted_columns(dialect, columns)?.join(", "),
        placeholders(dialect, columns.len()).join(", ")
    ))
}

/// Check upsert keys and split columns into keys and updatable columns.
pub fn split_keys<'a>(columns: &'a [String], keys: &[String]) -> Result<(Vec<&'a String>, Vec<&'a String>)> {
    if keys.is_empty() {
        return Err(MarshalError::Config("upsert needs at least one key column".into()));
    }
    for key in keys {
        if !columns.iter().any(|c| c.eq_ignore_ascii_case(key)) {
            return Err(MarshalError::Config(format!(
                "upsert key '{}' is not one of the written columns",
                key
            )));
        }
    }
    Ok(columns
        .iter()
        .partition(|c| keys.iter().any(|k| k.eq_ignore_ascii_case(c))))
}

/// `MERGE INTO t USING <source> ON (...) WHEN MATCHED ... WHEN NOT MATCHED ...`.
///
/// `source` is the complete `USING` operand including its `src` alias. The
/// key columns decide matching; every other column is updated.
pub fn merge<D: Dialect + ?Sized>(
    dialect: &D,
    table: &TableRef,
    columns: &[String],
    keys: &[String],
    source: &str,
) -> Result<String> {
    let (key_cols, value_cols) = split_keys(columns, keys)?;
    let on = key_cols
        .iter()
        .map(|c| {
            let q = dialect.quote_ident(c)?;
            Ok(format!("tgt.{q} = src.{q}"))
        })
        .collect::<Result<Vec<_>>>()?
        .join(" AND ");

    let mut sql = format!(
        "MERGE INTO {} tgt USING {} ON ({})",
        dialect.qualify_table(table)?,
        source,
        on
    );
    if !value_cols.is_empty() {
        let set = value_cols
            .iter()
            .map(|c| {
                let q = dialect.quote_ident(c)?;
                Ok(format!("tgt.{q} = src.{q}"))
            })
            .collect::<Result<Vec<_>>>()?
            .join(", ");
        sql.push_str(&format!(" WHEN MATCHED THEN UPDATE SET {}", set));
    }
    let quoted = quoted_columns(dialect, columns)?;
    let src_cols: Vec<String> = quoted.iter().map(|q| format!("src.{q}")).collect();
    sql.push_str(&format!(
        " WHEN NOT MATCHED THEN INSERT ({}) VALUES ({})",
        quoted.join(", "),
        src_cols.join(", ")
    ));
    Ok(sql)
}

/// `SELECT p1 AS "a", p2 AS "b"` projection used as a MERGE source.
pub fn select_placeholders<D: Dialect + ?Sized>(dialect: &D, columns: &[String]) -> Result<String> {
    let quoted = quoted_columns(dialect, columns)?;
    let items: Vec<String> = quoted
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{} AS {}", dialect.placeholder(i + 1), q))
        .collect();
    Ok(format!("SELECT {}", items.join(", ")))
}

/// Append `key=value` arguments with the given separators.
pub fn append_arguments<'a>(
    out: &mut String,
    args: impl IntoIterator<Item = (&'a String, &'a String)>,
    first_sep: &str,
    sep: &str,
) {
    let mut first = true;
    for (k, v) in args {
        out.push_str(if first { first_sep } else { sep });
        first = false;
        out.push_str(k);
        out.push('=');
        out.push_str(v);
    }
}
