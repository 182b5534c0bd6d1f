//! Standard SQL type codes.
//!
//! Codes follow the JDBC `java.sql.Types` numbering, which most drivers (and
//! driver metadata shims) report. Vendor-specific codes live with their
//! dialect under `drivers/`.

/// SQL type code as reported by driver column metadata.
pub type SqlTypeCode = i32;

pub const BIT: SqlTypeCode = -7;
pub const TINYINT: SqlTypeCode = -6;
pub const SMALLINT: SqlTypeCode = 5;
pub const INTEGER: SqlTypeCode = 4;
pub const BIGINT: SqlTypeCode = -5;
pub const FLOAT: SqlTypeCode = 6;
pub const REAL: SqlTypeCode = 7;
pub const DOUBLE: SqlTypeCode = 8;
pub const NUMERIC: SqlTypeCode = 2;
pub const DECIMAL: SqlTypeCode = 3;
pub const CHAR: SqlTypeCode = 1;
pub const VARCHAR: SqlTypeCode = 12;
pub const LONGVARCHAR: SqlTypeCode = -1;
pub const DATE: SqlTypeCode = 91;
pub const TIME: SqlTypeCode = 92;
pub const TIMESTAMP: SqlTypeCode = 93;
pub const BINARY: SqlTypeCode = -2;
pub const VARBINARY: SqlTypeCode = -3;
pub const LONGVARBINARY: SqlTypeCode = -4;
pub const NULL: SqlTypeCode = 0;
pub const OTHER: SqlTypeCode = 1111;
pub const JAVA_OBJECT: SqlTypeCode = 2000;
pub const DISTINCT: SqlTypeCode = 2001;
pub const STRUCT: SqlTypeCode = 2002;
pub const ARRAY: SqlTypeCode = 2003;
pub const BLOB: SqlTypeCode = 2004;
pub const CLOB: SqlTypeCode = 2005;
pub const REF: SqlTypeCode = 2006;
pub const DATALINK: SqlTypeCode = 70;
pub const BOOLEAN: SqlTypeCode = 16;
pub const ROWID: SqlTypeCode = -8;
pub const NCHAR: SqlTypeCode = -15;
pub const NVARCHAR: SqlTypeCode = -9;
pub const LONGNVARCHAR: SqlTypeCode = -16;
pub const NCLOB: SqlTypeCode = 2011;
pub const SQLXML: SqlTypeCode = 2009;
pub const REF_CURSOR: SqlTypeCode = 2012;
pub const TIME_WITH_TIMEZONE: SqlTypeCode = 2013;
pub const TIMESTAMP_WITH_TIMEZONE: SqlTypeCode = 2014;

/// Character types that map onto canonical STRING.
pub const STRING_TYPES: &[SqlTypeCode] = &[
    CHAR,
    VARCHAR,
    LONGVARCHAR,
    NCHAR,
    NVARCHAR,
    LONGNVARCHAR,
    CLOB,
    NCLOB,
];

/// Binary types that map onto canonical BYTES.
pub const BINARY_TYPES: &[SqlTypeCode] = &[BINARY, VARBINARY, LONGVARBINARY, BLOB];

/// Check if a code is one of the character types.
pub fn is_string_type(code: SqlTypeCode) -> bool {
    STRING_TYPES.contains(&code)
}

/// Check if a code is one of the binary types.
pub fn is_binary_type(code: SqlTypeCode) -> bool {
    BINARY_TYPES.contains(&code)
}

/// Check if a code is fixed-point numeric.
pub fn is_fixed_point(code: SqlTypeCode) -> bool {
    code == NUMERIC || code == DECIMAL
}

/// Name of a standard type code, for diagnostics.
pub fn type_code_name(code: SqlTypeCode) -> Option<&'static str> {
    let name = match code {
        BIT => "BIT",
        TINYINT => "TINYINT",
        SMALLINT => "SMALLINT",
        INTEGER => "INTEGER",
        BIGINT => "BIGINT",
        FLOAT => "FLOAT",
        REAL => "REAL",
        DOUBLE => "DOUBLE",
        NUMERIC => "NUMERIC",
        DECIMAL => "DECIMAL",
        CHAR => "CHAR",
        VARCHAR => "VARCHAR",
        LONGVARCHAR => "LONGVARCHAR",
        DATE => "DATE",
        TIME => "TIME",
        TIMESTAMP => "TIMESTAMP",
        BINARY => "BINARY",
        VARBINARY => "VARBINARY",
        LONGVARBINARY => "LONGVARBINARY",
        NULL => "NULL",
        OTHER => "OTHER",
        JAVA_OBJECT => "JAVA_OBJECT",
        DISTINCT => "DISTINCT",
        STRUCT => "STRUCT",
        ARRAY => "ARRAY",
        BLOB => "BLOB",
        CLOB => "CLOB",
        REF => "REF",
        DATALINK => "DATALINK",
        BOOLEAN => "BOOLEAN",
        ROWID => "ROWID",
        NCHAR => "NCHAR",
        NVARCHAR => "NVARCHAR",
        LONGNVARCHAR => "LONGNVARCHAR",
        NCLOB => "NCLOB",
        SQLXML => "SQLXML",
        REF_CURSOR => "REF_CURSOR",
        TIME_WITH_TIMEZONE => "TIME_WITH_TIMEZONE",
        TIMESTAMP_WITH_TIMEZONE => "TIMESTAMP_WITH_TIMEZONE",
        _ => return None,
    };
    Some(name)
}
