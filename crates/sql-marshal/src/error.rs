//! Error types for the marshalling layer.

use thiserror::Error;

use crate::dialect::Incompatibility;

/// Main error type for schema mapping and record marshalling.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Column metadata could not be mapped to any canonical type.
    #[error("Schema inference failed for column '{column}': {message}")]
    SchemaInference { column: String, message: String },

    /// A canonical schema broke one of its own invariants (duplicate names, etc.)
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A row value could not be converted into its canonical field.
    #[error("Failed to read column '{column}': {message}")]
    DataRead { column: String, message: String },

    /// A canonical value was rejected while binding it to a statement.
    #[error("Failed to write column '{column}': {message}")]
    DataWrite { column: String, message: String },

    /// The schema is not write-compatible with the target table.
    #[error("{}", format_incompatibilities(.0))]
    Validation(Vec<Incompatibility>),

    /// Table introspection, session setup, or connection failed.
    #[error("Connectivity error for {connection}: {message}")]
    Connectivity { connection: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error reported by a driver-side collaborator (cursor, statement, session).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    /// Driver message.
    pub message: String,
    /// SQLSTATE code, when the driver provides one.
    pub sql_state: Option<String>,
}

impl DriverError {
    /// Create a driver error without a SQLSTATE.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql_state: None,
        }
    }

    /// Attach a SQLSTATE code.
    pub fn with_sql_state(mut self, state: impl Into<String>) -> Self {
        self.sql_state = Some(state.into());
        self
    }
}

impl MarshalError {
    /// Create a SchemaInference error.
    pub fn schema_inference(column: impl Into<String>, message: impl Into<String>) -> Self {
        MarshalError::SchemaInference {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a DataRead error.
    pub fn data_read(column: impl Into<String>, message: impl Into<String>) -> Self {
        MarshalError::DataRead {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a DataWrite error.
    pub fn data_write(column: impl Into<String>, message: impl Into<String>) -> Self {
        MarshalError::DataWrite {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a Connectivity error. `connection` must already be redacted.
    pub fn connectivity(connection: impl Into<String>, message: impl Into<String>) -> Self {
        MarshalError::Connectivity {
            connection: connection.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            MarshalError::Config(_)
            | MarshalError::InvalidSchema(_)
            | MarshalError::Yaml(_)
            | MarshalError::Json(_) => 1,
            MarshalError::SchemaInference { .. } => 2,
            MarshalError::Validation(_) => 3,
            MarshalError::DataRead { .. } | MarshalError::DataWrite { .. } => 4,
            MarshalError::Connectivity { .. } => 5,
            MarshalError::Io(_) => 7,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

fn format_incompatibilities(items: &[Incompatibility]) -> String {
    let mut out = format!(
        "Schema is not compatible with the target table ({} problem(s)):",
        items.len()
    );
    for item in items {
        out.push_str("\n  - ");
        out.push_str(&item.to_string());
    }
    out
}

/// Result type alias for marshalling operations.
pub type Result<T> = std::result::Result<T, MarshalError>;

/// Result type alias for driver collaborator calls.
pub type DriverResult<T> = std::result::Result<T, DriverError>;
