//! sql-marshal CLI - inspect dialect schema mappings without a live database.

use clap::{Parser, Subcommand};
use serde::Serialize;
use sql_marshal::core::registry::builtin;
use sql_marshal::{
    ColumnDescriptor, ColumnRemap, Config, Dialect, DialectKind, FieldsValidator, MarshalError,
    ReaderOptions, Schema, SchemaReader, TableRef, TimezonePolicy,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "sql-marshal")]
#[command(about = "Cross-dialect schema mapping and record marshalling")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported dialects
    Dialects,

    /// Infer the canonical schema of a column list
    Infer {
        /// Dialect tag (defaults to the configured connection dialect)
        #[arg(short, long, value_parser = parse_dialect)]
        dialect: Option<DialectKind>,

        /// YAML or JSON file with the column descriptors
        #[arg(long)]
        columns: PathBuf,

        /// Session id whose helper columns are skipped
        #[arg(long)]
        session_id: Option<String>,

        /// Timezone policy: preserve_offset or normalize_utc
        #[arg(long, value_parser = parse_timezone_policy)]
        timezone_policy: Option<TimezonePolicy>,
    },

    /// Check a canonical schema against table columns
    Validate {
        /// Dialect tag (defaults to the configured connection dialect)
        #[arg(short, long, value_parser = parse_dialect)]
        dialect: Option<DialectKind>,

        /// YAML or JSON schema file
        #[arg(long)]
        schema: PathBuf,

        /// YAML or JSON file with the table's column descriptors
        #[arg(long)]
        columns: PathBuf,

        /// Field to column remap, as field=column (repeatable)
        #[arg(long = "map", value_parser = parse_mapping)]
        mappings: Vec<(String, String)>,
    },

    /// Print the driver connection string for the configured connection
    ConnectionString {
        /// Include the password instead of masking it
        #[arg(long)]
        reveal: bool,
    },

    /// Print the random sampling query for a table
    SampleQuery {
        /// Dialect tag (defaults to the configured connection dialect)
        #[arg(short, long, value_parser = parse_dialect)]
        dialect: Option<DialectKind>,

        /// Table name (defaults to source.table)
        #[arg(long)]
        table: Option<String>,

        /// Schema qualifying the table (defaults to source.schema_name)
        #[arg(long)]
        schema_name: Option<String>,

        /// Number of rows to sample (defaults to source.sample_size, then 1000)
        #[arg(long)]
        limit: Option<u64>,
    },
}

#[derive(Serialize)]
struct DialectInfo {
    tag: &'static str,
    name: &'static str,
    default_port: u16,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), MarshalError> {
    let cli = Cli::parse();
    setup_logging(&cli.verbosity, &cli.log_format);

    let config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from {:?}", path);
            Some(config)
        }
        None => None,
    };

    match cli.command {
        Commands::Dialects => {
            let infos: Vec<DialectInfo> = DialectKind::ALL
                .iter()
                .map(|k| DialectInfo {
                    tag: k.tag(),
                    name: k.display_name(),
                    default_port: k.default_port(),
                })
                .collect();
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&infos)?);
            } else {
                for info in &infos {
                    println!("{:<18} {:<20} {}", info.tag, info.name, info.default_port);
                }
            }
        }

        Commands::Infer {
            dialect,
            columns,
            session_id,
            timezone_policy,
        } => {
            let kind = resolve_dialect(dialect, config.as_ref())?;
            let mut options = source_options(config.as_ref());
            if session_id.is_some() {
                options.session_id = session_id;
            }
            if let Some(policy) = timezone_policy {
                options.timezone_policy = policy;
            }
            let columns = read_columns(&columns)?;
            let schema = builtin(kind, options).infer_schema(&columns)?;

            if cli.output_json {
                println!("{}", schema.to_json()?);
            } else {
                println!("Schema ({} fields, {}):", schema.len(), kind.display_name());
                for field in schema.fields() {
                    let nullable = if field.nullable { " (nullable)" } else { "" };
                    println!("  {}: {}{}", field.name, field.type_name(), nullable);
                }
            }
        }

        Commands::Validate {
            dialect,
            schema,
            columns,
            mappings,
        } => {
            let kind = resolve_dialect(dialect, config.as_ref())?;
            let schema = read_schema(&schema)?;
            let columns = read_columns(&columns)?;
            let remap = if mappings.is_empty() {
                config
                    .as_ref()
                    .and_then(|c| c.sink.as_ref())
                    .map(|s| s.field_mapping.clone())
                    .unwrap_or_default()
            } else {
                mappings.into_iter().collect::<ColumnRemap>()
            };

            let dialect = builtin(kind, ReaderOptions::default());
            let problems = dialect.validate_remapped(&schema, &columns, &remap);
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&problems)?);
            }
            if !problems.is_empty() {
                return Err(MarshalError::Validation(problems));
            }
            if !cli.output_json {
                println!(
                    "Schema is compatible: {} fields against {} columns ({})",
                    schema.len(),
                    columns.len(),
                    kind.display_name()
                );
            }
        }

        Commands::ConnectionString { reveal } => {
            let config = config.ok_or_else(|| {
                MarshalError::Config("--config is required for connection-string".into())
            })?;
            let mut conn = config.connection.clone();
            if !reveal && !conn.password.is_empty() {
                conn.password = "REDACTED".to_string();
            }
            let dialect = builtin(conn.dialect, ReaderOptions::default());
            let dsn = dialect.connection_string(&conn)?;

            if cli.output_json {
                let out = serde_json::json!({
                    "dialect": conn.dialect.tag(),
                    "connection_string": dsn,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", dsn);
            }
        }

        Commands::SampleQuery {
            dialect,
            table,
            schema_name,
            limit,
        } => {
            let kind = resolve_dialect(dialect, config.as_ref())?;
            let source = config.as_ref().and_then(|c| c.source.as_ref());
            let name = table
                .or_else(|| source.and_then(|s| s.table.clone()))
                .ok_or_else(|| {
                    MarshalError::Config("--table is required when source.table is not set".into())
                })?;
            let table = TableRef {
                schema: schema_name.or_else(|| source.and_then(|s| s.schema_name.clone())),
                name,
            };
            let limit = limit
                .or_else(|| source.and_then(|s| s.sample_size))
                .unwrap_or(1000);
            if limit == 0 {
                return Err(MarshalError::Config("--limit must be at least 1".into()));
            }

            let query = builtin(kind, ReaderOptions::default()).random_sample_query(&table, limit)?;
            debug!("Sample query for {}: {}", table, query);
            if cli.output_json {
                let out = serde_json::json!({
                    "dialect": kind.tag(),
                    "table": table.to_string(),
                    "limit": limit,
                    "query": query,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", query);
            }
        }
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn parse_dialect(s: &str) -> Result<DialectKind, String> {
    s.parse().map_err(|e: MarshalError| e.to_string())
}

fn parse_timezone_policy(s: &str) -> Result<TimezonePolicy, String> {
    s.parse().map_err(|e: MarshalError| e.to_string())
}

fn parse_mapping(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, column)) if !field.trim().is_empty() && !column.trim().is_empty() => {
            Ok((field.trim().to_string(), column.trim().to_string()))
        }
        _ => Err(format!("expected field=column, got '{}'", s)),
    }
}

/// Explicit `--dialect`, else the configured connection's dialect.
fn resolve_dialect(explicit: Option<DialectKind>, config: Option<&Config>) -> Result<DialectKind, MarshalError> {
    explicit
        .or_else(|| config.map(|c| c.connection.dialect))
        .ok_or_else(|| MarshalError::Config("--dialect or --config is required".into()))
}

fn source_options(config: Option<&Config>) -> ReaderOptions {
    config
        .and_then(|c| c.source.as_ref())
        .map(|s| s.reader_options())
        .unwrap_or_default()
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_columns(path: &Path) -> Result<Vec<ColumnDescriptor>, MarshalError> {
    let content = std::fs::read_to_string(path)?;
    let columns: Vec<ColumnDescriptor> = if is_json(path) {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    if columns.is_empty() {
        return Err(MarshalError::Config(format!("{} lists no columns", path.display())));
    }
    Ok(columns)
}

fn read_schema(path: &Path) -> Result<Schema, MarshalError> {
    let content = std::fs::read_to_string(path)?;
    if is_json(path) {
        Schema::from_json(&content)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}
