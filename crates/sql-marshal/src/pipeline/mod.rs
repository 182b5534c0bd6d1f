//! Per-task glue around the marshallers.
//!
//! - [`SourceTask`] / [`RecordStream`]: cursor rows to canonical records
//! - [`SinkTask`] / [`SinkWriter`]: canonical records to batched statements
//! - [`run_init_queries`]: per-connection session setup
//!
//! A task owns its cursor or executor. Dropping a task releases them on
//! every path, including early returns on error.

mod session;
mod sink;
mod source;

pub use session::run_init_queries;
pub use sink::{SinkPlan, SinkStats, SinkTask, SinkWriter};
pub use source::{RecordStream, SourceTask};
