//! Session setup.

use tracing::debug;

use crate::core::traits::SqlSession;
use crate::error::{MarshalError, Result};

/// Execute each init query once, in order, on a fresh session.
///
/// `connection` is the redacted connection description used in errors.
pub async fn run_init_queries<S: SqlSession + ?Sized>(
    session: &mut S,
    queries: &[String],
    connection: &str,
) -> Result<()> {
    for (i, query) in queries.iter().enumerate() {
        debug!("Running init query {}/{}", i + 1, queries.len());
        session.execute(query).await.map_err(|e| {
            MarshalError::connectivity(connection, format!("init query {} failed: {}", i + 1, e))
        })?;
    }
    Ok(())
}
