//! PostgreSQL family: PostgreSQL, Aurora PostgreSQL and CloudSQL PostgreSQL.
//!
//! - [`PostgresDialect`]: quoting, `$n` placeholders, `ON CONFLICT` upserts
//! - schema overrides: server-cast types (interval, uuid, json/jsonb, inet,
//!   PostGIS geometry, `bit`, `timetz`, `money`) as STRING, `timestamptz`
//! - record overrides: text bound with an untyped target so the server casts

mod dialect;
mod record;
mod schema;

pub use dialect::PostgresDialect;
