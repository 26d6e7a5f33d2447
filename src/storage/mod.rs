//! Storage layer: schema plus the `SQLite` backend.

pub mod schema;
pub mod seed;
mod sqlite;

pub use schema::{CURRENT_SCHEMA_VERSION, SCHEMA_SQL, apply_schema, seed_reference_data};
pub use seed::{SeedSummary, seed_demo};
pub use sqlite::SqliteStorage;
