mod in_memory_test;
mod sqlite;
mod tokio_postgres;

pub use self::in_memory_test::{InMemoryTestDriver, InMemoryTestResponseBuilder, RecordedQuery};
pub use self::sqlite::SqliteDriver;
pub use self::tokio_postgres::{postgres_config, TokioPostgresDriver};
