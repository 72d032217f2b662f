use crate::error::{Result, SqlRsError};
use crate::format::format_to_sql;
use crate::types::{RawQueryResult, SqlValue};

/// Trait for database driver implementations.
///
/// A driver owns exactly one engine connection and only knows how to run
/// literal SQL. Parameter formatting, the cardinality protocol and the
/// affected-row check live in [`crate::SqlRsClient`], so every driver gets
/// identical semantics from them.
///
/// Drivers:
/// - Connect to and disconnect from the engine
/// - Run literal SQL and convert rows to [`RawQueryResult`]
/// - Report affected-row counts and reclassify duplicate-key violations
pub trait DatabaseDriver: Send {
    /// Short name of the engine, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Open the connection. Called once at construction and by reconnect.
    fn connect(&mut self) -> Result<()>;

    /// Release the connection. A no-op when not connected.
    fn close(&mut self) -> Result<()>;

    /// Run a literal read statement.
    fn query(&mut self, sql: &str) -> Result<RawQueryResult>;

    /// Run a literal mutating statement, returning the affected-row count.
    fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Run `template` with `params` bound by the engine.
    ///
    /// Implementations must derive native placeholders from `template`
    /// itself. The default formats to literal SQL instead.
    fn execute_params(&mut self, template: &str, params: &[SqlValue]) -> Result<u64> {
        let sql = format_to_sql(template, params)?;
        self.execute(&sql)
    }

    /// Run a literal insert and return the identity the engine generated.
    ///
    /// Engines that rely on sequences refuse without running anything;
    /// callers fetch the next value and insert with two statements.
    fn insert(&mut self, _sql: &str) -> Result<i64> {
        Err(SqlRsError::UnsupportedOperation(format!(
            "{} uses sequences; fetch the next value and insert with two statements",
            self.name()
        )))
    }

    fn begin(&mut self) -> Result<()> {
        self.execute("BEGIN").map(|_| ())
    }

    fn commit(&mut self) -> Result<()> {
        self.execute("COMMIT").map(|_| ())
    }

    fn rollback(&mut self) -> Result<()> {
        self.execute("ROLLBACK").map(|_| ())
    }
}
