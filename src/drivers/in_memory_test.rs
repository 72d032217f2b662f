use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::{Result, SqlRsError};
use crate::format::format_to_sql;
use crate::traits::DatabaseDriver;
use crate::types::{RawQueryResult, SqlValue};

/// A recorded statement for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

#[derive(Default)]
struct State {
    results: HashMap<String, RawQueryResult>,
    affected: HashMap<String, u64>,
    queue: VecDeque<RawQueryResult>,
    recorded: Vec<RecordedQuery>,
    transactions: Vec<&'static str>,
    connected: bool,
}

/// An in-memory database driver for testing.
///
/// Canned results are keyed by the exact literal SQL the client produces,
/// so registering with [`InMemoryTestDriver::with_sql_params`] exercises
/// the real formatter. Reads with no keyed result fall back to a FIFO queue;
/// anything else fails `SqlNotMatched`.
///
/// Clones share state, so a test can keep a handle after boxing one into a
/// client.
///
/// # Example
/// ```
/// use sqlrs::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
/// use sqlrs::SqlRsClient;
///
/// let driver = InMemoryTestDriver::new().with_sql(
///     "SELECT id, name FROM users WHERE id = 1",
///     InMemoryTestResponseBuilder::new()
///         .columns(&["id", "name"])
///         .row(&["1", "Alice"])
///         .build(),
/// );
/// let mut db = SqlRsClient::with_driver(Box::new(driver.clone()));
/// let name = db
///     .query_for_array("SELECT id, name FROM users WHERE id = ?", &[1.into()])
///     .unwrap();
/// assert_eq!(name.get("name").unwrap().as_str(), Some("Alice"));
/// driver.assert_query_count(1);
/// ```
#[derive(Clone)]
pub struct InMemoryTestDriver {
    state: Arc<Mutex<State>>,
}

impl InMemoryTestDriver {
    /// Create a new in-memory test driver with no canned results.
    pub fn new() -> Self {
        let state = State {
            connected: true,
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Return `result` whenever exactly `sql` is queried.
    pub fn with_sql(self, sql: &str, result: RawQueryResult) -> Self {
        self.state
            .lock()
            .unwrap()
            .results
            .insert(sql.to_string(), result);
        self
    }

    /// Like [`InMemoryTestDriver::with_sql`], keyed by the literal SQL that
    /// `template` and `params` format to.
    pub fn with_sql_params(
        self,
        template: &str,
        params: &[SqlValue],
        result: RawQueryResult,
    ) -> Result<Self> {
        let sql = format_to_sql(template, params)?;
        Ok(self.with_sql(&sql, result))
    }

    /// Report `affected` rows whenever exactly `sql` is executed.
    pub fn with_execute(self, sql: &str, affected: u64) -> Self {
        self.state
            .lock()
            .unwrap()
            .affected
            .insert(sql.to_string(), affected);
        self
    }

    /// Add a response to be returned by the next unmatched query.
    /// Responses are returned in FIFO order.
    pub fn with_response(self, response: RawQueryResult) -> Self {
        self.state.lock().unwrap().queue.push_back(response);
        self
    }

    /// Add multiple responses to be returned by subsequent unmatched queries.
    pub fn with_responses(self, responses: impl IntoIterator<Item = RawQueryResult>) -> Self {
        self.state.lock().unwrap().queue.extend(responses);
        self
    }

    /// Get all recorded statements that have been run.
    pub fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.state.lock().unwrap().recorded.clone()
    }

    /// Get the last recorded statement, if any.
    pub fn last_query(&self) -> Option<RecordedQuery> {
        self.state.lock().unwrap().recorded.last().cloned()
    }

    /// Transaction calls seen so far: `BEGIN`, `COMMIT`, `ROLLBACK`.
    pub fn transactions(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().transactions.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    /// Assert that the last statement matches the expected SQL and parameters.
    pub fn assert_last_query(&self, expected_sql: &str, expected_params: &[SqlValue]) {
        let last = self.last_query().expect("No queries were recorded");
        assert_eq!(
            last.sql, expected_sql,
            "SQL mismatch.\nExpected: {}\nActual: {}",
            expected_sql, last.sql
        );
        assert_eq!(
            last.params, expected_params,
            "Parameters mismatch.\nExpected: {:?}\nActual: {:?}",
            expected_params, last.params
        );
    }

    /// Assert that exactly n statements were run.
    pub fn assert_query_count(&self, expected: usize) {
        let actual = self.state.lock().unwrap().recorded.len();
        assert_eq!(
            actual, expected,
            "Query count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }

    fn record(&self, sql: &str, params: &[SqlValue]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            return Err(SqlRsError::ConnectionError("mock connection is closed".to_string()));
        }
        state.recorded.push(RecordedQuery {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        Ok(())
    }

    fn affected_rows(&self, key: &str) -> Result<u64> {
        self.state
            .lock()
            .unwrap()
            .affected
            .get(key)
            .copied()
            .ok_or_else(|| SqlRsError::SqlNotMatched(key.to_string()))
    }

    fn transaction(&self, command: &'static str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            return Err(SqlRsError::ConnectionError("mock connection is closed".to_string()));
        }
        state.transactions.push(command);
        Ok(())
    }
}

impl Default for InMemoryTestDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseDriver for InMemoryTestDriver {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn connect(&mut self) -> Result<()> {
        self.state.lock().unwrap().connected = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state.lock().unwrap().connected = false;
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<RawQueryResult> {
        self.record(sql, &[])?;

        let mut state = self.state.lock().unwrap();
        if let Some(result) = state.results.get(sql) {
            return Ok(result.clone());
        }
        state
            .queue
            .pop_front()
            .ok_or_else(|| SqlRsError::SqlNotMatched(sql.to_string()))
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        self.record(sql, &[])?;
        self.affected_rows(sql)
    }

    /// Records the template and bound values; canned counts are looked up by
    /// the template.
    fn execute_params(&mut self, template: &str, params: &[SqlValue]) -> Result<u64> {
        self.record(template, params)?;
        self.affected_rows(template)
    }

    fn begin(&mut self) -> Result<()> {
        self.transaction("BEGIN")
    }

    fn commit(&mut self) -> Result<()> {
        self.transaction("COMMIT")
    }

    fn rollback(&mut self) -> Result<()> {
        self.transaction("ROLLBACK")
    }
}

/// Builder for creating test responses easily.
pub struct InMemoryTestResponseBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl InMemoryTestResponseBuilder {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Set the column names for the response.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a row of text values.
    pub fn row(mut self, values: &[&str]) -> Self {
        self.rows
            .push(values.iter().map(|s| SqlValue::from(*s)).collect());
        self
    }

    /// Add a row of typed values.
    pub fn values(mut self, values: Vec<SqlValue>) -> Self {
        self.rows.push(values);
        self
    }

    /// Build the RawQueryResult.
    pub fn build(self) -> RawQueryResult {
        RawQueryResult::new(self.columns, self.rows)
    }
}

impl Default for InMemoryTestResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
