use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};

use crate::config::ConnectionConfig;
use crate::error::{is_duplicate_key_message, Result, SqlRsError};
use crate::format::check_count;
use crate::traits::DatabaseDriver;
use crate::types::{RawQueryResult, SqlValue};

const IN_MEMORY: &str = ":memory:";

/// SQLite driver implementation using rusqlite.
///
/// The URI path is the database file; `sqlite::memory:` opens a private
/// in-memory database, which does not survive a reconnect.
pub struct SqliteDriver {
    path: String,
    conn: Option<Connection>,
}

impl SqliteDriver {
    /// Open the database named by the configuration's path.
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        Self::open(&config.path)
    }

    pub fn open(path: &str) -> Result<Self> {
        let mut driver = Self {
            path: path.to_string(),
            conn: None,
        };
        DatabaseDriver::connect(&mut driver)?;
        Ok(driver)
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| SqlRsError::ConnectionError("sqlite connection is closed".to_string()))
    }
}

impl DatabaseDriver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn connect(&mut self) -> Result<()> {
        let conn = if self.path.is_empty() || self.path == IN_MEMORY {
            Connection::open_in_memory()
        } else {
            Connection::open(&self.path)
        }
        .map_err(|e| SqlRsError::ConnectionError(format!("{}: {}", self.path, e)))?;

        tracing::debug!(path = %self.path, "sqlite connection opened");
        self.conn = Some(conn);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| SqlRsError::Sqlite(e))?;
            tracing::debug!(path = %self.path, "sqlite connection closed");
        }
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<RawQueryResult> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(classify)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([]).map_err(classify)?;
        let mut result_rows = Vec::new();
        while let Some(row) = rows.next().map_err(classify)? {
            let values = (0..columns.len())
                .map(|i| row.get_ref(i).map(value_ref_to_sql_value))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            result_rows.push(values);
        }

        Ok(RawQueryResult::new(columns, result_rows))
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        let changed = self.conn()?.execute(sql, []).map_err(classify)?;
        Ok(changed as u64)
    }

    /// Binds with SQLite's own `?` markers, taken from the template as given.
    fn execute_params(&mut self, template: &str, params: &[SqlValue]) -> Result<u64> {
        check_count(template, params.len())?;
        let changed = self
            .conn()?
            .execute(template, params_from_iter(params.iter()))
            .map_err(classify)?;
        Ok(changed as u64)
    }

    fn insert(&mut self, sql: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(sql, []).map_err(classify)?;
        Ok(conn.last_insert_rowid())
    }
}

/// Reclassifies unique and primary-key violations as `DuplicateKey`.
fn classify(err: rusqlite::Error) -> SqlRsError {
    let duplicate = match &err {
        rusqlite::Error::SqliteFailure(e, message) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || message.as_deref().is_some_and(is_duplicate_key_message)
        }
        _ => false,
    };

    if duplicate {
        SqlRsError::DuplicateKey(err.to_string())
    } else {
        SqlRsError::Sqlite(err)
    }
}

fn value_ref_to_sql_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Int64(i),
        ValueRef::Real(f) => SqlValue::Float(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            SqlValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let output = match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::Int32(i) => ToSqlOutput::Owned(Value::Integer(i64::from(*i))),
            SqlValue::Int64(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SqlValue::Float(f) => ToSqlOutput::Owned(Value::Real(*f)),
            SqlValue::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
            SqlValue::Date(_) | SqlValue::DateTime(_) => {
                ToSqlOutput::Owned(Value::Text(self.to_bind_text().unwrap_or_default()))
            }
        };
        Ok(output)
    }
}
