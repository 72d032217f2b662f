use thiserror::Error;

/// Error type for sqlrs operations.
///
/// The first seven variants form the contract every driver honors under the
/// same conditions. Engine errors that are not reclassified pass through as
/// [`SqlRsError::Postgres`] or [`SqlRsError::Sqlite`].
#[derive(Debug, Error)]
pub enum SqlRsError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("No data found")]
    NoDataFound,

    #[error("Too many rows: expected 1, got {0}")]
    TooManyRows(usize),

    #[error("Unsupported parameter type, {type_name}, for sql, {template}")]
    UnsupportedParameterType { type_name: String, template: String },

    #[error("Expected affected rows, {expected}, Actual affected rows, {actual}")]
    AffectedRowMismatch { expected: u64, actual: u64 },

    #[error("Template has {markers} placeholder(s) but {params} parameter(s) were supplied")]
    ParameterCountMismatch { markers: usize, params: usize },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Scheme, {0}, not recognised when configuring db connection")]
    UnsupportedScheme(String),

    #[error("Invalid connection uri: {0}")]
    InvalidUri(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("No canned result registered for sql: {0}")]
    SqlNotMatched(String),

    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type alias for sqlrs operations
pub type Result<T> = std::result::Result<T, SqlRsError>;

const DUPLICATE_KEY_MESSAGES: &[&str] = &[
    "duplicate key value violates unique constraint",
    "UNIQUE constraint failed",
];

/// Returns true when an engine error message reports a unique-constraint
/// violation.
pub(crate) fn is_duplicate_key_message(message: &str) -> bool {
    DUPLICATE_KEY_MESSAGES
        .iter()
        .any(|needle| message.contains(needle))
}
