use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{Result, SqlRsError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f %z";

/// Represents a SQL parameter value in a driver-agnostic way.
///
/// Parameters are rendered into SQL literal text by [`SqlValue::to_sql_literal`];
/// drivers that bind natively convert them to their own types instead. The
/// same type carries column values back out of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int32(i32),
    Int64(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl SqlValue {
    /// Renders this value as SQL literal text.
    ///
    /// Text is single-quoted with embedded quotes doubled. Dates render as
    /// `'YYYY-MM-DD'` and date-times as `'YYYY-MM-DD HH:MM:SS.ffffff +ZZZZ'`.
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Text(s) => quote(s),
            SqlValue::Int32(i) => i.to_string(),
            SqlValue::Int64(i) => i.to_string(),
            SqlValue::Float(f) => float_literal(*f),
            SqlValue::Bool(b) => b.to_string(),
            SqlValue::Date(d) => quote(&d.format(DATE_FORMAT).to_string()),
            SqlValue::DateTime(dt) => quote(&dt.format(DATETIME_FORMAT).to_string()),
        }
    }

    /// Unquoted text form, used when a driver binds a value as a string.
    /// `None` for `Null`.
    pub(crate) fn to_bind_text(&self) -> Option<String> {
        match self {
            SqlValue::Null => None,
            SqlValue::Text(s) => Some(s.clone()),
            SqlValue::Int32(i) => Some(i.to_string()),
            SqlValue::Int64(i) => Some(i.to_string()),
            SqlValue::Float(f) => Some(float_text(*f)),
            SqlValue::Bool(b) => Some(b.to_string()),
            SqlValue::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
            SqlValue::DateTime(dt) => Some(dt.format(DATETIME_FORMAT).to_string()),
        }
    }

    /// Stable lowercase name of the variant, used in diagnostics and errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Text(_) => "text",
            SqlValue::Int32(_) => "int32",
            SqlValue::Int64(_) => "int64",
            SqlValue::Float(_) => "float",
            SqlValue::Bool(_) => "bool",
            SqlValue::Date(_) => "date",
            SqlValue::DateTime(_) => "datetime",
        }
    }

    /// Converts a loosely-typed JSON value into a parameter.
    ///
    /// Arrays and objects have no literal form and fail with
    /// [`SqlRsError::UnsupportedParameterType`], naming `template` so the
    /// offending call can be found.
    pub fn from_json(value: &serde_json::Value, template: &str) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::Bool(b) => Ok(SqlValue::Bool(*b)),
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(SqlValue::Int64(i)),
                None => n.as_f64().map(SqlValue::Float).ok_or_else(|| {
                    SqlRsError::UnsupportedParameterType {
                        type_name: "number".to_string(),
                        template: template.to_string(),
                    }
                }),
            },
            Value::Array(_) => Err(SqlRsError::UnsupportedParameterType {
                type_name: "array".to_string(),
                template: template.to_string(),
            }),
            Value::Object(_) => Err(SqlRsError::UnsupportedParameterType {
                type_name: "object".to_string(),
                template: template.to_string(),
            }),
        }
    }

    /// Converts a list of JSON values, failing on the first unsupported one.
    pub fn from_json_list(values: &[serde_json::Value], template: &str) -> Result<Vec<Self>> {
        values
            .iter()
            .map(|v| SqlValue::from_json(v, template))
            .collect()
    }

    /// Returns the text content, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64.
    /// Text is parsed, since some engines return every column as text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int32(i) => Some(i64::from(*i)),
            SqlValue::Int64(i) => Some(*i),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn float_literal(f: f64) -> String {
    if f.is_finite() {
        float_text(f)
    } else {
        quote(&float_text(f))
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        // Debug keeps the fractional part: 1.0 stays "1.0", not "1".
        format!("{:?}", f)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int32(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int64(value)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Int64(i64::from(value))
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float(f64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<DateTime<FixedOffset>> for SqlValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        SqlValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::DateTime(value.into())
    }
}

/// Naive date-times are taken to be UTC.
impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::DateTime(Utc.from_utc_datetime(&value).into())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}
