//! Dynamically typed values and rows exchanged with the store.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use duckdb::types::{TimeUnit, Value as DuckValue};
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    TextList(Vec<String>),
}

impl Value {
    /// Render the value as a DuckDB SQL literal.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::Text(s) => quote_literal(s),
            Value::Timestamp(ts) => {
                format!("TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.6f"))
            }
            Value::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
            Value::TextList(items) if items.is_empty() => "[]::VARCHAR[]".to_string(),
            Value::TextList(items) => {
                let inner: Vec<String> = items.iter().map(|s| quote_literal(s)).collect();
                format!("[{}]", inner.join(", "))
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::TextList(items) => Some(items),
            _ => None,
        }
    }

    /// Convert a DuckDB value read from a result set.
    pub fn from_duckdb(value: DuckValue) -> Self {
        match value {
            DuckValue::Null => Value::Null,
            DuckValue::Boolean(b) => Value::Bool(b),
            DuckValue::TinyInt(n) => Value::Int(i64::from(n)),
            DuckValue::SmallInt(n) => Value::Int(i64::from(n)),
            DuckValue::Int(n) => Value::Int(i64::from(n)),
            DuckValue::BigInt(n) => Value::Int(n),
            DuckValue::HugeInt(n) => i64::try_from(n)
                .map(Value::Int)
                .unwrap_or_else(|_| Value::Text(n.to_string())),
            DuckValue::UTinyInt(n) => Value::Int(i64::from(n)),
            DuckValue::USmallInt(n) => Value::Int(i64::from(n)),
            DuckValue::UInt(n) => Value::Int(i64::from(n)),
            DuckValue::UBigInt(n) => i64::try_from(n)
                .map(Value::Int)
                .unwrap_or_else(|_| Value::Text(n.to_string())),
            DuckValue::Float(f) => Value::Float(f64::from(f)),
            DuckValue::Double(f) => Value::Float(f),
            DuckValue::Decimal(d) => {
                let text = d.to_string();
                text.parse::<f64>()
                    .map(Value::Float)
                    .unwrap_or(Value::Text(text))
            }
            DuckValue::Timestamp(unit, raw) => {
                let micros = match unit {
                    TimeUnit::Second => raw.saturating_mul(1_000_000),
                    TimeUnit::Millisecond => raw.saturating_mul(1_000),
                    TimeUnit::Microsecond => raw,
                    TimeUnit::Nanosecond => raw / 1_000,
                };
                DateTime::from_timestamp_micros(micros)
                    .map(|dt| Value::Timestamp(dt.naive_utc()))
                    .unwrap_or(Value::Null)
            }
            DuckValue::Date32(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
                .and_then(|epoch| {
                    epoch.checked_add_signed(chrono::Duration::days(i64::from(days)))
                })
                .map(Value::Date)
                .unwrap_or(Value::Null),
            DuckValue::Text(s) => Value::Text(s),
            DuckValue::Enum(s) => Value::Text(s),
            DuckValue::List(items) | DuckValue::Array(items) => Value::TextList(
                items
                    .into_iter()
                    .map(|item| match Value::from_duckdb(item) {
                        Value::Text(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other => Value::Text(format!("{other:?}")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::TextList(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::TextList(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One result row with its column names.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Text value of a column, `None` when absent, NULL or not text.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Look up a value by position.
    pub fn at(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Quote a string as a SQL literal, doubling embedded single quotes.
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote an identifier, doubling embedded double quotes.
pub fn quote_ident(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
