//! Result set decoding into untyped [`Record`]s.
//!
//! The decoder is written against [`RawRow`] rather than a driver row type, so any result
//! source that can name its columns and scan them works. `tokio_postgres::Row` implements it.

use crate::error::{DbError, DbResult};
use crate::value::{Record, Value};
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::types::{FromSql, Kind, Type};
use tokio_postgres::{Column, Row};

/// One scanned column before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A driver scalar that maps directly onto [`Value`]
    Scalar(Value),
    /// A byte sequence; decoded rows expose it as text
    Bytes(Vec<u8>),
}

impl RawValue {
    pub fn into_value(self) -> Value {
        match self {
            RawValue::Scalar(value) => value,
            RawValue::Bytes(bytes) => Value::Text(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        RawValue::Scalar(value)
    }
}

/// A row as seen by the decoder.
pub trait RawRow {
    /// Column names from the result metadata, in result order.
    fn column_names(&self) -> DbResult<Vec<String>>;

    /// Scan every column of the row, one slot per column.
    fn scan(&self) -> DbResult<Vec<RawValue>>;
}

/// Decode a result set.
///
/// Fail-fast: the first row whose columns cannot be named or scanned aborts decoding and no
/// partial result is returned.
pub fn decode_rows<R: RawRow>(rows: &[R]) -> DbResult<Vec<Record>> {
    let mut result = Vec::with_capacity(rows.len());
    for row in rows {
        result.push(decode_row(row)?);
    }
    Ok(result)
}

/// Decode a single row.
pub fn decode_row<R: RawRow>(row: &R) -> DbResult<Record> {
    let columns = row.column_names()?;
    let slots = row.scan()?;
    if slots.len() != columns.len() {
        return Err(DbError::decode(
            "*",
            format!(
                "scanned {} values for {} columns",
                slots.len(),
                columns.len()
            ),
        ));
    }

    let mut record = Record::with_capacity(columns.len());
    for (name, raw) in columns.into_iter().zip(slots) {
        record.insert(name, raw.into_value());
    }
    Ok(record)
}

impl RawRow for Row {
    fn column_names(&self) -> DbResult<Vec<String>> {
        Ok(self
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect())
    }

    fn scan(&self) -> DbResult<Vec<RawValue>> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| scan_column(self, idx, column))
            .collect()
    }
}

fn scan_column(row: &Row, idx: usize, column: &Column) -> DbResult<RawValue> {
    let value: Value = match *column.type_() {
        Type::BOOL => get::<bool>(row, idx, column)?.into(),
        Type::INT2 => get::<i16>(row, idx, column)?.map(i64::from).into(),
        Type::INT4 => get::<i32>(row, idx, column)?.map(i64::from).into(),
        Type::INT8 => get::<i64>(row, idx, column)?.into(),
        Type::OID => get::<u32>(row, idx, column)?.map(i64::from).into(),
        Type::FLOAT4 => get::<f32>(row, idx, column)?.map(f64::from).into(),
        Type::FLOAT8 => get::<f64>(row, idx, column)?.into(),
        Type::NUMERIC => get::<Decimal>(row, idx, column)?
            .map(|v| v.to_string())
            .into(),
        Type::BYTEA => {
            return Ok(match get::<Vec<u8>>(row, idx, column)? {
                Some(bytes) => RawValue::Bytes(bytes),
                None => RawValue::Scalar(Value::Null),
            });
        }
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, idx, column)?
            .map(|v| v.to_string())
            .into(),
        Type::UUID => get::<uuid::Uuid>(row, idx, column)?
            .map(|v| v.to_string())
            .into(),
        Type::DATE => get::<chrono::NaiveDate>(row, idx, column)?
            .map(|v| v.to_string())
            .into(),
        Type::TIME => get::<chrono::NaiveTime>(row, idx, column)?
            .map(|v| v.to_string())
            .into(),
        Type::TIMESTAMP => get::<chrono::NaiveDateTime>(row, idx, column)?
            .map(|v| v.to_string())
            .into(),
        Type::TIMESTAMPTZ => get::<chrono::DateTime<chrono::Utc>>(row, idx, column)?
            .map(|v| v.to_rfc3339())
            .into(),
        ref ty if <String as FromSql>::accepts(ty) => get::<String>(row, idx, column)?.into(),
        ref ty => {
            let raw = get::<AnyBytes>(row, idx, column)?.map(|b| b.0);
            return Ok(fallback_value(ty, raw));
        }
    };
    Ok(RawValue::Scalar(value))
}

fn get<T>(row: &Row, idx: usize, column: &Column) -> DbResult<Option<T>>
where
    T: for<'a> FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx)
        .map_err(|e| DbError::decode(column.name(), e.to_string()))
}

/// The wire bytes of a column of any type.
struct AnyBytes(Vec<u8>);

impl<'a> FromSql<'a> for AnyBytes {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(AnyBytes(raw.to_vec()))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

/// Columns without a dedicated decoding: enum labels are text, anything else keeps its bytes.
fn fallback_value(ty: &Type, raw: Option<Vec<u8>>) -> RawValue {
    match raw {
        None => RawValue::Scalar(Value::Null),
        Some(bytes) if matches!(ty.kind(), Kind::Enum(_)) => {
            RawValue::Scalar(Value::Text(String::from_utf8_lossy(&bytes).into_owned()))
        }
        Some(bytes) => RawValue::Bytes(bytes),
    }
}
