//! Caller-supplied values and how they reach the database.
//!
//! Every value handed to [`CrudDb`](crate::CrudDb) is a plain string. [`SqlValue::parse`]
//! classifies it the way the statement builder needs:
//!
//! - a string that parses as an `i64` is an integer (rendered unquoted, exactly as written),
//! - the exact string `NULL` is the SQL `NULL` keyword,
//! - everything else is text.
//!
//! A [`SqlValue`] is either rendered inline as a SQL literal ([`SqlValue::to_literal`]) or bound
//! as a parameter. When bound it adapts to the type PostgreSQL inferred for its placeholder, so
//! `"42"` can be written to an `int4` column and `"2024-01-31"` to a `date` column.
//!
//! Inline text literals are wrapped in single quotes **without escaping**. Never render untrusted
//! text inline; use [`ValueMode::Bind`](crate::ValueMode::Bind) instead.

use bytes::{BufMut, BytesMut};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, Kind, ToSql, Type, to_sql_checked};

type BindResult = Result<IsNull, Box<dyn Error + Sync + Send>>;

/// The `NULL` sentinel recognised in caller values.
pub const NULL_KEYWORD: &str = "NULL";

/// One classified caller value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// The `NULL` keyword
    Null,
    /// A value that parsed as a 64-bit signed integer
    Integer {
        value: i64,
        /// The caller's text, kept for inline rendering and text parameters
        raw: String,
    },
    /// Anything else
    Text(String),
}

impl SqlValue {
    /// Classify a caller value.
    pub fn parse(raw: &str) -> Self {
        if let Ok(value) = raw.parse::<i64>() {
            SqlValue::Integer {
                value,
                raw: raw.to_string(),
            }
        } else if raw == NULL_KEYWORD {
            SqlValue::Null
        } else {
            SqlValue::Text(raw.to_string())
        }
    }

    /// Render as an inline SQL literal.
    ///
    /// ```
    /// use crudsql::SqlValue;
    ///
    /// assert_eq!(SqlValue::parse("123").to_literal(), "123");
    /// assert_eq!(SqlValue::parse("abc").to_literal(), "'abc'");
    /// assert_eq!(SqlValue::parse("NULL").to_literal(), "NULL");
    /// ```
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Null => NULL_KEYWORD.to_string(),
            SqlValue::Integer { raw, .. } => raw.clone(),
            SqlValue::Text(s) => quote(s),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<&str> for SqlValue {
    fn from(raw: &str) -> Self {
        SqlValue::parse(raw)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

/// Serialize one caller value as an inline SQL literal.
pub fn serialize_value(raw: &str) -> String {
    SqlValue::parse(raw).to_literal()
}

/// Wrap text in single quotes. Embedded quotes are not escaped.
pub(crate) fn quote(s: &str) -> String {
    format!("'{s}'")
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> BindResult {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Integer { value, raw } => bind_integer(*value, raw, ty, out),
            SqlValue::Text(s) => bind_text(s, ty, out),
        }
    }

    // Conversion is decided per parameter type in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn bind_integer(v: i64, raw: &str, ty: &Type, out: &mut BytesMut) -> BindResult {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::OID => u32::try_from(v)?.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        _ => bind_text(raw, ty, out),
    }
}

fn bind_text(s: &str, ty: &Type, out: &mut BytesMut) -> BindResult {
    match *ty {
        Type::BOOL => parse_bool(s)?.to_sql(ty, out),
        Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
        Type::OID => s.trim().parse::<u32>()?.to_sql(ty, out),
        Type::FLOAT4 => s.trim().parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::NUMERIC => parse_decimal(s)?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        Type::UUID => uuid::Uuid::parse_str(s.trim())?.to_sql(ty, out),
        Type::DATE => s.trim().parse::<chrono::NaiveDate>()?.to_sql(ty, out),
        Type::TIME => s.trim().parse::<chrono::NaiveTime>()?.to_sql(ty, out),
        Type::TIMESTAMP => parse_timestamp(s)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => parse_timestamptz(s)?.to_sql(ty, out),
        _ if <&str as ToSql>::accepts(ty) => s.to_sql(ty, out),
        // Enum labels are sent as their text.
        _ if matches!(ty.kind(), Kind::Enum(_)) => {
            out.put_slice(s.as_bytes());
            Ok(IsNull::No)
        }
        _ => Err(format!("cannot bind value '{s}' to a parameter of type {ty}").into()),
    }
}

fn parse_bool(s: &str) -> Result<bool, Box<dyn Error + Sync + Send>> {
    match s.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Ok(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("invalid boolean value: '{other}'").into()),
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, rust_decimal::Error> {
    let s = s.trim();
    s.parse::<Decimal>().or_else(|_| Decimal::from_scientific(s))
}

fn parse_timestamp(s: &str) -> Result<chrono::NaiveDateTime, chrono::ParseError> {
    let s = s.trim();
    s.parse::<chrono::NaiveDateTime>()
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
}

fn parse_timestamptz(s: &str) -> Result<chrono::DateTime<chrono::Utc>, chrono::ParseError> {
    let s = s.trim();
    chrono::DateTime::parse_from_rfc3339(s)
        .or_else(|_| chrono::DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z"))
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(value: &str, ty: &Type) -> BytesMut {
        let mut out = BytesMut::new();
        let is_null = SqlValue::parse(value)
            .to_sql(ty, &mut out)
            .expect("value should bind");
        assert!(matches!(is_null, IsNull::No));
        out
    }

    #[test]
    fn classifies_integers_null_and_text() {
        assert_eq!(
            SqlValue::parse("123"),
            SqlValue::Integer {
                value: 123,
                raw: "123".to_string()
            }
        );
        assert!(matches!(SqlValue::parse("-7"), SqlValue::Integer { value: -7, .. }));
        assert_eq!(SqlValue::parse("NULL"), SqlValue::Null);
        assert_eq!(SqlValue::parse("null"), SqlValue::Text("null".to_string()));
        assert_eq!(SqlValue::parse("12.5"), SqlValue::Text("12.5".to_string()));
        assert_eq!(SqlValue::parse(""), SqlValue::Text(String::new()));
    }

    #[test]
    fn serializes_literals() {
        assert_eq!(serialize_value("123"), "123");
        assert_eq!(serialize_value("abc"), "'abc'");
        assert_eq!(serialize_value("NULL"), "NULL");
        assert_eq!(serialize_value("1e3"), "'1e3'");
    }

    #[test]
    fn integers_keep_the_callers_text() {
        assert_eq!(serialize_value("+5"), "+5");
        assert_eq!(serialize_value("007"), "007");
        assert_eq!(&bind("01234", &Type::TEXT)[..], b"01234");
        assert_eq!(&bind("01234", &Type::INT4)[..], &1234i32.to_be_bytes());
    }

    #[test]
    fn embedded_quotes_are_not_escaped() {
        assert_eq!(serialize_value("O'Brien"), "'O'Brien'");
    }

    #[test]
    fn integer_binds_to_narrow_integer_columns() {
        assert_eq!(&bind("42", &Type::INT4)[..], &42i32.to_be_bytes());
        assert_eq!(&bind("42", &Type::INT2)[..], &42i16.to_be_bytes());
        assert_eq!(&bind("42", &Type::INT8)[..], &42i64.to_be_bytes());
    }

    #[test]
    fn integer_out_of_range_fails_to_bind() {
        let mut out = BytesMut::new();
        assert!(SqlValue::parse("70000").to_sql(&Type::INT2, &mut out).is_err());
    }

    #[test]
    fn integer_binds_as_text_for_text_columns() {
        assert_eq!(&bind("42", &Type::TEXT)[..], b"42");
        assert_eq!(&bind("42", &Type::VARCHAR)[..], b"42");
    }

    #[test]
    fn text_is_parsed_for_typed_columns() {
        assert_eq!(&bind("yes", &Type::BOOL)[..], &[1u8]);
        assert_eq!(&bind("off", &Type::BOOL)[..], &[0u8]);
        assert_eq!(&bind("1.5", &Type::FLOAT8)[..], &1.5f64.to_be_bytes());
        assert_eq!(&bind("hello", &Type::TEXT)[..], b"hello");
        assert_eq!(bind("67e55044-10b1-426f-9247-bb680e5fe0c8", &Type::UUID).len(), 16);
        assert_eq!(bind("2024-01-31", &Type::DATE).len(), 4);
        assert_eq!(bind("2024-01-31 10:20:30", &Type::TIMESTAMP).len(), 8);
        assert_eq!(bind("2024-01-31T10:20:30Z", &Type::TIMESTAMPTZ).len(), 8);
    }

    #[test]
    fn null_binds_for_any_type() {
        let mut out = BytesMut::new();
        let is_null = SqlValue::Null.to_sql(&Type::UUID, &mut out).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(out.is_empty());
    }

    #[test]
    fn unsupported_parameter_type_is_an_error() {
        let mut out = BytesMut::new();
        let err = SqlValue::parse("abc")
            .to_sql(&Type::INET, &mut out)
            .err()
            .expect("inet parameters take no text");
        assert!(err.to_string().contains("inet"));
    }

    #[test]
    fn numeric_binds_through_decimal() {
        let expected = |d: Decimal| {
            let mut out = BytesMut::new();
            d.to_sql(&Type::NUMERIC, &mut out).unwrap();
            out
        };
        assert_eq!(bind("12.50", &Type::NUMERIC), expected(Decimal::new(1250, 2)));
        assert_eq!(bind("-0.0005", &Type::NUMERIC), expected(Decimal::new(-5, 4)));
        assert_eq!(parse_decimal("1e3").unwrap(), Decimal::from(1000));
        bind("1e3", &Type::NUMERIC);
        assert_eq!(bind("42", &Type::NUMERIC), expected(Decimal::from(42)));

        let mut out = BytesMut::new();
        assert!(SqlValue::parse("twelve").to_sql(&Type::NUMERIC, &mut out).is_err());
    }

    #[test]
    fn enum_labels_bind_as_text() {
        let mood = Type::new(
            "mood".to_string(),
            0,
            Kind::Enum(vec!["sad".to_string(), "happy".to_string()]),
            "public".to_string(),
        );
        assert_eq!(&bind("happy", &mood)[..], b"happy");
    }

    #[test]
    fn malformed_typed_text_is_an_error() {
        let mut out = BytesMut::new();
        assert!(SqlValue::parse("maybe").to_sql(&Type::BOOL, &mut out).is_err());
        assert!(SqlValue::parse("abc").to_sql(&Type::INT4, &mut out).is_err());
    }
}
