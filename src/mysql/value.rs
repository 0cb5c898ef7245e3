// ABOUTME: Conversion from MySQL wire values to typed SqlValue cells
// ABOUTME: Uses column type, flags, and charset to classify text-protocol bytes

use crate::dump::SqlValue;
use chrono::{NaiveDate, NaiveDateTime};
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Value};

/// Collation id of the `binary` character set
const BINARY_CHARSET: u16 = 63;

/// The parts of column metadata that decide how a value is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnKind {
    pub column_type: ColumnType,
    pub unsigned: bool,
    pub binary: bool,
}

impl ColumnKind {
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            unsigned: false,
            binary: false,
        }
    }
}

impl From<&Column> for ColumnKind {
    fn from(column: &Column) -> Self {
        Self {
            column_type: column.column_type(),
            unsigned: column.flags().contains(ColumnFlags::UNSIGNED_FLAG),
            binary: column.character_set() == BINARY_CHARSET,
        }
    }
}

/// Convert a driver value into a [`SqlValue`]
///
/// The text protocol delivers every non-NULL cell as bytes, so the column
/// type picks the kind. Bytes that fail to parse as the declared type are
/// kept as text so that the literal still round-trips verbatim.
pub fn convert_value(value: Value, kind: ColumnKind) -> SqlValue {
    match value {
        Value::NULL => SqlValue::Null,
        Value::Int(i) => SqlValue::Int(i),
        Value::UInt(u) => SqlValue::UInt(u),
        Value::Float(f) => SqlValue::Float(f as f64),
        Value::Double(d) => SqlValue::Float(d),
        Value::Date(year, month, day, hour, min, sec, micro) => {
            let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32);
            match (kind.column_type, date) {
                (ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE, Some(d)) => {
                    SqlValue::Date(d)
                }
                (_, Some(d)) => d
                    .and_hms_micro_opt(hour as u32, min as u32, sec as u32, micro)
                    .map(SqlValue::DateTime)
                    .unwrap_or_else(|| {
                        SqlValue::Text(format!(
                            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                            year, month, day, hour, min, sec
                        ))
                    }),
                (_, None) => SqlValue::Text(format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, min, sec
                )),
            }
        }
        Value::Time(negative, days, hours, mins, secs, micros) => {
            let total_hours = days * 24 + hours as u32;
            let sign = if negative { "-" } else { "" };
            let text = if micros == 0 {
                format!("{}{:02}:{:02}:{:02}", sign, total_hours, mins, secs)
            } else {
                format!(
                    "{}{:02}:{:02}:{:02}.{:06}",
                    sign, total_hours, mins, secs, micros
                )
            };
            SqlValue::Text(text)
        }
        Value::Bytes(bytes) => convert_bytes(bytes, kind),
    }
}

fn convert_bytes(bytes: Vec<u8>, kind: ColumnKind) -> SqlValue {
    match kind.column_type {
        ColumnType::MYSQL_TYPE_BIT => return SqlValue::Bytes(bytes),
        ColumnType::MYSQL_TYPE_STRING
        | ColumnType::MYSQL_TYPE_VAR_STRING
        | ColumnType::MYSQL_TYPE_VARCHAR
        | ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_BLOB
        | ColumnType::MYSQL_TYPE_GEOMETRY
            if kind.binary =>
        {
            return SqlValue::Bytes(bytes)
        }
        _ => {}
    }

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => return SqlValue::Bytes(e.into_bytes()),
    };

    match kind.column_type {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => {
            let parsed = if kind.unsigned {
                text.parse::<u64>().map(SqlValue::UInt).ok()
            } else {
                text.parse::<i64>().map(SqlValue::Int).ok()
            };
            parsed.unwrap_or(SqlValue::Text(text))
        }
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(SqlValue::Float)
            .unwrap_or(SqlValue::Text(text)),
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            if is_numeric_literal(&text) {
                SqlValue::Decimal(text)
            } else {
                SqlValue::Text(text)
            }
        }
        ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => {
            match NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f") {
                Ok(dt) => SqlValue::DateTime(dt),
                // zero dates such as 0000-00-00 00:00:00 have no chrono form
                Err(_) => SqlValue::Text(text),
            }
        }
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => {
            match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                Ok(d) => SqlValue::Date(d),
                Err(_) => SqlValue::Text(text),
            }
        }
        _ => SqlValue::Text(text),
    }
}

/// Digits with optional sign, decimal point, and exponent
fn is_numeric_literal(text: &str) -> bool {
    !text.is_empty()
        && text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
}
