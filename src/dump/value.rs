// ABOUTME: Typed scalar values read from the catalog and their SQL literal form
// ABOUTME: Escapes text, encodes binary as hex, and formats temporal values for replay

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// A single cell read from a table
///
/// The set is closed: every driver value is classified into one of these
/// before serialization, so a new kind has to be handled explicitly in
/// [`serialize_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Exact numeric text as reported by the server (DECIMAL columns)
    Decimal(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
    Text(String),
}

/// Render a value as a MySQL literal
///
/// | kind | literal |
/// |------|---------|
/// | `Null` | `NULL` |
/// | numbers | decimal text, unquoted |
/// | `DateTime` | `'YYYY-MM-DD HH:MM:SS'`, sub-second precision dropped |
/// | `Date` | `'YYYY-MM-DD'` |
/// | `Bytes` | `X'…'` lowercase hex |
/// | `Text` | single-quoted with backslash escapes |
///
/// # Examples
///
/// ```
/// # use stars_backup::dump::{serialize_value, SqlValue};
/// assert_eq!(serialize_value(&SqlValue::Null), "NULL");
/// assert_eq!(serialize_value(&SqlValue::Int(-42)), "-42");
/// assert_eq!(serialize_value(&SqlValue::Bytes(vec![0xde, 0xad])), "X'dead'");
/// assert_eq!(serialize_value(&SqlValue::Text("O'Brien".into())), "'O\\'Brien'");
/// ```
pub fn serialize_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Int(i) => i.to_string(),
        SqlValue::UInt(u) => u.to_string(),
        SqlValue::Float(f) => {
            // MySQL cannot store NaN or infinities. Large and tiny
            // magnitudes must keep their exponent: a plain digit string
            // is read back as DECIMAL, capped at 65 digits.
            if f.is_finite() {
                format!("{:?}", f)
            } else {
                "NULL".to_string()
            }
        }
        SqlValue::Decimal(d) => d.clone(),
        SqlValue::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        SqlValue::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S")),
        SqlValue::Bytes(bytes) => {
            let mut out = String::with_capacity(bytes.len() * 2 + 3);
            out.push_str("X'");
            for b in bytes {
                let _ = write!(out, "{:02x}", b);
            }
            out.push('\'');
            out
        }
        SqlValue::Text(s) => format!("'{}'", escape_string(s)),
    }
}

/// Escape a string for use between single quotes
///
/// Backslash is handled before anything else so that the backslashes
/// introduced for quotes and control characters are never doubled.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
        .replace('\0', "\\0")
        .replace('\u{1a}', "\\Z")
}

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decode a single-quoted literal the way the MySQL lexer does
    fn unescape_literal(literal: &str) -> String {
        let inner = literal
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .expect("literal must be single-quoted");
        let mut out = String::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some('0') => out.push('\0'),
                    Some('Z') => out.push('\u{1a}'),
                    Some(other) => out.push(other),
                    None => panic!("dangling backslash in {literal}"),
                }
            } else {
                assert_ne!(c, '\'', "unescaped quote in {literal}");
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_null_is_unquoted() {
        assert_eq!(serialize_value(&SqlValue::Null), "NULL");
    }

    #[test]
    fn test_numbers_are_unquoted() {
        assert_eq!(serialize_value(&SqlValue::Int(0)), "0");
        assert_eq!(serialize_value(&SqlValue::Int(i64::MIN)), "-9223372036854775808");
        assert_eq!(serialize_value(&SqlValue::UInt(u64::MAX)), "18446744073709551615");
        assert_eq!(serialize_value(&SqlValue::Float(2.5)), "2.5");
        assert_eq!(serialize_value(&SqlValue::Float(-0.125)), "-0.125");
        assert_eq!(
            serialize_value(&SqlValue::Decimal("-1234.5600".to_string())),
            "-1234.5600"
        );
    }

    #[test]
    fn test_float_round_trips_exactly() {
        for f in [0.1_f64, 1.0 / 3.0, 1e20, -7.25e-8, f64::MAX, f64::MIN_POSITIVE] {
            let text = serialize_value(&SqlValue::Float(f));
            assert!(!text.contains(','));
            assert_eq!(text.parse::<f64>().unwrap(), f);
        }
    }

    #[test]
    fn test_extreme_floats_use_exponent_notation() {
        assert_eq!(serialize_value(&SqlValue::Float(1e300)), "1e300");
        assert_eq!(serialize_value(&SqlValue::Float(1e-300)), "1e-300");
        assert_eq!(serialize_value(&SqlValue::Float(-1e-40)), "-1e-40");
        assert_eq!(serialize_value(&SqlValue::Float(6.02e23)), "6.02e23");
        assert_eq!(
            serialize_value(&SqlValue::Float(f64::MAX)),
            "1.7976931348623157e308"
        );

        // literals stay short enough to never be read as an oversized DECIMAL
        for f in [1e300_f64, 1e-300, 1e-40, 6.02e23, f64::MIN_POSITIVE] {
            let text = serialize_value(&SqlValue::Float(f));
            assert!(text.contains('e'), "{text}");
            assert!(text.len() < 30, "{text}");
        }
    }

    #[test]
    fn test_ordinary_floats_stay_plain() {
        assert_eq!(serialize_value(&SqlValue::Float(0.1)), "0.1");
        assert_eq!(serialize_value(&SqlValue::Float(-2.5)), "-2.5");
        assert_eq!(serialize_value(&SqlValue::Float(3.0)), "3.0");
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(serialize_value(&SqlValue::Float(f64::NAN)), "NULL");
        assert_eq!(serialize_value(&SqlValue::Float(f64::INFINITY)), "NULL");
    }

    #[test]
    fn test_datetime_truncates_subseconds() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(7, 5, 3, 999_999)
            .unwrap();
        assert_eq!(
            serialize_value(&SqlValue::DateTime(dt)),
            "'2024-03-09 07:05:03'"
        );
    }

    #[test]
    fn test_date_keeps_date_form() {
        let d = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(serialize_value(&SqlValue::Date(d)), "'1999-12-31'");
    }

    #[test]
    fn test_bytes_are_hex_encoded() {
        assert_eq!(serialize_value(&SqlValue::Bytes(vec![])), "X''");
        assert_eq!(
            serialize_value(&SqlValue::Bytes(vec![0x00, 0x0f, 0xab, 0xff])),
            "X'000fabff'"
        );
    }

    #[test]
    fn test_text_escapes() {
        assert_eq!(serialize_value(&SqlValue::Text("plain".into())), "'plain'");
        assert_eq!(serialize_value(&SqlValue::Text("O'Brien".into())), "'O\\'Brien'");
        assert_eq!(serialize_value(&SqlValue::Text("a\\b".into())), "'a\\\\b'");
        assert_eq!(
            serialize_value(&SqlValue::Text("l1\nl2\r\tx".into())),
            "'l1\\nl2\\r\\tx'"
        );
        // backslash before quote must not collapse into an escaped quote
        assert_eq!(serialize_value(&SqlValue::Text("\\'".into())), "'\\\\\\''");
    }

    #[test]
    fn test_text_round_trips_for_all_special_mixes() {
        let alphabet = ['\\', '\'', '\n', '\r', '\t', 'a'];
        // every string of length 1..=4 over the alphabet
        let mut inputs = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..4 {
            frontier = frontier
                .iter()
                .flat_map(|prefix| {
                    alphabet.iter().map(move |c| {
                        let mut s = prefix.clone();
                        s.push(*c);
                        s
                    })
                })
                .collect();
            inputs.extend(frontier.iter().cloned());
        }
        assert_eq!(inputs.len(), 1 + 6 + 36 + 216 + 1296);

        for input in inputs {
            let literal = serialize_value(&SqlValue::Text(input.clone()));
            assert!(!literal[1..literal.len() - 1].contains('\n'));
            assert!(!literal[1..literal.len() - 1].contains('\r'));
            assert!(!literal[1..literal.len() - 1].contains('\t'));
            assert_eq!(unescape_literal(&literal), input, "literal {literal}");
        }
    }

    #[test]
    fn test_nul_and_ctrl_z_are_escaped() {
        let literal = serialize_value(&SqlValue::Text("a\0b\u{1a}c".into()));
        assert_eq!(literal, "'a\\0b\\Zc'");
        assert_eq!(unescape_literal(&literal), "a\0b\u{1a}c");
    }

    #[test]
    fn test_unicode_text_passes_through() {
        let literal = serialize_value(&SqlValue::Text("主键ID ✓".into()));
        assert_eq!(literal, "'主键ID ✓'");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("github_repo"), "`github_repo`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }
}
