//! # Runtime Values
//!
//! The five dynamic value types a relational row can hold, in borrowed form
//! (`ValueRef`, produced by the query collaborator without copying) and
//! owned form (`Value`, used by fixtures and catalogs).
//!
//! ## Fixture Representation
//!
//! `Value` (de)serializes untagged so catalogs read naturally in JSON and
//! YAML: `null`, integers, floats and strings map directly; blobs are written
//! as `{ "blob": "<hex>" }`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::DigestParseError;
use crate::hex;

/// The runtime type of a column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Integer,
    /// IEEE-754 double.
    Float,
    /// UTF-8 text.
    Text,
    /// Opaque bytes.
    Blob,
}

impl ValueType {
    /// Lowercase type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Blob => "blob",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A borrowed column value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// IEEE-754 double.
    Float(f64),
    /// UTF-8 text, without any terminator.
    Text(&'a str),
    /// Opaque bytes.
    Blob(&'a [u8]),
}

impl<'a> ValueRef<'a> {
    /// The runtime type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Integer(_) => ValueType::Integer,
            Self::Float(_) => ValueType::Float,
            Self::Text(_) => ValueType::Text,
            Self::Blob(_) => ValueType::Blob,
        }
    }

    /// Returns true for SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The float payload, if this is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The text payload, if this is text.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// The blob payload, if this is a blob.
    pub fn as_blob(&self) -> Option<&'a [u8]> {
        match self {
            Self::Blob(v) => Some(v),
            _ => None,
        }
    }

    /// The bytes hashed for this value by the scalar hash function.
    ///
    /// Blobs hash as-is and text hashes as its UTF-8 bytes. Numbers are
    /// rendered as SQL text first. NULL and NaN have no bytes: their hash is
    /// NULL.
    pub fn hash_bytes(&self) -> Option<Cow<'a, [u8]>> {
        match *self {
            Self::Null => None,
            Self::Blob(b) => Some(Cow::Borrowed(b)),
            Self::Text(t) => Some(Cow::Borrowed(t.as_bytes())),
            Self::Integer(v) => Some(Cow::Owned(v.to_string().into_bytes())),
            Self::Float(v) => render_float(v).map(|s| Cow::Owned(s.into_bytes())),
        }
    }

    /// Copy into an owned [`Value`].
    pub fn to_owned_value(&self) -> Value {
        match *self {
            Self::Null => Value::Null,
            Self::Integer(v) => Value::Integer(v),
            Self::Float(v) => Value::Float(v),
            Self::Text(v) => Value::Text(v.to_string()),
            Self::Blob(v) => Value::Blob(v.to_vec()),
        }
    }
}

/// Significant digits kept when rendering a float as text.
const FLOAT_DIGITS: usize = 15;

/// Text rendering of a float for hashing, the same text SQL gives a REAL:
/// 15 significant digits, trailing zeros trimmed but at least one digit
/// after the point, and exponent form (`1.0e+20`) when the decimal exponent
/// is below -4 or at least 15. Infinities render as `Inf` and `-Inf`. NaN
/// has no text and hashes like NULL.
fn render_float(v: f64) -> Option<String> {
    if v.is_nan() {
        return None;
    }
    if v.is_infinite() {
        let s = if v > 0.0 { "Inf" } else { "-Inf" };
        return Some(s.to_string());
    }
    if v == 0.0 {
        return Some("0.0".to_string());
    }

    // `d.dddddddddddddde<exp>`, rounded to FLOAT_DIGITS significant digits.
    let sci = format!("{:.*e}", FLOAT_DIGITS - 1, v.abs());
    let (mantissa, exp) = sci.split_once('e')?;
    let exp: i32 = exp.parse().ok()?;
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = String::with_capacity(24);
    if v < 0.0 {
        out.push('-');
    }
    if exp < -4 || exp >= FLOAT_DIGITS as i32 {
        let (lead, rest) = digits.split_at(1);
        out.push_str(lead);
        out.push('.');
        push_fraction(&mut out, rest);
        let sign = if exp < 0 { '-' } else { '+' };
        out.push_str(&format!("e{sign}{:02}", exp.unsigned_abs()));
    } else if exp >= 0 {
        let (int, frac) = digits.split_at(exp as usize + 1);
        out.push_str(int);
        out.push('.');
        push_fraction(&mut out, frac);
    } else {
        out.push_str("0.");
        for _ in 1..exp.unsigned_abs() {
            out.push('0');
        }
        push_fraction(&mut out, &digits);
    }
    Some(out)
}

/// Append fraction digits without trailing zeros, or a single `0` if none
/// remain.
fn push_fraction(out: &mut String, frac: &str) {
    let frac = frac.trim_end_matches('0');
    out.push_str(if frac.is_empty() { "0" } else { frac });
}

/// An owned column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ValueRepr", into = "ValueRepr")]
pub enum Value {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// IEEE-754 double.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Opaque bytes.
    Blob(Vec<u8>),
}

impl Value {
    /// Borrow as a [`ValueRef`].
    pub fn as_value_ref(&self) -> ValueRef<'_> {
        match self {
            Self::Null => ValueRef::Null,
            Self::Integer(v) => ValueRef::Integer(*v),
            Self::Float(v) => ValueRef::Float(*v),
            Self::Text(v) => ValueRef::Text(v),
            Self::Blob(v) => ValueRef::Blob(v),
        }
    }

    /// The runtime type of this value.
    pub fn value_type(&self) -> ValueType {
        self.as_value_ref().value_type()
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Wire shape of [`Value`] in fixture files.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Blob { blob: String },
}

impl TryFrom<ValueRepr> for Value {
    type Error = DigestParseError;

    fn try_from(repr: ValueRepr) -> Result<Self, Self::Error> {
        Ok(match repr {
            ValueRepr::Null => Self::Null,
            ValueRepr::Integer(v) => Self::Integer(v),
            ValueRepr::Float(v) => Self::Float(v),
            ValueRepr::Text(v) => Self::Text(v),
            ValueRepr::Blob { blob } => Self::Blob(hex::decode(&blob)?),
        })
    }
}

impl From<Value> for ValueRepr {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Integer(v) => Self::Integer(v),
            Value::Float(v) => Self::Float(v),
            Value::Text(v) => Self::Text(v),
            Value::Blob(v) => Self::Blob {
                blob: hex::encode(&v),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_types() {
        assert_eq!(ValueRef::Null.value_type(), ValueType::Null);
        assert_eq!(ValueRef::Integer(1).value_type(), ValueType::Integer);
        assert_eq!(ValueRef::Float(1.5).value_type(), ValueType::Float);
        assert_eq!(ValueRef::Text("x").value_type(), ValueType::Text);
        assert_eq!(ValueRef::Blob(b"x").value_type(), ValueType::Blob);
        assert_eq!(ValueType::Blob.to_string(), "blob");
    }

    #[test]
    fn typed_accessors_match_variant_only() {
        let v = ValueRef::Integer(7);
        assert_eq!(v.as_i64(), Some(7));
        assert_eq!(v.as_f64(), None);
        assert_eq!(v.as_text(), None);
        assert_eq!(ValueRef::Text("hi").as_text(), Some("hi"));
        assert_eq!(ValueRef::Blob(&[1, 2]).as_blob(), Some(&[1u8, 2][..]));
        assert!(ValueRef::Null.is_null());
    }

    #[test]
    fn hash_bytes_null_is_none() {
        assert!(ValueRef::Null.hash_bytes().is_none());
    }

    #[test]
    fn hash_bytes_borrow_text_and_blob() {
        assert!(matches!(
            ValueRef::Text("abc").hash_bytes(),
            Some(Cow::Borrowed(b"abc"))
        ));
        assert!(matches!(
            ValueRef::Blob(&[0, 255]).hash_bytes(),
            Some(Cow::Borrowed(&[0, 255]))
        ));
    }

    #[test]
    fn hash_bytes_render_numbers_as_text() {
        assert_eq!(ValueRef::Integer(-42).hash_bytes().unwrap().as_ref(), b"-42");
        assert_eq!(ValueRef::Float(1.5).hash_bytes().unwrap().as_ref(), b"1.5");
        assert_eq!(ValueRef::Float(2.0).hash_bytes().unwrap().as_ref(), b"2.0");
        assert_eq!(
            ValueRef::Float(f64::NEG_INFINITY).hash_bytes().unwrap().as_ref(),
            b"-Inf"
        );
    }

    #[test]
    fn hash_bytes_render_floats_like_sql_text() {
        let text = |v: f64| {
            ValueRef::Float(v)
                .hash_bytes()
                .map(|b| String::from_utf8(b.into_owned()).unwrap())
        };
        assert_eq!(text(0.1 + 0.2).as_deref(), Some("0.3"));
        assert_eq!(text(1e20).as_deref(), Some("1.0e+20"));
        assert_eq!(text(1.0).as_deref(), Some("1.0"));
        assert_eq!(text(-1.0).as_deref(), Some("-1.0"));
        assert_eq!(text(0.0).as_deref(), Some("0.0"));
        assert_eq!(text(1e14).as_deref(), Some("100000000000000.0"));
        assert_eq!(text(1e15).as_deref(), Some("1.0e+15"));
        assert_eq!(text(0.0001).as_deref(), Some("0.0001"));
        assert_eq!(text(1e-5).as_deref(), Some("1.0e-05"));
        assert_eq!(text(-2.5e-300).as_deref(), Some("-2.5e-300"));
        assert_eq!(text(1.0 / 3.0).as_deref(), Some("0.333333333333333"));
        assert_eq!(text(123456.789).as_deref(), Some("123456.789"));
        assert_eq!(text(f64::INFINITY).as_deref(), Some("Inf"));
        assert_eq!(text(f64::NAN), None);
    }

    #[test]
    fn owned_round_trips_through_ref() {
        let values = vec![
            Value::Null,
            Value::from(3i64),
            Value::from(0.25f64),
            Value::from("text"),
            Value::from(vec![9u8, 8, 7]),
        ];
        for v in values {
            assert_eq!(v.as_value_ref().to_owned_value(), v);
        }
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn json_fixture_representation() {
        let row: Vec<Value> =
            serde_json::from_str(r#"[null, 1, 2.5, "abc", {"blob": "00ff"}]"#).unwrap();
        assert_eq!(
            row,
            vec![
                Value::Null,
                Value::Integer(1),
                Value::Float(2.5),
                Value::Text("abc".to_string()),
                Value::Blob(vec![0x00, 0xff]),
            ]
        );
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[null,1,2.5,"abc",{"blob":"00ff"}]"#);
    }

    #[test]
    fn yaml_fixture_representation() {
        let row: Vec<Value> = serde_yaml::from_str("- ~\n- -3\n- hello\n- blob: 0a0b\n").unwrap();
        assert_eq!(
            row,
            vec![
                Value::Null,
                Value::Integer(-3),
                Value::Text("hello".to_string()),
                Value::Blob(vec![0x0a, 0x0b]),
            ]
        );
    }

    #[test]
    fn bad_blob_hex_rejected() {
        assert!(serde_json::from_str::<Value>(r#"{"blob": "xyz"}"#).is_err());
    }
}
