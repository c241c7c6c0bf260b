// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Raw, dynamically typed values.
//!
//! Both encodings are read into [`Value`] before any node-specific decoding
//! happens: JSON documents via `From<serde_json::Value>`, container
//! datasets directly from the container backend. Unlike JSON, containers
//! can hand out raw byte strings, hence the [`Value::Bytes`] variant.

use std::collections::BTreeMap;

/// A raw value from either input encoding.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A byte string that has not (or could not) be decoded as text.
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns a short name for the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for anything that is not a list or a map.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Numeric view of a scalar. Booleans map to `0.0` / `1.0`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Integer view of a scalar. Floats are accepted only when integral and
    /// inside the `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
        const RANGE: std::ops::Range<f64> = (i64::MIN as f64)..(i64::MAX as f64);
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 && RANGE.contains(f) => Some(*f as i64),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Flattens a scalar or (nested) list of integers into a vector.
    ///
    /// A bare scalar becomes a one-element vector. Returns `None` if any
    /// element is not an integer.
    pub fn as_int_list(&self) -> Option<Vec<i64>> {
        fn walk(value: &Value, out: &mut Vec<i64>) -> Option<()> {
            match value {
                Value::List(items) => {
                    for item in items {
                        walk(item, out)?;
                    }
                    Some(())
                }
                scalar => {
                    out.push(scalar.as_i64()?);
                    Some(())
                }
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out)?;
        Some(out)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_numbers() {
        let v = Value::from(serde_json::json!([1, 2.5, -3]));
        assert_eq!(
            v,
            Value::List(vec![Value::Int(1), Value::Float(2.5), Value::Int(-3)])
        );
    }

    #[test]
    fn test_from_json_object() {
        let v = Value::from(serde_json::json!({"name": "lif1", "n": null}));
        assert_eq!(v.get("name"), Some(&Value::Str("lif1".into())));
        assert!(v.get("n").unwrap().is_null());
        assert!(v.get("missing").is_none());
    }

    #[test]
    fn test_as_i64_rejects_fractional_and_out_of_range() {
        assert_eq!(Value::Float(3.0).as_i64(), Some(3));
        assert_eq!(Value::Float(3.5).as_i64(), None);
        assert_eq!(Value::Float(1e300).as_i64(), None);
        assert_eq!(Value::Float(-1e300).as_i64(), None);
        assert_eq!(Value::Float(9.223_372_036_854_775_808e18).as_i64(), None);
        assert_eq!(Value::Float(-9.223_372_036_854_775_808e18).as_i64(), Some(i64::MIN));
        assert_eq!(Value::Float(f64::INFINITY).as_i64(), None);
        assert_eq!(Value::Str("3".into()).as_i64(), None);
    }

    #[test]
    fn test_as_int_list() {
        assert_eq!(Value::Int(784).as_int_list(), Some(vec![784]));
        let nested = Value::from(serde_json::json!([[1, 28], [28]]));
        assert_eq!(nested.as_int_list(), Some(vec![1, 28, 28]));
        assert_eq!(Value::from(serde_json::json!([1, "x"])).as_int_list(), None);
    }

    #[test]
    fn test_vec_conversions() {
        assert_eq!(
            Value::from(vec![Value::Int(1), Value::from("a")]),
            Value::List(vec![Value::Int(1), Value::Str("a".into())])
        );
        assert_eq!(Value::from(b"ab".to_vec()), Value::Bytes(vec![b'a', b'b']));
    }

    #[test]
    fn test_serialize_untagged() {
        let v = Value::from(serde_json::json!({"a": [1, 2], "b": "x"}));
        let text = serde_json::to_string(&v).unwrap();
        assert_eq!(text, r#"{"a":[1,2],"b":"x"}"#);
    }
}
