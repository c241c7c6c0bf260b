// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scalar normalisation of raw values.
//!
//! Containers hand out strings as byte sequences and single-element arrays
//! where JSON would have a plain scalar. These helpers reduce both to the
//! same shape before node decoding.

use nir_ir::{Metadata, NodeId, Value};

/// Decodes text-like byte sequences recursively, leaving everything else
/// untouched.
///
/// Byte sequences that are not valid UTF-8 stay as [`Value::Bytes`]. The
/// result is a deep copy; the input is never modified.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::Str(text.to_string()),
            Err(_) => Value::Bytes(bytes.clone()),
        },
        Value::List(items) => Value::List(items.iter().map(normalize).collect()),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Normalises a metadata value into a [`Metadata`] map.
///
/// Returns `None` if the value is not a map.
pub fn normalize_metadata(value: &Value) -> Option<Metadata> {
    match normalize(value) {
        Value::Map(map) => Some(map),
        _ => None,
    }
}

/// Unwraps a single-element list into its element, then normalises it.
///
/// Applied recursively, so `[[b"x"]]` becomes `"x"`.
pub fn as_scalar(value: &Value) -> Value {
    match value {
        Value::List(items) if items.len() == 1 => as_scalar(&items[0]),
        other => normalize(other),
    }
}

/// Text view of a scalar-like value, after unwrapping and byte decoding.
pub fn as_text(value: &Value) -> Option<String> {
    match as_scalar(value) {
        Value::Str(s) => Some(s),
        _ => None,
    }
}

/// Converts an edge endpoint or node key into a [`NodeId`].
///
/// Strings and byte strings are used as-is (bytes lossily if they are not
/// UTF-8); integers are rendered in decimal. Anything else has no id.
pub fn node_id(value: &Value) -> Option<NodeId> {
    match as_scalar(value) {
        Value::Str(s) => Some(NodeId::new(s)),
        Value::Bytes(b) => Some(NodeId::new(String::from_utf8_lossy(&b).into_owned())),
        Value::Int(i) => Some(NodeId::new(i.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_bytes_become_text() {
        let v = Value::from(b"hello".to_vec());
        assert_eq!(normalize(&v), Value::from("hello"));
    }

    #[test]
    fn test_invalid_utf8_preserved() {
        let v = Value::from(vec![0xff, 0xfe]);
        assert_eq!(normalize(&v), Value::Bytes(vec![0xff, 0xfe]));
    }

    #[test]
    fn test_nested_normalization() {
        let mut inner = BTreeMap::new();
        inner.insert("name".to_string(), Value::from(b"lif".to_vec()));
        let v = Value::List(vec![Value::Map(inner), Value::Int(3)]);

        let n = normalize(&v);
        assert_eq!(n.as_list().unwrap()[0].get("name"), Some(&Value::from("lif")));
        assert_eq!(n.as_list().unwrap()[1], Value::Int(3));
        // Input untouched.
        assert_eq!(
            v.as_list().unwrap()[0].get("name"),
            Some(&Value::Bytes(b"lif".to_vec()))
        );
    }

    #[test]
    fn test_as_scalar_unwraps_singletons() {
        let v = Value::List(vec![Value::List(vec![Value::from(b"LIF".to_vec())])]);
        assert_eq!(as_scalar(&v), Value::from("LIF"));
        assert_eq!(as_text(&v).as_deref(), Some("LIF"));

        let pair = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(as_scalar(&pair), pair);
        assert_eq!(as_text(&pair), None);
    }

    #[test]
    fn test_node_id() {
        assert_eq!(node_id(&Value::from("a")), Some(NodeId::from("a")));
        assert_eq!(node_id(&Value::from(b"b".to_vec())), Some(NodeId::from("b")));
        assert_eq!(node_id(&Value::Int(7)), Some(NodeId::from("7")));
        assert_eq!(node_id(&Value::Float(1.5)), None);
        assert_eq!(node_id(&Value::Null), None);
    }

    #[test]
    fn test_metadata_requires_map() {
        assert!(normalize_metadata(&Value::from("x")).is_none());
        let mut m = BTreeMap::new();
        m.insert("author".to_string(), Value::from(b"me".to_vec()));
        let md = normalize_metadata(&Value::Map(m)).unwrap();
        assert_eq!(md.get("author"), Some(&Value::from("me")));
    }
}
