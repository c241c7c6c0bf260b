// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Edge list reconstruction.
//!
//! Two layouts are recognised:
//! - a list of `[source, target]` pairs (JSON, and 2-column container tables)
//! - a flat list of endpoints read two at a time (1-D container datasets,
//!   and n×1 tables)
//!
//! Endpoints may be strings, byte strings or single-element arrays of
//! either.

use crate::normalize::node_id;
use crate::DecodeError;
use nir_ir::{Edge, NodeId, Value};

/// Decodes an edge list, treating anything unrecognised as "no edges".
pub fn to_edges(raw: &Value) -> Vec<Edge> {
    match classify(raw) {
        Ok(edges) => edges,
        Err(reason) => {
            tracing::debug!("ignoring edge data: {reason}");
            Vec::new()
        }
    }
}

/// Decodes an edge list, rejecting unrecognised shapes.
pub fn to_edges_strict(raw: &Value) -> Result<Vec<Edge>, DecodeError> {
    classify(raw).map_err(DecodeError::MalformedEdges)
}

fn classify(raw: &Value) -> Result<Vec<Edge>, String> {
    let items = raw
        .as_list()
        .ok_or_else(|| format!("expected a list, found {}", raw.kind_name()))?;

    if items.is_empty() {
        return Ok(Vec::new());
    }

    let column = items.iter().all(|item| matches!(item.as_list(), Some([_])));
    if matches!(items[0], Value::List(_)) && !column {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| pair(i, item))
            .collect()
    } else {
        if items.len() % 2 != 0 {
            return Err(format!("odd number of endpoints ({})", items.len()));
        }
        items
            .chunks_exact(2)
            .enumerate()
            .map(|(i, chunk)| -> Result<Edge, String> {
                Ok(Edge::new(
                    endpoint(2 * i, &chunk[0])?,
                    endpoint(2 * i + 1, &chunk[1])?,
                ))
            })
            .collect()
    }
}

fn pair(index: usize, item: &Value) -> Result<Edge, String> {
    match item.as_list() {
        Some([source, target]) => Ok(Edge::new(
            endpoint(index, source)?,
            endpoint(index, target)?,
        )),
        Some(other) => Err(format!(
            "edge {index} has {} endpoints, expected 2",
            other.len()
        )),
        None => Err(format!(
            "edge {index} is a {}, expected a [source, target] pair",
            item.kind_name()
        )),
    }
}

fn endpoint(index: usize, value: &Value) -> Result<NodeId, String> {
    node_id(value).ok_or_else(|| {
        format!(
            "entry {index} is a {} and cannot name a node",
            value.kind_name()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn edges(v: serde_json::Value) -> Vec<Edge> {
        to_edges(&Value::from(v))
    }

    #[test]
    fn test_pairs() {
        let e = edges(json!([["a", "b"], ["b", "c"]]));
        assert_eq!(e, vec![Edge::new("a", "b"), Edge::new("b", "c")]);
    }

    #[test]
    fn test_flat_endpoints() {
        let e = edges(json!(["a", "b", "c", "d"]));
        assert_eq!(e, vec![Edge::new("a", "b"), Edge::new("c", "d")]);
    }

    #[test]
    fn test_single_column_table() {
        let e = edges(json!([["a"], ["b"], ["b"], ["c"]]));
        assert_eq!(e, vec![Edge::new("a", "b"), Edge::new("b", "c")]);
        assert!(edges(json!([["a"], ["b"], ["c"]])).is_empty());
    }

    #[test]
    fn test_byte_string_table() {
        let raw = Value::List(vec![Value::List(vec![
            Value::from(b"in".to_vec()),
            Value::List(vec![Value::from(b"out".to_vec())]),
        ])]);
        assert_eq!(to_edges(&raw), vec![Edge::new("in", "out")]);
    }

    #[test]
    fn test_empty() {
        assert!(edges(json!([])).is_empty());
        assert!(to_edges_strict(&Value::List(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_odd_flat_list_is_lenient() {
        assert!(edges(json!(["a", "b", "c"])).is_empty());
        assert!(matches!(
            to_edges_strict(&Value::from(json!(["a", "b", "c"]))),
            Err(DecodeError::MalformedEdges(_))
        ));
    }

    #[test]
    fn test_unrecognised_shapes() {
        assert!(edges(json!("a->b")).is_empty());
        assert!(edges(json!([["a", "b", "c"]])).is_empty());
        assert!(edges(json!([["a", "b"], "c"])).is_empty());
        assert!(edges(json!({"a": "b"})).is_empty());
        assert!(to_edges_strict(&Value::from(json!({"a": "b"}))).is_err());
    }
}
