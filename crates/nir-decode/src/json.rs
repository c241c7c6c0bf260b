// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON document reader.
//!
//! # Document layout
//! ```json
//! {
//!   "version": "1.0",
//!   "nodes": { "<id>": { "type": "<tag>", ... } },
//!   "edges": [["<source>", "<target>"], ...],
//!   "input_type": { "<port>": [<dims>] },
//!   "output_type": { "<port>": [<dims>] },
//!   "metadata": { ... }
//! }
//! ```
//! `nodes` and `edges` are required; everything else is optional.

use crate::source::{RawGraphSource, RawNode, SourceFormat};
use crate::DecodeError;
use nir_ir::{NodeId, Value};
use std::collections::BTreeMap;

/// A parsed JSON NIR document.
#[derive(Debug, Clone)]
pub struct JsonSource {
    document: BTreeMap<String, Value>,
}

impl JsonSource {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// [`DecodeError::MalformedDocument`] if the bytes are not UTF-8 JSON,
    /// the document is not an object, or `nodes` / `edges` is missing.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DecodeError::MalformedDocument(format!("not UTF-8 text: {e}")))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| DecodeError::MalformedDocument(format!("JSON parse error: {e}")))?;

        let document = match Value::from(json) {
            Value::Map(map) => map,
            other => {
                return Err(DecodeError::MalformedDocument(format!(
                    "expected a JSON object, found {}",
                    other.kind_name()
                )))
            }
        };

        for field in ["nodes", "edges"] {
            if document.get(field).map_or(true, Value::is_null) {
                return Err(DecodeError::MalformedDocument(format!(
                    "missing required field '{field}'"
                )));
            }
        }
        if let Some(nodes) = document.get("nodes").filter(|v| v.as_map().is_none()) {
            return Err(DecodeError::MalformedDocument(format!(
                "'nodes' must be an object, found {}",
                nodes.kind_name()
            )));
        }

        tracing::debug!(
            "parsed JSON document with {} top-level keys",
            document.len()
        );
        Ok(Self { document })
    }

    fn section(&self, key: &str) -> Option<&Value> {
        self.document.get(key).filter(|v| !v.is_null())
    }
}

impl RawGraphSource for JsonSource {
    fn format(&self) -> SourceFormat {
        SourceFormat::Json
    }

    fn node_iter(&self) -> Box<dyn Iterator<Item = RawNode<'_>> + '_> {
        let nodes = self.section("nodes").and_then(Value::as_map);
        Box::new(nodes.into_iter().flatten().map(|(id, record)| RawNode {
            id: NodeId::new(id.clone()),
            record: Ok(record),
        }))
    }

    fn edge_source(&self) -> Option<&Value> {
        self.section("edges")
    }

    fn metadata_source(&self) -> Option<&Value> {
        self.section("metadata")
    }

    fn input_type_source(&self) -> Option<&Value> {
        self.section("input_type")
    }

    fn output_type_source(&self) -> Option<&Value> {
        self.section("output_type")
    }

    fn version_source(&self) -> Option<&Value> {
        self.section("version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let src = JsonSource::parse(br#"{"nodes": {"a": {"type": "Linear"}}, "edges": []}"#)
            .unwrap();
        let ids: Vec<_> = src.node_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![NodeId::from("a")]);
        assert!(src.metadata_source().is_none());
        assert_eq!(src.format(), SourceFormat::Json);
    }

    #[test]
    fn test_missing_edges() {
        let err = JsonSource::parse(br#"{"nodes": {}}"#).unwrap_err();
        match err {
            DecodeError::MalformedDocument(msg) => assert!(msg.contains("edges")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            JsonSource::parse(b"\x89HDF\r\n\x1a\n"),
            Err(DecodeError::MalformedDocument(_))
        ));
        assert!(matches!(
            JsonSource::parse(b"[1, 2]"),
            Err(DecodeError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let src = JsonSource::parse(b"\xEF\xBB\xBF{\"nodes\": {\"a\": {\"type\": \"I\"}}, \"edges\": []}")
            .unwrap();
        assert_eq!(src.node_iter().count(), 1);

        let decoded = crate::route(b"\xEF\xBB\xBF{\"nodes\": {}, \"edges\": []}", "m.json").unwrap();
        assert_eq!(decoded.graph.num_nodes(), 0);
    }

    #[test]
    fn test_nodes_must_be_object() {
        assert!(matches!(
            JsonSource::parse(br#"{"nodes": [], "edges": []}"#),
            Err(DecodeError::MalformedDocument(msg)) if msg.contains("nodes")
        ));
    }
}
