// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Merges a [`RawGraphSource`] into the canonical [`Graph`].

use crate::config::DecoderConfig;
use crate::decoder::{decode_node, placeholder};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::edges::{to_edges, to_edges_strict};
use crate::normalize::{as_scalar, normalize, normalize_metadata};
use crate::source::{RawGraphSource, SourceFormat};
use crate::DecodeError;
use nir_ir::{Graph, TypeSpec, Value};

/// A decoded graph plus what happened while decoding it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Decoded {
    pub graph: Graph,
    pub format: SourceFormat,
    pub diagnostics: Vec<Diagnostic>,
}

impl Decoded {
    /// Returns `true` if nothing had to be skipped or replaced.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Decodes every node and graph section of `source`.
///
/// Node failures other than an unknown type tag are replaced by `Unknown`
/// placeholders and reported as diagnostics.
///
/// # Errors
/// - [`DecodeError::UnknownNodeType`] if any node carries an unknown tag
/// - [`DecodeError::MalformedEdges`] in strict edge mode
pub fn assemble<S: RawGraphSource>(
    mut source: S,
    config: &DecoderConfig,
) -> Result<Decoded, DecodeError> {
    let mut diagnostics = Diagnostics::new();
    let mut graph = Graph::new(version(source.version_source(), config));

    for raw in source.node_iter() {
        let outcome = match raw.record {
            Ok(record) => decode_node(record),
            Err(reason) => Err(DecodeError::ContainerIo(reason.to_string())),
        };
        let node = match outcome {
            Ok(node) => node,
            Err(fatal @ DecodeError::UnknownNodeType(_)) => {
                tracing::warn!("node '{}': {fatal}", raw.id);
                return Err(fatal);
            }
            Err(e) => {
                let reason = e.to_string();
                diagnostics.record(
                    DiagnosticKind::NodePlaceholder,
                    raw.id.as_str(),
                    format!("replaced by Unknown placeholder: {reason}"),
                );
                placeholder(&raw.id, &reason)
            }
        };
        graph.nodes.insert(raw.id, node);
    }

    graph.edges = match source.edge_source() {
        Some(raw) if config.strict_edges => to_edges_strict(raw)?,
        Some(raw) => to_edges(raw),
        None => Vec::new(),
    };

    if let Some(raw) = source.metadata_source() {
        match normalize_metadata(raw) {
            Some(metadata) => graph.metadata = metadata,
            None => diagnostics.record(
                DiagnosticKind::FieldDecodeFailure,
                "metadata",
                format!("expected a map, found {}", raw.kind_name()),
            ),
        }
    }
    graph.input_type = type_spec(source.input_type_source(), "input_type", &mut diagnostics);
    graph.output_type = type_spec(source.output_type_source(), "output_type", &mut diagnostics);

    for edge in graph.dangling_edges() {
        diagnostics.record(
            DiagnosticKind::DanglingEdge,
            edge.to_string(),
            "edge endpoint is not a node in the graph",
        );
    }

    let format = source.format();
    let mut all = source.take_diagnostics();
    all.extend(diagnostics.into_vec());

    tracing::info!(
        "assembled {format} graph: {} nodes, {} edges, {} diagnostic(s)",
        graph.num_nodes(),
        graph.num_edges(),
        all.len()
    );
    Ok(Decoded {
        graph,
        format,
        diagnostics: all,
    })
}

fn version(raw: Option<&Value>, config: &DecoderConfig) -> String {
    match raw.map(as_scalar) {
        Some(Value::Str(s)) => s,
        Some(Value::Int(i)) => i.to_string(),
        Some(Value::Float(f)) => f.to_string(),
        _ => config.default_version.clone(),
    }
}

fn type_spec(raw: Option<&Value>, field: &str, diagnostics: &mut Diagnostics) -> TypeSpec {
    let Some(raw) = raw else {
        return TypeSpec::new();
    };
    TypeSpec::from_value(&normalize(raw)).unwrap_or_else(|e| {
        diagnostics.record(DiagnosticKind::FieldDecodeFailure, field, e.to_string());
        TypeSpec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonSource;
    use nir_ir::NodeType;

    fn assemble_json(text: &str) -> Result<Decoded, DecodeError> {
        assemble(JsonSource::parse(text.as_bytes())?, &DecoderConfig::default())
    }

    #[test]
    fn test_default_version_and_empty_sections() {
        let d = assemble_json(r#"{"nodes": {}, "edges": []}"#).unwrap();
        assert_eq!(d.graph.version, "1.0");
        assert!(d.graph.metadata.is_empty());
        assert!(d.graph.input_type.is_empty());
        assert_eq!(d.format, SourceFormat::Json);
        assert!(d.is_clean());
    }

    #[test]
    fn test_numeric_version() {
        let d = assemble_json(r#"{"nodes": {}, "edges": [], "version": 2}"#).unwrap();
        assert_eq!(d.graph.version, "2");
    }

    #[test]
    fn test_bad_node_becomes_placeholder() {
        let d = assemble_json(
            r#"{"nodes": {"fc": {"type": "Affine", "weight": [[1]]}}, "edges": []}"#,
        )
        .unwrap();
        let node = d.graph.node("fc").unwrap();
        assert_eq!(node.node_type(), NodeType::Unknown);
        assert_eq!(node.metadata.get("name"), Some(&Value::from("fc")));
        assert!(node.metadata.contains_key("error"));
        assert_eq!(d.diagnostics.len(), 1);
        assert_eq!(d.diagnostics[0].kind, DiagnosticKind::NodePlaceholder);
    }

    #[test]
    fn test_unknown_type_aborts() {
        let err = assemble_json(
            r#"{"nodes": {"a": {"type": "Mystery"}, "b": {"type": "Unknown"}}, "edges": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownNodeType(tag) if tag == "Mystery"));
    }

    #[test]
    fn test_dangling_edge_reported() {
        let d = assemble_json(
            r#"{"nodes": {"a": {"type": "Unknown"}}, "edges": [["a", "ghost"]]}"#,
        )
        .unwrap();
        assert_eq!(d.graph.num_edges(), 1);
        assert_eq!(d.diagnostics.len(), 1);
        assert_eq!(d.diagnostics[0].kind, DiagnosticKind::DanglingEdge);
    }

    #[test]
    fn test_strict_edges() {
        let source = JsonSource::parse(br#"{"nodes": {}, "edges": ["a", "b", "c"]}"#).unwrap();
        let config = DecoderConfig {
            strict_edges: true,
            ..Default::default()
        };
        assert!(matches!(
            assemble(source.clone(), &config),
            Err(DecodeError::MalformedEdges(_))
        ));
        let lenient = assemble(source, &DecoderConfig::default()).unwrap();
        assert!(lenient.graph.edges.is_empty());
    }

    #[test]
    fn test_invalid_port_types_degrade() {
        let d = assemble_json(
            r#"{"nodes": {}, "edges": [], "input_type": {"input": "wide"}, "metadata": {"k": 1}}"#,
        )
        .unwrap();
        assert!(d.graph.input_type.is_empty());
        assert_eq!(d.graph.metadata.get("k"), Some(&Value::Int(1)));
        assert_eq!(d.diagnostics.len(), 1);
        assert_eq!(d.diagnostics[0].location, "input_type");
    }
}
