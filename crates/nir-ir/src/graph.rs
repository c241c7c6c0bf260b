// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The canonical NIR graph.
//!
//! A [`Graph`] is the single shape every decoder produces, whatever the
//! input encoding:
//!
//! ```text
//! Graph
//!  ├─ nodes        NodeId → Node      (keys unique, order irrelevant)
//!  ├─ edges        [(source, target)] (order preserved)
//!  ├─ input_type   TypeSpec           (empty when absent)
//!  ├─ output_type  TypeSpec           (empty when absent)
//!  ├─ metadata     String → Value     (empty when absent)
//!  └─ version      String
//! ```
//!
//! Edges that point at missing nodes are tolerated; they are reported by
//! [`Graph::dangling_edges`] rather than rejected.

use crate::{Edge, Metadata, Node, NodeId, TypeSpec};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A decoded NIR model.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Graph {
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: Vec<Edge>,
    pub input_type: TypeSpec,
    pub output_type: TypeSpec,
    pub metadata: Metadata,
    pub version: String,
}

impl Graph {
    /// Creates an empty graph with the given format version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            input_type: TypeSpec::new(),
            output_type: TypeSpec::new(),
            metadata: Metadata::new(),
            version: version.into(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Iterates over nodes in id order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Edges whose source or target is not a node of this graph.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| {
                !self.nodes.contains_key(e.source.as_str())
                    || !self.nodes.contains_key(e.target.as_str())
            })
            .collect()
    }

    /// Nodes that appear in no edge.
    ///
    /// A single-node graph without edges reports its node here too.
    pub fn isolated_nodes(&self) -> Vec<&NodeId> {
        let connected: BTreeSet<&str> = self
            .edges
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .collect();
        self.nodes
            .keys()
            .filter(|id| !connected.contains(id.as_str()))
            .collect()
    }

    /// Ids of `Unknown` placeholder nodes.
    pub fn placeholder_nodes(&self) -> Vec<&NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.is_placeholder())
            .map(|(id, _)| id)
            .collect()
    }

    /// Total parameter elements across all nodes.
    pub fn parameter_count(&self) -> usize {
        self.nodes.values().map(Node::parameter_count).sum()
    }

    /// Returns a summary string describing the graph.
    pub fn summary(&self) -> String {
        format!(
            "NIR graph v{}: {} nodes, {} edges, {} parameters",
            self.version,
            self.num_nodes(),
            self.num_edges(),
            self.parameter_count(),
        )
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for (id, node) in &self.nodes {
            writeln!(f, "  {id}: {}", node.summary())?;
        }
        for edge in &self.edges {
            writeln!(f, "  {edge}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeKind, Tensor};

    /// Helper: input → fc → output chain.
    fn make_chain() -> Graph {
        let mut g = Graph::new("1.0");
        g.nodes.insert(
            "input".into(),
            Node::new(NodeKind::Input {
                input_type: TypeSpec::single("input", vec![4]),
            }),
        );
        g.nodes.insert(
            "fc".into(),
            Node::new(NodeKind::Linear {
                weight: Tensor::new(vec![2, 4], vec![0.0; 8]).unwrap(),
            }),
        );
        g.nodes.insert(
            "output".into(),
            Node::new(NodeKind::Output {
                output_type: TypeSpec::single("output", vec![2]),
            }),
        );
        g.edges.push(Edge::new("input", "fc"));
        g.edges.push(Edge::new("fc", "output"));
        g
    }

    #[test]
    fn test_counts() {
        let g = make_chain();
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.parameter_count(), 8);
    }

    #[test]
    fn test_no_dangling_edges() {
        assert!(make_chain().dangling_edges().is_empty());
    }

    #[test]
    fn test_dangling_edges() {
        let mut g = make_chain();
        g.edges.push(Edge::new("fc", "ghost"));
        let dangling = g.dangling_edges();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].target.as_str(), "ghost");
    }

    #[test]
    fn test_isolated_nodes() {
        let mut g = make_chain();
        g.nodes.insert("lonely".into(), Node::new(NodeKind::Unknown));
        let isolated: Vec<_> = g.isolated_nodes().iter().map(|id| id.as_str()).collect();
        assert_eq!(isolated, vec!["lonely"]);
        assert_eq!(g.placeholder_nodes().len(), 1);
    }

    #[test]
    fn test_summary() {
        let s = make_chain().summary();
        assert!(s.contains("v1.0"));
        assert!(s.contains("3 nodes"));
        assert!(s.contains("2 edges"));
    }

    #[test]
    fn test_display() {
        let display = format!("{}", make_chain());
        assert!(display.contains("fc: Linear [2×4]"));
        assert!(display.contains("input → fc"));
    }

    #[test]
    fn test_node_lookup() {
        let g = make_chain();
        assert!(g.node("fc").is_some());
        assert!(g.node("missing").is_none());
        let ids: Vec<_> = g.iter_nodes().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["fc", "input", "output"]);
    }
}
