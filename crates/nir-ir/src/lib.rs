// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # nir-ir
//!
//! The canonical in-memory form of a NIR (Neuromorphic Intermediate
//! Representation) model, independent of the encoding it was read from.
//!
//! - [`Value`] — a raw, dynamically typed value as found in a JSON document
//!   or a hierarchical container before it is decoded.
//! - [`Tensor`] — a dense, row-major parameter array (weights, time
//!   constants, thresholds).
//! - [`TypeSpec`] — the tensor shape flowing through each named port.
//! - [`Node`] / [`NodeKind`] — one computational unit, as a closed set of
//!   variants, plus its metadata.
//! - [`NodeType`] — the fieldless type tag used for dispatch.
//! - [`Graph`] — nodes, ordered edges, graph ports, metadata and version.
//!
//! Decoding from files lives in the `nir-decode` crate; this crate only
//! defines the shapes the decoder produces.
//!
//! # Example
//! ```
//! use nir_ir::{Edge, Graph, Node, NodeKind, Tensor};
//!
//! let mut graph = Graph::new("1.0");
//! graph.nodes.insert(
//!     "fc".into(),
//!     Node::new(NodeKind::Linear { weight: Tensor::vector(vec![1.0, 2.0]) }),
//! );
//! graph.edges.push(Edge::new("fc", "fc"));
//! assert_eq!(graph.num_nodes(), 1);
//! assert!(graph.dangling_edges().is_empty());
//! ```

mod error;
pub mod graph;
mod node;
mod tensor;
mod types;
mod value;

pub use error::IrError;
pub use graph::Graph;
pub use node::{Conv, Node, NodeKind, NodeType, Padding, Pool};
pub use tensor::Tensor;
pub use types::{Edge, Metadata, NodeId, TypeSpec};
pub use value::Value;
