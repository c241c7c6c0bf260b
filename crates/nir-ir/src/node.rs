// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Node definitions for the NIR graph.
//!
//! Each [`Node`] is one computational unit: a neuron model, a linear or
//! convolutional layer, a pooling or reshaping step, or a nested subgraph.
//! The set of variants is closed; [`NodeType`] is the fieldless tag used
//! for dispatch and [`NodeKind`] carries the per-variant fields.

use crate::{Edge, Metadata, NodeId, Tensor, TypeSpec};
use std::collections::BTreeMap;

/// The type tag of a node, as written in both encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Affine,
    Conv1d,
    Conv2d,
    SumPool2d,
    AvgPool2d,
    Delay,
    Flatten,
    /// `I`: integrator.
    Integrator,
    /// `IF`: integrate-and-fire.
    IntegrateAndFire,
    Input,
    /// `LI`: leaky integrator.
    LeakyIntegrator,
    Linear,
    /// `LIF`: leaky integrate-and-fire.
    LeakyIntegrateAndFire,
    /// `CubaLI`: current-based leaky integrator.
    CubaLeakyIntegrator,
    /// `CubaLIF`: current-based leaky integrate-and-fire.
    CubaLeakyIntegrateAndFire,
    /// `NIRGraph`: a nested graph.
    Subgraph,
    Output,
    Scale,
    Threshold,
    /// Placeholder for a node that could not be decoded.
    Unknown,
}

impl NodeType {
    /// Every tag, in declaration order.
    pub const ALL: [NodeType; 20] = [
        Self::Affine,
        Self::Conv1d,
        Self::Conv2d,
        Self::SumPool2d,
        Self::AvgPool2d,
        Self::Delay,
        Self::Flatten,
        Self::Integrator,
        Self::IntegrateAndFire,
        Self::Input,
        Self::LeakyIntegrator,
        Self::Linear,
        Self::LeakyIntegrateAndFire,
        Self::CubaLeakyIntegrator,
        Self::CubaLeakyIntegrateAndFire,
        Self::Subgraph,
        Self::Output,
        Self::Scale,
        Self::Threshold,
        Self::Unknown,
    ];

    /// Parses a type tag. Tags are matched exactly.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Returns the tag as written in NIR files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Affine => "Affine",
            Self::Conv1d => "Conv1d",
            Self::Conv2d => "Conv2d",
            Self::SumPool2d => "SumPool2d",
            Self::AvgPool2d => "AvgPool2d",
            Self::Delay => "Delay",
            Self::Flatten => "Flatten",
            Self::Integrator => "I",
            Self::IntegrateAndFire => "IF",
            Self::Input => "Input",
            Self::LeakyIntegrator => "LI",
            Self::Linear => "Linear",
            Self::LeakyIntegrateAndFire => "LIF",
            Self::CubaLeakyIntegrator => "CubaLI",
            Self::CubaLeakyIntegrateAndFire => "CubaLIF",
            Self::Subgraph => "NIRGraph",
            Self::Output => "Output",
            Self::Scale => "Scale",
            Self::Threshold => "Threshold",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convolution padding: either explicit per-dimension amounts or a named
/// mode such as `"same"` / `"valid"`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Padding {
    Explicit(Vec<i64>),
    Named(String),
}

/// Fields shared by `Conv1d` and `Conv2d`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Conv {
    /// Spatial input shape, when the file records it.
    pub input_shape: Option<Vec<i64>>,
    /// Kernel weights, `[out_channels, in_channels / groups, *kernel]`.
    pub weight: Tensor,
    pub stride: Vec<i64>,
    pub padding: Padding,
    pub dilation: Vec<i64>,
    pub groups: i64,
    pub bias: Tensor,
}

/// Fields shared by `SumPool2d` and `AvgPool2d`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Pool {
    pub kernel_size: Vec<i64>,
    pub stride: Vec<i64>,
    pub padding: Vec<i64>,
}

/// The computation a node performs, with its parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Affine {
        weight: Tensor,
        bias: Tensor,
    },
    Conv1d(Conv),
    Conv2d(Conv),
    SumPool2d(Pool),
    AvgPool2d(Pool),
    Delay {
        delay: Tensor,
    },
    Flatten {
        start_dim: i64,
        end_dim: i64,
        input_type: TypeSpec,
    },
    #[serde(rename = "I")]
    Integrator {
        r: Tensor,
    },
    #[serde(rename = "IF")]
    IntegrateAndFire {
        r: Tensor,
        v_threshold: Tensor,
        v_reset: Tensor,
    },
    Input {
        input_type: TypeSpec,
    },
    #[serde(rename = "LI")]
    LeakyIntegrator {
        tau: Tensor,
        r: Tensor,
        v_leak: Tensor,
    },
    Linear {
        weight: Tensor,
    },
    #[serde(rename = "LIF")]
    LeakyIntegrateAndFire {
        tau: Tensor,
        r: Tensor,
        v_leak: Tensor,
        v_threshold: Tensor,
        v_reset: Tensor,
    },
    #[serde(rename = "CubaLI")]
    CubaLeakyIntegrator {
        tau_mem: Tensor,
        tau_syn: Tensor,
        r: Tensor,
        v_leak: Tensor,
        w_in: Tensor,
    },
    #[serde(rename = "CubaLIF")]
    CubaLeakyIntegrateAndFire {
        tau_mem: Tensor,
        tau_syn: Tensor,
        r: Tensor,
        v_leak: Tensor,
        v_threshold: Tensor,
        v_reset: Tensor,
        w_in: Tensor,
    },
    #[serde(rename = "NIRGraph")]
    Subgraph {
        nodes: BTreeMap<NodeId, Node>,
        edges: Vec<Edge>,
    },
    Output {
        output_type: TypeSpec,
    },
    Scale {
        scale: Tensor,
    },
    Threshold {
        threshold: Tensor,
    },
    Unknown,
}

impl NodeKind {
    /// Returns the fieldless tag for this variant.
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Affine { .. } => NodeType::Affine,
            Self::Conv1d(_) => NodeType::Conv1d,
            Self::Conv2d(_) => NodeType::Conv2d,
            Self::SumPool2d(_) => NodeType::SumPool2d,
            Self::AvgPool2d(_) => NodeType::AvgPool2d,
            Self::Delay { .. } => NodeType::Delay,
            Self::Flatten { .. } => NodeType::Flatten,
            Self::Integrator { .. } => NodeType::Integrator,
            Self::IntegrateAndFire { .. } => NodeType::IntegrateAndFire,
            Self::Input { .. } => NodeType::Input,
            Self::LeakyIntegrator { .. } => NodeType::LeakyIntegrator,
            Self::Linear { .. } => NodeType::Linear,
            Self::LeakyIntegrateAndFire { .. } => NodeType::LeakyIntegrateAndFire,
            Self::CubaLeakyIntegrator { .. } => NodeType::CubaLeakyIntegrator,
            Self::CubaLeakyIntegrateAndFire { .. } => NodeType::CubaLeakyIntegrateAndFire,
            Self::Subgraph { .. } => NodeType::Subgraph,
            Self::Output { .. } => NodeType::Output,
            Self::Scale { .. } => NodeType::Scale,
            Self::Threshold { .. } => NodeType::Threshold,
            Self::Unknown => NodeType::Unknown,
        }
    }

    /// The parameter tensors of this variant (not recursing into subgraphs).
    pub fn tensors(&self) -> Vec<&Tensor> {
        match self {
            Self::Affine { weight, bias } => vec![weight, bias],
            Self::Conv1d(c) | Self::Conv2d(c) => vec![&c.weight, &c.bias],
            Self::Delay { delay } => vec![delay],
            Self::Integrator { r } => vec![r],
            Self::IntegrateAndFire {
                r,
                v_threshold,
                v_reset,
            } => vec![r, v_threshold, v_reset],
            Self::LeakyIntegrator { tau, r, v_leak } => vec![tau, r, v_leak],
            Self::Linear { weight } => vec![weight],
            Self::LeakyIntegrateAndFire {
                tau,
                r,
                v_leak,
                v_threshold,
                v_reset,
            } => vec![tau, r, v_leak, v_threshold, v_reset],
            Self::CubaLeakyIntegrator {
                tau_mem,
                tau_syn,
                r,
                v_leak,
                w_in,
            } => vec![tau_mem, tau_syn, r, v_leak, w_in],
            Self::CubaLeakyIntegrateAndFire {
                tau_mem,
                tau_syn,
                r,
                v_leak,
                v_threshold,
                v_reset,
                w_in,
            } => vec![tau_mem, tau_syn, r, v_leak, v_threshold, v_reset, w_in],
            Self::Scale { scale } => vec![scale],
            Self::Threshold { threshold } => vec![threshold],
            Self::SumPool2d(_)
            | Self::AvgPool2d(_)
            | Self::Flatten { .. }
            | Self::Input { .. }
            | Self::Output { .. }
            | Self::Subgraph { .. }
            | Self::Unknown => Vec::new(),
        }
    }
}

/// A decoded node: its computation plus free-form metadata.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Node {
    /// Creates a node with empty metadata.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            metadata: Metadata::new(),
        }
    }

    /// Creates a node with the given metadata.
    pub fn with_metadata(kind: NodeKind, metadata: Metadata) -> Self {
        Self { kind, metadata }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Returns `true` for the `Unknown` placeholder variant.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::Unknown)
    }

    /// Total number of parameter elements, including nested subgraphs.
    pub fn parameter_count(&self) -> usize {
        let own: usize = self.kind.tensors().iter().map(|t| t.len()).sum();
        let nested: usize = match &self.kind {
            NodeKind::Subgraph { nodes, .. } => nodes.values().map(Node::parameter_count).sum(),
            _ => 0,
        };
        own + nested
    }

    /// One-line human-readable description.
    pub fn summary(&self) -> String {
        let shapes: Vec<String> = self.kind.tensors().iter().map(|t| t.to_string()).collect();
        match &self.kind {
            NodeKind::Subgraph { nodes, edges } => format!(
                "NIRGraph ({} nodes, {} edges, {} params)",
                nodes.len(),
                edges.len(),
                self.parameter_count()
            ),
            NodeKind::Input { input_type } => format!("Input {input_type}"),
            NodeKind::Output { output_type } => format!("Output {output_type}"),
            _ if shapes.is_empty() => self.node_type().to_string(),
            _ => format!("{} {}", self.node_type(), shapes.join(" ")),
        }
    }
}
