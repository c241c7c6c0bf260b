// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Raw record → typed [`Node`] decoding.
//!
//! The `type` tag selects the variant; each variant pulls its required
//! fields and fills optional ones from [`defaults`]. Records from both
//! encodings go through the same path, so a container node and its JSON
//! equivalent decode to equal nodes.

pub mod defaults;

use crate::edges::to_edges;
use crate::normalize::{as_scalar, as_text, normalize, normalize_metadata};
use crate::DecodeError;
use nir_ir::{
    Conv, Metadata, Node, NodeId, NodeKind, NodeType, Padding, Pool, Tensor, TypeSpec, Value,
};
use std::collections::BTreeMap;

/// Decodes one raw node record.
///
/// # Errors
/// - [`DecodeError::MissingField`] if there is no `type` tag or a required
///   parameter is absent
/// - [`DecodeError::UnknownNodeType`] if the tag is not a known node type
/// - [`DecodeError::InvalidField`] if a parameter has the wrong shape
pub fn decode_node(raw: &Value) -> Result<Node, DecodeError> {
    let record = raw.as_map().ok_or_else(|| DecodeError::InvalidField {
        node_type: "node".to_string(),
        field: "record".to_string(),
        detail: format!("expected a map, found {}", raw.kind_name()),
    })?;

    let tag_value = record
        .get("type")
        .filter(|v| !v.is_null())
        .ok_or_else(|| DecodeError::MissingField {
            node_type: "node".to_string(),
            field: "type".to_string(),
        })?;
    let tag = as_text(tag_value).ok_or_else(|| DecodeError::InvalidField {
        node_type: "node".to_string(),
        field: "type".to_string(),
        detail: format!("expected text, found {}", tag_value.kind_name()),
    })?;
    let node_type =
        NodeType::from_tag(&tag).ok_or_else(|| DecodeError::UnknownNodeType(tag.clone()))?;

    let fields = Fields { node_type, record };
    let kind = decode_kind(&fields)?;

    let metadata = match record.get("metadata") {
        Some(value) if !value.is_null() => normalize_metadata(value).unwrap_or_else(|| {
            tracing::debug!(
                "{node_type} node metadata is a {}, ignoring it",
                value.kind_name()
            );
            Metadata::new()
        }),
        _ => Metadata::new(),
    };

    Ok(Node::with_metadata(kind, metadata))
}

/// Builds the `Unknown` node that stands in for a record that failed to
/// decode.
pub fn placeholder(id: &NodeId, error: &str) -> Node {
    let mut metadata = Metadata::new();
    metadata.insert("name".to_string(), Value::from(id.as_str()));
    metadata.insert("error".to_string(), Value::from(error));
    Node::with_metadata(NodeKind::Unknown, metadata)
}

fn decode_kind(f: &Fields<'_>) -> Result<NodeKind, DecodeError> {
    use NodeType as T;

    let kind = match f.node_type {
        T::Affine => NodeKind::Affine {
            weight: f.tensor("weight")?,
            bias: f.tensor("bias")?,
        },
        T::Linear => NodeKind::Linear {
            weight: f.tensor("weight")?,
        },
        T::Conv1d => NodeKind::Conv1d(conv(f, 1)?),
        T::Conv2d => NodeKind::Conv2d(conv(f, 2)?),
        T::SumPool2d => NodeKind::SumPool2d(pool(f)?),
        T::AvgPool2d => NodeKind::AvgPool2d(pool(f)?),
        T::Delay => NodeKind::Delay {
            delay: f.tensor("delay")?,
        },
        T::Flatten => NodeKind::Flatten {
            start_dim: f.int("start_dim")?.unwrap_or(defaults::FLATTEN_START_DIM),
            end_dim: f.int("end_dim")?.unwrap_or(defaults::FLATTEN_END_DIM),
            input_type: f.flatten_input_type()?,
        },
        T::Integrator => NodeKind::Integrator { r: f.tensor("r")? },
        T::IntegrateAndFire => {
            let v_threshold = f.tensor("v_threshold")?;
            NodeKind::IntegrateAndFire {
                r: f.tensor("r")?,
                v_reset: f.tensor_or("v_reset", || defaults::zeros_like(&v_threshold))?,
                v_threshold,
            }
        }
        T::LeakyIntegrator => NodeKind::LeakyIntegrator {
            tau: f.tensor("tau")?,
            r: f.tensor("r")?,
            v_leak: f.tensor("v_leak")?,
        },
        T::LeakyIntegrateAndFire => {
            let v_threshold = f.tensor("v_threshold")?;
            NodeKind::LeakyIntegrateAndFire {
                tau: f.tensor("tau")?,
                r: f.tensor("r")?,
                v_leak: f.tensor("v_leak")?,
                v_reset: f.tensor_or("v_reset", || defaults::zeros_like(&v_threshold))?,
                v_threshold,
            }
        }
        T::CubaLeakyIntegrator => {
            let tau_mem = f.tensor("tau_mem")?;
            NodeKind::CubaLeakyIntegrator {
                tau_syn: f.tensor("tau_syn")?,
                r: f.tensor("r")?,
                v_leak: f.tensor("v_leak")?,
                w_in: f.tensor_or("w_in", || defaults::ones_like(&tau_mem))?,
                tau_mem,
            }
        }
        T::CubaLeakyIntegrateAndFire => {
            let tau_mem = f.tensor("tau_mem")?;
            let v_threshold = f.tensor("v_threshold")?;
            NodeKind::CubaLeakyIntegrateAndFire {
                tau_syn: f.tensor("tau_syn")?,
                r: f.tensor("r")?,
                v_leak: f.tensor("v_leak")?,
                v_reset: f.tensor_or("v_reset", || defaults::zeros_like(&v_threshold))?,
                w_in: f.tensor_or("w_in", || defaults::ones_like(&tau_mem))?,
                tau_mem,
                v_threshold,
            }
        }
        T::Input => NodeKind::Input {
            input_type: f.port_type("input_type", "input")?,
        },
        T::Output => NodeKind::Output {
            output_type: f.port_type("output_type", "output")?,
        },
        T::Scale => NodeKind::Scale {
            scale: f.tensor("scale")?,
        },
        T::Threshold => NodeKind::Threshold {
            threshold: f.tensor("threshold")?,
        },
        T::Subgraph => subgraph(f)?,
        T::Unknown => NodeKind::Unknown,
    };
    Ok(kind)
}

fn conv(f: &Fields<'_>, spatial_dims: usize) -> Result<Conv, DecodeError> {
    let weight = f.tensor("weight")?;
    let padding = match f.get("padding") {
        None => Padding::Explicit(defaults::per_spatial_dim(defaults::CONV_PADDING, spatial_dims)),
        Some(value) => match as_text(value) {
            Some(mode) => Padding::Named(mode),
            None => Padding::Explicit(broadcast(f.ints_of("padding", value)?, spatial_dims)),
        },
    };
    Ok(Conv {
        input_shape: f.ints("input_shape")?,
        stride: f
            .ints("stride")?
            .map(|s| broadcast(s, spatial_dims))
            .unwrap_or_else(|| defaults::per_spatial_dim(defaults::CONV_STRIDE, spatial_dims)),
        dilation: f
            .ints("dilation")?
            .map(|d| broadcast(d, spatial_dims))
            .unwrap_or_else(|| defaults::per_spatial_dim(defaults::CONV_DILATION, spatial_dims)),
        groups: f.int("groups")?.unwrap_or(defaults::CONV_GROUPS),
        bias: f.tensor_or("bias", || defaults::conv_bias(&weight))?,
        padding,
        weight,
    })
}

fn pool(f: &Fields<'_>) -> Result<Pool, DecodeError> {
    let kernel_size = f.ints("kernel_size")?.ok_or_else(|| f.missing("kernel_size"))?;
    Ok(Pool {
        stride: f.ints("stride")?.unwrap_or_else(|| kernel_size.clone()),
        padding: f
            .ints("padding")?
            .unwrap_or_else(|| defaults::POOL_PADDING.to_vec()),
        kernel_size,
    })
}

fn subgraph(f: &Fields<'_>) -> Result<NodeKind, DecodeError> {
    let raw_nodes = f.get("nodes").ok_or_else(|| f.missing("nodes"))?;
    let raw_nodes = raw_nodes
        .as_map()
        .ok_or_else(|| f.invalid("nodes", format!("expected a map, found {}", raw_nodes.kind_name())))?;

    let mut nodes = BTreeMap::new();
    for (id, raw) in raw_nodes {
        nodes.insert(NodeId::new(id.clone()), decode_node(raw)?);
    }
    let edges = f.get("edges").map(to_edges).unwrap_or_default();

    Ok(NodeKind::Subgraph { nodes, edges })
}

/// A single spatial value applies to every spatial dimension.
fn broadcast(values: Vec<i64>, spatial_dims: usize) -> Vec<i64> {
    match values.as_slice() {
        [single] if spatial_dims > 1 => defaults::per_spatial_dim(*single, spatial_dims),
        _ => values,
    }
}

/// Field accessors for one raw record, tagged with its node type for
/// error reporting. A `null` field counts as absent.
struct Fields<'a> {
    node_type: NodeType,
    record: &'a BTreeMap<String, Value>,
}

impl Fields<'_> {
    fn get(&self, name: &str) -> Option<&Value> {
        self.record.get(name).filter(|v| !v.is_null())
    }

    fn missing(&self, name: &str) -> DecodeError {
        DecodeError::MissingField {
            node_type: self.node_type.to_string(),
            field: name.to_string(),
        }
    }

    fn invalid(&self, name: &str, detail: impl Into<String>) -> DecodeError {
        DecodeError::InvalidField {
            node_type: self.node_type.to_string(),
            field: name.to_string(),
            detail: detail.into(),
        }
    }

    fn tensor(&self, name: &str) -> Result<Tensor, DecodeError> {
        self.opt_tensor(name)?.ok_or_else(|| self.missing(name))
    }

    fn tensor_or(
        &self,
        name: &str,
        default: impl FnOnce() -> Tensor,
    ) -> Result<Tensor, DecodeError> {
        Ok(self.opt_tensor(name)?.unwrap_or_else(default))
    }

    fn opt_tensor(&self, name: &str) -> Result<Option<Tensor>, DecodeError> {
        self.get(name)
            .map(|v| Tensor::from_value(v).map_err(|e| self.invalid(name, e.to_string())))
            .transpose()
    }

    fn int(&self, name: &str) -> Result<Option<i64>, DecodeError> {
        self.get(name)
            .map(|v| {
                as_scalar(v).as_i64().ok_or_else(|| {
                    self.invalid(name, format!("expected an integer, found {}", v.kind_name()))
                })
            })
            .transpose()
    }

    fn ints(&self, name: &str) -> Result<Option<Vec<i64>>, DecodeError> {
        self.get(name).map(|v| self.ints_of(name, v)).transpose()
    }

    fn ints_of(&self, name: &str, value: &Value) -> Result<Vec<i64>, DecodeError> {
        value.as_int_list().ok_or_else(|| {
            self.invalid(
                name,
                format!("expected integers, found {}", value.kind_name()),
            )
        })
    }

    /// Port types for `Input` / `Output`: a `shape` field wins, then a
    /// map-valued `<field>`.
    fn port_type(&self, field: &str, port: &str) -> Result<TypeSpec, DecodeError> {
        if let Some(shape) = self.get("shape") {
            return Ok(TypeSpec::single(port, self.ints_of("shape", shape)?));
        }
        match self.get(field).map(normalize) {
            Some(value @ Value::Map(_)) => {
                TypeSpec::from_value(&value).map_err(|e| self.invalid(field, e.to_string()))
            }
            _ => Err(self.missing("shape")),
        }
    }

    fn flatten_input_type(&self) -> Result<TypeSpec, DecodeError> {
        match self.get("input_type").map(normalize) {
            None => Ok(TypeSpec::new()),
            Some(value @ Value::Map(_)) => TypeSpec::from_value(&value)
                .map_err(|e| self.invalid("input_type", e.to_string())),
            Some(value) => Ok(TypeSpec::single(
                "input",
                self.ints_of("input_type", &value)?,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(v: serde_json::Value) -> Result<Node, DecodeError> {
        decode_node(&Value::from(v))
    }

    #[test]
    fn test_linear() {
        let node = decode(json!({"type": "Linear", "weight": [[1, 2], [3, 4]]})).unwrap();
        match node.kind {
            NodeKind::Linear { weight } => {
                assert_eq!(weight.shape(), &[2, 2]);
                assert_eq!(weight.data(), &[1.0, 2.0, 3.0, 4.0]);
            }
            other => panic!("expected Linear, got {other:?}"),
        }
    }

    /// Smallest record carrying every required field of `t`.
    fn minimal_record(t: NodeType) -> serde_json::Value {
        use NodeType as T;
        let v = json!([1.0, 2.0]);
        let mut record = match t {
            T::Affine => json!({"weight": [[1.0, 0.0], [0.0, 1.0]], "bias": v}),
            T::Linear => json!({"weight": [[1.0, 0.0], [0.0, 1.0]]}),
            T::Conv1d => json!({"weight": [[[1.0, 1.0, 1.0]]]}),
            T::Conv2d => json!({"weight": [[[[1.0, 1.0], [1.0, 1.0]]]]}),
            T::SumPool2d | T::AvgPool2d => json!({"kernel_size": [2, 2]}),
            T::Delay => json!({"delay": v}),
            T::Flatten => json!({}),
            T::Integrator => json!({"r": v}),
            T::IntegrateAndFire => json!({"r": v, "v_threshold": v}),
            T::LeakyIntegrator => json!({"tau": v, "r": v, "v_leak": v}),
            T::LeakyIntegrateAndFire => {
                json!({"tau": v, "r": v, "v_leak": v, "v_threshold": v})
            }
            T::CubaLeakyIntegrator => {
                json!({"tau_mem": v, "tau_syn": v, "r": v, "v_leak": v})
            }
            T::CubaLeakyIntegrateAndFire => {
                json!({"tau_mem": v, "tau_syn": v, "r": v, "v_leak": v, "v_threshold": v})
            }
            T::Input | T::Output => json!({"shape": [2]}),
            T::Scale => json!({"scale": v}),
            T::Threshold => json!({"threshold": v}),
            T::Subgraph => json!({"nodes": {"s": {"type": "Scale", "scale": v}}}),
            T::Unknown => json!({}),
        };
        record["type"] = json!(t.as_str());
        record
    }

    #[test]
    fn test_every_type_decodes_with_required_fields() {
        for t in NodeType::ALL {
            let node = decode(minimal_record(t))
                .unwrap_or_else(|e| panic!("{t} failed to decode: {e}"));
            assert_eq!(node.node_type(), t);
        }
    }

    #[test]
    fn test_lif_default_reset() {
        let node = decode(json!({
            "type": "LIF",
            "tau": [0.01, 0.02, 0.03],
            "r": [1, 1, 1],
            "v_leak": [0, 0, 0],
            "v_threshold": [1, 1, 1],
        }))
        .unwrap();
        match node.kind {
            NodeKind::LeakyIntegrateAndFire { v_reset, .. } => {
                assert_eq!(v_reset.data(), &[0.0, 0.0, 0.0]);
            }
            other => panic!("expected LIF, got {other:?}"),
        }
    }

    #[test]
    fn test_cuba_lif_defaults() {
        let node = decode(json!({
            "type": "CubaLIF",
            "tau_mem": [0.1, 0.1],
            "tau_syn": [0.2, 0.2],
            "r": [1, 1],
            "v_leak": [0, 0],
            "v_threshold": [1, 1],
        }))
        .unwrap();
        match node.kind {
            NodeKind::CubaLeakyIntegrateAndFire { v_reset, w_in, .. } => {
                assert_eq!(v_reset.data(), &[0.0, 0.0]);
                assert_eq!(w_in.data(), &[1.0, 1.0]);
            }
            other => panic!("expected CubaLIF, got {other:?}"),
        }
    }

    #[test]
    fn test_if_explicit_reset_kept() {
        let node = decode(json!({
            "type": "IF", "r": [1.0], "v_threshold": [2.0], "v_reset": [-1.0]
        }))
        .unwrap();
        match node.kind {
            NodeKind::IntegrateAndFire { v_reset, .. } => assert_eq!(v_reset.data(), &[-1.0]),
            other => panic!("expected IF, got {other:?}"),
        }
    }

    #[test]
    fn test_conv2d_defaults() {
        let node = decode(json!({
            "type": "Conv2d",
            "weight": [[[[1, 0], [0, 1]]], [[[1, 1], [1, 1]]]],
            "stride": 2,
        }))
        .unwrap();
        match node.kind {
            NodeKind::Conv2d(c) => {
                assert_eq!(c.weight.shape(), &[2, 1, 2, 2]);
                assert_eq!(c.stride, vec![2, 2]);
                assert_eq!(c.padding, Padding::Explicit(vec![0, 0]));
                assert_eq!(c.dilation, vec![1, 1]);
                assert_eq!(c.groups, 1);
                assert_eq!(c.bias.data(), &[0.0, 0.0]);
                assert_eq!(c.input_shape, None);
            }
            other => panic!("expected Conv2d, got {other:?}"),
        }
    }

    #[test]
    fn test_conv1d_named_padding() {
        let node = decode(json!({
            "type": "Conv1d", "weight": [[[1, 2, 3]]], "padding": "same", "input_shape": [16]
        }))
        .unwrap();
        match node.kind {
            NodeKind::Conv1d(c) => {
                assert_eq!(c.padding, Padding::Named("same".to_string()));
                assert_eq!(c.stride, vec![1]);
                assert_eq!(c.input_shape, Some(vec![16]));
            }
            other => panic!("expected Conv1d, got {other:?}"),
        }
    }

    #[test]
    fn test_pool_stride_defaults_to_kernel() {
        let node = decode(json!({"type": "SumPool2d", "kernel_size": [2, 2]})).unwrap();
        match node.kind {
            NodeKind::SumPool2d(p) => {
                assert_eq!(p.stride, vec![2, 2]);
                assert_eq!(p.padding, vec![0, 0]);
            }
            other => panic!("expected SumPool2d, got {other:?}"),
        }
    }

    #[test]
    fn test_flatten_input_type_forms() {
        let wrapped = decode(json!({"type": "Flatten", "input_type": [1, 28, 28]})).unwrap();
        match wrapped.kind {
            NodeKind::Flatten {
                start_dim,
                end_dim,
                input_type,
            } => {
                assert_eq!(start_dim, 1);
                assert_eq!(end_dim, -1);
                assert_eq!(input_type.get("input"), Some(&[1, 28, 28][..]));
            }
            other => panic!("expected Flatten, got {other:?}"),
        }

        let mapped = decode(json!({"type": "Flatten", "input_type": {"x": [4]}, "start_dim": 0}))
            .unwrap();
        match mapped.kind {
            NodeKind::Flatten {
                start_dim,
                input_type,
                ..
            } => {
                assert_eq!(start_dim, 0);
                assert_eq!(input_type.get("x"), Some(&[4][..]));
            }
            other => panic!("expected Flatten, got {other:?}"),
        }
    }

    #[test]
    fn test_input_output_shapes() {
        let input = decode(json!({"type": "Input", "shape": [784]})).unwrap();
        match input.kind {
            NodeKind::Input { input_type } => assert_eq!(input_type.get("input"), Some(&[784][..])),
            other => panic!("expected Input, got {other:?}"),
        }

        let output = decode(json!({"type": "Output", "output_type": {"output": [10]}})).unwrap();
        match output.kind {
            NodeKind::Output { output_type } => {
                assert_eq!(output_type.get("output"), Some(&[10][..]))
            }
            other => panic!("expected Output, got {other:?}"),
        }

        assert!(matches!(
            decode(json!({"type": "Input"})),
            Err(DecodeError::MissingField { field, .. }) if field == "shape"
        ));
    }

    #[test]
    fn test_byte_tag() {
        let mut record = BTreeMap::new();
        record.insert(
            "type".to_string(),
            Value::List(vec![Value::from(b"Scale".to_vec())]),
        );
        record.insert("scale".to_string(), Value::Float(2.0));
        let node = decode_node(&Value::Map(record)).unwrap();
        assert_eq!(node.node_type(), NodeType::Scale);
    }

    #[test]
    fn test_unknown_tag() {
        assert!(matches!(
            decode(json!({"type": "Mystery"})),
            Err(DecodeError::UnknownNodeType(tag)) if tag == "Mystery"
        ));
    }

    #[test]
    fn test_missing_tag_and_field() {
        assert!(matches!(
            decode(json!({"weight": [1]})),
            Err(DecodeError::MissingField { field, .. }) if field == "type"
        ));
        assert!(matches!(
            decode(json!({"type": "Affine", "weight": [[1]]})),
            Err(DecodeError::MissingField { node_type, field }) if node_type == "Affine" && field == "bias"
        ));
    }

    #[test]
    fn test_invalid_field() {
        assert!(matches!(
            decode(json!({"type": "Linear", "weight": [[1, 2], [3]]})),
            Err(DecodeError::InvalidField { field, .. }) if field == "weight"
        ));
    }

    #[test]
    fn test_subgraph() {
        let node = decode(json!({
            "type": "NIRGraph",
            "nodes": {
                "in": {"type": "Input", "shape": [2]},
                "out": {"type": "Output", "shape": [2]},
            },
            "edges": [["in", "out"]],
        }))
        .unwrap();
        match node.kind {
            NodeKind::Subgraph { nodes, edges } => {
                assert_eq!(nodes.len(), 2);
                assert_eq!(edges.len(), 1);
                assert_eq!(edges[0].source.as_str(), "in");
            }
            other => panic!("expected NIRGraph, got {other:?}"),
        }
    }

    #[test]
    fn test_metadata_normalized() {
        let mut meta = BTreeMap::new();
        meta.insert("author".to_string(), Value::from(b"lab".to_vec()));
        let mut record = BTreeMap::new();
        record.insert("type".to_string(), Value::from("Unknown"));
        record.insert("metadata".to_string(), Value::Map(meta));

        let node = decode_node(&Value::Map(record)).unwrap();
        assert!(node.is_placeholder());
        assert_eq!(node.metadata.get("author"), Some(&Value::from("lab")));
    }

    #[test]
    fn test_placeholder() {
        let node = placeholder(&NodeId::from("n1"), "boom");
        assert_eq!(node.node_type(), NodeType::Unknown);
        assert_eq!(node.metadata.get("name"), Some(&Value::from("n1")));
        assert_eq!(node.metadata.get("error"), Some(&Value::from("boom")));
    }
}
