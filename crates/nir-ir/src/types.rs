// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Identifiers, edges and port type specifications.

use crate::{IrError, Value};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Free-form metadata attached to a graph or a node.
pub type Metadata = BTreeMap<String, Value>;

/// Opaque node identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source, self.target)
    }
}

/// Tensor shape per named port, e.g. `{input: [784]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct TypeSpec(BTreeMap<String, Vec<i64>>);

impl TypeSpec {
    /// Creates an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a specification with a single port.
    pub fn single(port: impl Into<String>, shape: Vec<i64>) -> Self {
        let mut spec = Self::new();
        spec.insert(port, shape);
        spec
    }

    /// Parses a port → shape mapping.
    ///
    /// Each port value may be a list of integers or a single integer
    /// (stored as a one-element shape).
    pub fn from_value(value: &Value) -> Result<Self, IrError> {
        let map = value.as_map().ok_or_else(|| {
            IrError::InvalidTypeSpec(format!("expected a map, found {}", value.kind_name()))
        })?;
        let mut spec = Self::new();
        for (port, shape) in map {
            let dims = shape.as_int_list().ok_or_else(|| {
                IrError::InvalidTypeSpec(format!(
                    "port '{port}' has a non-integer shape ({})",
                    shape.kind_name()
                ))
            })?;
            spec.insert(port.clone(), dims);
        }
        Ok(spec)
    }

    pub fn insert(&mut self, port: impl Into<String>, shape: Vec<i64>) {
        self.0.insert(port.into(), shape);
    }

    pub fn get(&self, port: &str) -> Option<&[i64]> {
        self.0.get(port).map(Vec::as_slice)
    }

    /// Iterates over `(port, shape)` pairs in port-name order.
    pub fn ports(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .ports()
            .map(|(port, shape)| format!("{port}: {shape:?}"))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
