// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Container tree → [`ContainerSource`].
//!
//! Three layouts are recognised, tried in order:
//! 1. **Standard** — `nodes/<id>/...`, `edges`, `input_type`,
//!    `output_type`, `metadata` at the root.
//! 2. **Legacy** — the same sections under a single `node/` group, with an
//!    optional shared `node/type` dataset.
//! 3. **Heuristic** — no node collection at all; any top-level group whose
//!    children include a known parameter name is taken as a node. Groups
//!    tagged with an unknown type are skipped; untagged groups become
//!    `Unknown` nodes that keep their datasets as metadata.
//!
//! Every read failure below the root is recovered: a failing field or
//! section becomes a diagnostic, a failing node becomes a failed raw node
//! that the assembler replaces with a placeholder.

use super::{ContainerGroup, Entry};
use crate::config::DecoderConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::normalize::{as_text, normalize};
use crate::source::{RawGraphSource, RawNode, SourceFormat};
use crate::{DecodeError, Diagnostic};
use nir_ir::{NodeId, NodeType, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Top-level keys that are never nodes.
const RESERVED_KEYS: [&str; 4] = ["edges", "input_type", "output_type", "metadata"];

/// How the walker found the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Standard,
    Legacy,
    Heuristic,
    /// No nodes found by any strategy.
    Empty,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standard => "standard",
            Self::Legacy => "legacy",
            Self::Heuristic => "heuristic",
            Self::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// Everything read from one container, detached from the session.
#[derive(Debug)]
pub struct ContainerSource {
    layout: Layout,
    nodes: Vec<(NodeId, Result<Value, String>)>,
    edges: Option<Value>,
    input_type: Option<Value>,
    output_type: Option<Value>,
    metadata: Value,
    version: Option<Value>,
    diagnostics: Diagnostics,
}

impl ContainerSource {
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Graph-level metadata, including provenance.
    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

impl RawGraphSource for ContainerSource {
    fn format(&self) -> SourceFormat {
        SourceFormat::Container
    }

    fn node_iter(&self) -> Box<dyn Iterator<Item = RawNode<'_>> + '_> {
        Box::new(self.nodes.iter().map(|(id, record)| RawNode {
            id: id.clone(),
            record: record.as_ref().map_err(String::as_str),
        }))
    }

    fn edge_source(&self) -> Option<&Value> {
        self.edges.as_ref()
    }

    fn metadata_source(&self) -> Option<&Value> {
        Some(&self.metadata)
    }

    fn input_type_source(&self) -> Option<&Value> {
        self.input_type.as_ref()
    }

    fn output_type_source(&self) -> Option<&Value> {
        self.output_type.as_ref()
    }

    fn version_source(&self) -> Option<&Value> {
        self.version.as_ref()
    }

    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics).into_vec()
    }
}

/// Reads a container tree rooted at `root`.
///
/// # Errors
/// [`DecodeError::ContainerIo`] only if the root group cannot be listed.
/// Everything below the root degrades into diagnostics.
pub fn walk(
    root: &dyn ContainerGroup,
    filename: &str,
    config: &DecoderConfig,
) -> Result<ContainerSource, DecodeError> {
    let keys = root
        .keys()
        .map_err(|e| DecodeError::ContainerIo(format!("cannot list root group: {e}")))?;
    tracing::debug!("container root of '{filename}' has keys: {}", keys.join(", "));

    let mut walker = Walker {
        config,
        diagnostics: Diagnostics::new(),
    };
    let mut source = ContainerSource {
        layout: Layout::Empty,
        nodes: Vec::new(),
        edges: None,
        input_type: None,
        output_type: None,
        metadata: Value::Map(BTreeMap::new()),
        version: None,
        diagnostics: Diagnostics::new(),
    };

    walker.read_sections(root, &keys, "", &mut source);

    if contains(&keys, "nodes") {
        source.layout = Layout::Standard;
        source.nodes = walker.read_nodes(root, "nodes");
    } else if contains(&keys, "node") {
        source.layout = Layout::Legacy;
        match root.get("node") {
            Ok(Entry::Group(group)) => walker.read_legacy(group.as_ref(), &mut source),
            Ok(other) => walker.field_failure(
                "node",
                format!("expected a group, found a {}", other.kind_name()),
            ),
            Err(e) => walker.field_failure("node", e.to_string()),
        }
    }

    if source.nodes.is_empty() {
        let discovered = walker.discover(root, &keys);
        source.layout = if discovered.is_empty() {
            Layout::Empty
        } else {
            Layout::Heuristic
        };
        source.nodes = discovered;
    }

    stamp_provenance(&mut source.metadata, filename);
    source.diagnostics = walker.diagnostics;

    tracing::info!(
        "read {} node(s) from '{filename}' ({} layout)",
        source.nodes.len(),
        source.layout
    );
    Ok(source)
}

fn contains(keys: &[String], key: &str) -> bool {
    keys.iter().any(|k| k == key)
}

/// Records where and when a container graph was decoded.
///
/// `metadata` is always a map; only map values are ever stored in it.
fn stamp_provenance(metadata: &mut Value, filename: &str) {
    if let Value::Map(map) = metadata {
        map.insert("parsed_from".to_string(), Value::from("HDF5"));
        map.insert("original_filename".to_string(), Value::from(filename));
        map.insert(
            "parsed_date".to_string(),
            Value::from(chrono::Utc::now().to_rfc3339()),
        );
    }
}

struct Walker<'c> {
    config: &'c DecoderConfig,
    diagnostics: Diagnostics,
}

impl Walker<'_> {
    fn field_failure(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.diagnostics
            .record(DiagnosticKind::FieldDecodeFailure, location, message);
    }

    /// Reads `edges`, `input_type`, `output_type`, `metadata` and `version`
    /// from `group` into `source`, overriding earlier values.
    fn read_sections(
        &mut self,
        group: &dyn ContainerGroup,
        keys: &[String],
        prefix: &str,
        source: &mut ContainerSource,
    ) {
        for section in ["edges", "input_type", "output_type", "metadata", "version"] {
            if !contains(keys, section) {
                continue;
            }
            let location = format!("{prefix}{section}");
            let value = match group.get(section) {
                Ok(Entry::Dataset(v)) => normalize(&v),
                Ok(Entry::Group(g)) => self.read_tree(g.as_ref(), &location),
                Err(e) => {
                    self.field_failure(location, e.to_string());
                    continue;
                }
            };
            match section {
                "edges" => source.edges = Some(value),
                "input_type" => source.input_type = Some(value),
                "output_type" => source.output_type = Some(value),
                "version" => source.version = Some(value),
                _ => match value {
                    map @ Value::Map(_) => source.metadata = map,
                    other => self.field_failure(
                        location,
                        format!("expected a group, found a {}", other.kind_name()),
                    ),
                },
            }
        }
    }

    fn read_legacy(&mut self, node: &dyn ContainerGroup, source: &mut ContainerSource) {
        let keys = match node.keys() {
            Ok(keys) => keys,
            Err(e) => {
                self.field_failure("node", e.to_string());
                return;
            }
        };

        self.read_sections(node, &keys, "node/", source);
        if contains(&keys, "nodes") {
            source.nodes = self.read_nodes(node, "node/nodes");
        }

        if contains(&keys, "type") {
            match node.get("type") {
                Ok(Entry::Dataset(v)) => mirror_shared_type(&normalize(&v), source),
                Ok(other) => self.field_failure(
                    "node/type",
                    format!("expected a dataset, found a {}", other.kind_name()),
                ),
                Err(e) => self.field_failure("node/type", e.to_string()),
            }
        }
    }

    /// Reads every child of the `nodes` collection at `path`.
    fn read_nodes(
        &mut self,
        parent: &dyn ContainerGroup,
        path: &str,
    ) -> Vec<(NodeId, Result<Value, String>)> {
        let name = path.rsplit('/').next().unwrap_or(path);
        let collection = match parent.get(name) {
            Ok(Entry::Group(g)) => g,
            Ok(other) => {
                self.field_failure(path, format!("expected a group, found a {}", other.kind_name()));
                return Vec::new();
            }
            Err(e) => {
                self.field_failure(path, e.to_string());
                return Vec::new();
            }
        };
        let ids = match collection.keys() {
            Ok(ids) => ids,
            Err(e) => {
                self.field_failure(path, e.to_string());
                return Vec::new();
            }
        };

        ids.into_iter()
            .map(|id| {
                let location = format!("{path}/{id}");
                let record = match collection.get(&id) {
                    Ok(Entry::Group(g)) => self.read_node(g.as_ref(), &location),
                    Ok(other) => Err(format!("expected a group, found a {}", other.kind_name())),
                    Err(e) => Err(e.to_string()),
                };
                (NodeId::new(id), record)
            })
            .collect()
    }

    /// Reads one node group. Fails only if the group cannot be listed.
    fn read_node(&mut self, group: &dyn ContainerGroup, location: &str) -> Result<Value, String> {
        group
            .keys()
            .map_err(|e| e.to_string())
            .map(|keys| self.read_children(group, &keys, location))
    }

    /// Recursive group → map conversion. Children that fail to read are
    /// omitted and recorded.
    fn read_tree(&mut self, group: &dyn ContainerGroup, location: &str) -> Value {
        match group.keys() {
            Ok(keys) => self.read_children(group, &keys, location),
            Err(e) => {
                self.field_failure(location, e.to_string());
                Value::Map(BTreeMap::new())
            }
        }
    }

    fn read_children(&mut self, group: &dyn ContainerGroup, keys: &[String], location: &str) -> Value {
        let mut map = BTreeMap::new();
        for key in keys {
            let child = format!("{location}/{key}");
            match group.get(key) {
                Ok(Entry::Dataset(v)) => {
                    map.insert(key.clone(), normalize(&v));
                }
                Ok(Entry::Group(g)) => {
                    let value = self.read_tree(g.as_ref(), &child);
                    map.insert(key.clone(), value);
                }
                Err(e) => self.field_failure(child, e.to_string()),
            }
        }
        Value::Map(map)
    }

    /// Heuristic node discovery over the top-level groups.
    fn discover(
        &mut self,
        root: &dyn ContainerGroup,
        keys: &[String],
    ) -> Vec<(NodeId, Result<Value, String>)> {
        let mut nodes = Vec::new();
        for key in keys.iter().filter(|k| !RESERVED_KEYS.contains(&k.as_str())) {
            let group = match root.get(key) {
                Ok(Entry::Group(g)) => g,
                Ok(Entry::Dataset(_)) => continue,
                Err(e) => {
                    self.field_failure(key.as_str(), e.to_string());
                    continue;
                }
            };
            let children = match group.keys() {
                Ok(children) => children,
                Err(e) => {
                    self.field_failure(key.as_str(), e.to_string());
                    continue;
                }
            };
            if !children.iter().any(|c| self.config.is_heuristic_param(c)) {
                continue;
            }

            let record = self.read_children(group.as_ref(), &children, key);
            // Outer `None`: no tag. Inner `None`: a tag that is not text,
            // left for the node decoder to reject.
            let tag: Option<Option<String>> =
                record.get("type").filter(|v| !v.is_null()).map(as_text);
            let record = match tag {
                None => {
                    self.diagnostics.record(
                        DiagnosticKind::NodePlaceholder,
                        key.as_str(),
                        "group has parameters but no type tag, kept as Unknown",
                    );
                    untyped_record(key, record)
                }
                Some(Some(tag)) if NodeType::from_tag(&tag).is_none() => {
                    self.field_failure(
                        key.as_str(),
                        format!("unknown node type '{tag}', group skipped"),
                    );
                    continue;
                }
                Some(_) => record,
            };
            tracing::debug!("treating top-level group '{key}' as a node");
            nodes.push((NodeId::new(key.clone()), Ok(record)));
        }
        nodes
    }
}

/// Wraps the datasets of a typeless group as the metadata of an `Unknown`
/// node so its parameters survive decoding.
fn untyped_record(name: &str, record: Value) -> Value {
    let mut metadata = match record {
        Value::Map(map) => map,
        _ => BTreeMap::new(),
    };
    metadata
        .entry("name".to_string())
        .or_insert_with(|| Value::from(name));

    let mut wrapped = BTreeMap::new();
    wrapped.insert("type".to_string(), Value::from(NodeType::Unknown.as_str()));
    wrapped.insert("metadata".to_string(), Value::Map(metadata));
    Value::Map(wrapped)
}

/// Mirrors a shared `node/type` shape into both graph ports.
///
/// Only integer shapes can describe a port; any other value (a type tag
/// such as `"NIRGraph"`) is left alone.
fn mirror_shared_type(value: &Value, source: &mut ContainerSource) {
    if value.as_int_list().is_none() {
        tracing::debug!("node/type is a {}, not a shape; not mirroring it", value.kind_name());
        return;
    }
    let port = |name: &str| {
        let mut map = BTreeMap::new();
        map.insert(name.to_string(), value.clone());
        Value::Map(map)
    };
    source.input_type = Some(port("input"));
    source.output_type = Some(port("output"));
}
