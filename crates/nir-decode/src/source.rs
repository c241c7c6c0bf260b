// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The encoding-neutral view the assembler consumes.
//!
//! Each encoding's reader produces a [`RawGraphSource`]: raw node records
//! plus the raw graph-level sections. Everything after that point (node
//! decoding, edge reconstruction, defaults) is shared.

use crate::Diagnostic;
use nir_ir::{NodeId, Value};
use std::fmt;

/// Which encoding a graph was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum SourceFormat {
    Json,
    /// Hierarchical container (HDF5 layout).
    Container,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Container => "HDF5",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw node as read from the source.
///
/// `record` is `Err` when the reader could not even produce a record (a
/// container group that failed to list); the assembler then emits a
/// placeholder node.
#[derive(Debug, Clone)]
pub struct RawNode<'a> {
    pub id: NodeId,
    pub record: Result<&'a Value, &'a str>,
}

/// Raw graph sections from one encoding.
pub trait RawGraphSource {
    fn format(&self) -> SourceFormat;

    /// Raw node records in source order.
    fn node_iter(&self) -> Box<dyn Iterator<Item = RawNode<'_>> + '_>;

    fn edge_source(&self) -> Option<&Value>;

    fn metadata_source(&self) -> Option<&Value>;

    fn input_type_source(&self) -> Option<&Value>;

    fn output_type_source(&self) -> Option<&Value>;

    fn version_source(&self) -> Option<&Value>;

    /// Diagnostics recorded while reading the source. Drains them.
    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        Vec::new()
    }
}
