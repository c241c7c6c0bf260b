// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Recovered decode problems.
//!
//! Leaf-level failures never abort a decode. Each one is recorded as a
//! [`Diagnostic`] (and logged at `warn` level) so callers and tests can
//! inspect exactly what was skipped or replaced.

use std::fmt;

/// The category of a recovered problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An optional field, metadata entry or heuristic group could not be
    /// read and was omitted.
    FieldDecodeFailure,
    /// A node could not be decoded and was replaced by an `Unknown`
    /// placeholder.
    NodePlaceholder,
    /// An edge refers to a node id that is not in the graph.
    DanglingEdge,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FieldDecodeFailure => "field_decode_failure",
            Self::NodePlaceholder => "node_placeholder",
            Self::DanglingEdge => "dangling_edge",
        }
    }
}

/// One recovered problem and where it happened.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Path of the offending item, e.g. `node/metadata/author` or a node id.
    pub location: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.as_str(), self.location, self.message)
    }
}

/// Collects diagnostics during one decode call.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and emits it as a warning.
    pub fn record(
        &mut self,
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            location: location.into(),
            message: message.into(),
        };
        tracing::warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Vec<Diagnostic>) {
        self.items.extend(other);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
