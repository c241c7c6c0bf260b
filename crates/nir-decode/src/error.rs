// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for NIR decoding.

/// Errors that abort a decode call.
///
/// Recoverable problems (one unreadable metadata entry, a node that had to
/// be replaced by a placeholder) are not errors; they are reported as
/// [`Diagnostic`](crate::Diagnostic)s next to the decoded graph.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The file extension is not one the router handles.
    #[error("unsupported file format '{0}': expected .json or .nir")]
    UnsupportedFormat(String),

    /// The JSON text could not be parsed, or lacks `nodes` / `edges`.
    #[error("malformed NIR document: {0}")]
    MalformedDocument(String),

    /// A node's type tag is not one of the known NIR node types.
    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),

    /// A node lacks a field its type requires.
    #[error("{node_type} node is missing required field '{field}'")]
    MissingField { node_type: String, field: String },

    /// A node field is present but has the wrong shape or type.
    #[error("{node_type} node has invalid field '{field}': {detail}")]
    InvalidField {
        node_type: String,
        field: String,
        detail: String,
    },

    /// The edge list has an unrecognised shape (strict mode only).
    #[error("malformed edge list: {0}")]
    MalformedEdges(String),

    /// The container backend failed to initialise, open or read the input.
    #[error("container I/O failure: {0}")]
    ContainerIo(String),

    /// A `.nir` file was neither a JSON document nor a readable container.
    #[error(
        "cannot decode '{filename}': not a valid JSON NIR document ({json}) \
         and not a readable container ({container})"
    )]
    Undecodable {
        filename: String,
        json: Box<DecodeError>,
        container: Box<DecodeError>,
    },

    /// Reading the input file failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The decoder configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DecodeError {
    /// Returns `true` for failures that invalidate a document whose
    /// encoding was recognised, so no other encoding should be tried.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::UnknownNodeType(_) | Self::MalformedEdges(_))
    }
}

/// A failure reported by a container backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ContainerError(pub String);

impl ContainerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<ContainerError> for DecodeError {
    fn from(e: ContainerError) -> Self {
        Self::ContainerIo(e.0)
    }
}
