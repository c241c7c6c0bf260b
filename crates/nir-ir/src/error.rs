// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for converting raw values into IR types.

/// Errors that can occur when building IR values from raw data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IrError {
    /// Nested lists do not form a rectangular array.
    #[error("ragged array: {detail}")]
    RaggedTensor { detail: String },

    /// A tensor element is not a number.
    #[error("expected a numeric element, found {0}")]
    NonNumeric(&'static str),

    /// The element count does not match the product of the dimensions.
    #[error("shape {shape:?} needs {expected} elements, got {actual}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// A type specification is not a port → shape mapping.
    #[error("invalid type specification: {0}")]
    InvalidTypeSpec(String),
}
