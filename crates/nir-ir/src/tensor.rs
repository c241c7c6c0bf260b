// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dense parameter arrays.
//!
//! NIR parameters (weights, biases, time constants, thresholds) arrive as
//! nested lists of numbers. [`Tensor`] keeps them as a flat row-major
//! buffer plus a shape, so consumers do not have to re-walk the nesting.
//! Values are kept as `f64`; the decoder does not judge their numerical
//! sanity.

use crate::{IrError, Value};
use std::fmt;

/// A dense, row-major array of numbers.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Tensor {
    /// Creates a tensor, checking that `data` fills `shape` exactly.
    ///
    /// # Examples
    /// ```
    /// use nir_ir::Tensor;
    /// let t = Tensor::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(t.rank(), 2);
    /// assert!(Tensor::new(vec![2, 2], vec![1.0]).is_err());
    /// ```
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, IrError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(IrError::ShapeMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Creates a 1-D tensor.
    pub fn vector(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Creates a 1-D tensor of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self::filled(len, 0.0)
    }

    /// Creates a 1-D tensor of `len` copies of `value`.
    pub fn filled(len: usize, value: f64) -> Self {
        Self::vector(vec![value; len])
    }

    /// Creates a tensor shaped like `self` with every element set to `value`.
    pub fn full_like(&self, value: f64) -> Self {
        Self {
            shape: self.shape.clone(),
            data: vec![value; self.data.len()],
        }
    }

    /// Builds a tensor from a raw value.
    ///
    /// Nested lists must be rectangular. A bare numeric scalar becomes a
    /// one-element vector, matching how containers store single-valued
    /// parameters.
    pub fn from_value(value: &Value) -> Result<Self, IrError> {
        if value.is_scalar() {
            let x = value.as_f64().ok_or(IrError::NonNumeric(value.kind_name()))?;
            return Ok(Self::vector(vec![x]));
        }
        let mut shape = Vec::new();
        let mut data = Vec::new();
        collect(value, 0, &mut shape, &mut data)?;
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of dimension `index`, or `None` if out of bounds.
    pub fn dim(&self, index: usize) -> Option<usize> {
        self.shape.get(index).copied()
    }
}

/// Depth-first walk recording the extent of each nesting level.
///
/// The first descent reaches the deepest level before any element is
/// pushed, so a new level discovered after data exists means the nesting
/// is uneven.
fn collect(
    value: &Value,
    depth: usize,
    shape: &mut Vec<usize>,
    data: &mut Vec<f64>,
) -> Result<(), IrError> {
    match value {
        Value::List(items) => {
            if depth == shape.len() {
                if !data.is_empty() {
                    return Err(IrError::RaggedTensor {
                        detail: format!("unexpected nested list at depth {depth}"),
                    });
                }
                shape.push(items.len());
            } else if shape[depth] != items.len() {
                return Err(IrError::RaggedTensor {
                    detail: format!(
                        "depth {depth} has length {} but an earlier sibling had {}",
                        items.len(),
                        shape[depth]
                    ),
                });
            }
            for item in items {
                collect(item, depth + 1, shape, data)?;
            }
            Ok(())
        }
        Value::Map(_) => Err(IrError::NonNumeric("map")),
        scalar => {
            if depth != shape.len() {
                return Err(IrError::RaggedTensor {
                    detail: format!("scalar found at depth {depth}, expected depth {}", shape.len()),
                });
            }
            let x = scalar.as_f64().ok_or(IrError::NonNumeric(scalar.kind_name()))?;
            data.push(x);
            Ok(())
        }
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.shape.iter().map(|d| d.to_string()).collect();
        write!(f, "[{}]", dims.join("×"))
    }
}
