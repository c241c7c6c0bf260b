// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Default values for optional node fields.

use nir_ir::Tensor;

/// Default convolution stride per spatial dimension.
pub const CONV_STRIDE: i64 = 1;
/// Default convolution padding per spatial dimension.
pub const CONV_PADDING: i64 = 0;
/// Default convolution dilation per spatial dimension.
pub const CONV_DILATION: i64 = 1;
/// Default convolution group count.
pub const CONV_GROUPS: i64 = 1;
/// Default pooling padding.
pub const POOL_PADDING: [i64; 2] = [0, 0];
/// Default `Flatten` start dimension (the batch dimension is kept).
pub const FLATTEN_START_DIM: i64 = 1;
/// Default `Flatten` end dimension.
pub const FLATTEN_END_DIM: i64 = -1;

/// Zeros shaped like `reference`, e.g. `v_reset` from `v_threshold`.
pub fn zeros_like(reference: &Tensor) -> Tensor {
    reference.full_like(0.0)
}

/// Ones shaped like `reference`, e.g. `w_in` from `tau_mem`.
pub fn ones_like(reference: &Tensor) -> Tensor {
    reference.full_like(1.0)
}

/// Repeats `value` once per spatial dimension.
pub fn per_spatial_dim(value: i64, dims: usize) -> Vec<i64> {
    vec![value; dims]
}

/// Zero bias with one entry per output channel of a convolution weight.
pub fn conv_bias(weight: &Tensor) -> Tensor {
    Tensor::zeros(weight.dim(0).unwrap_or(1))
}
