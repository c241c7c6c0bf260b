// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Hierarchical container access.
//!
//! The decoder never talks to a container library directly. It consumes
//! the small capability defined here:
//! - [`ContainerBackend`] — initialises once, recognises and opens inputs
//! - [`ContainerSession`] — one open input, closed by a [`SessionGuard`]
//! - [`ContainerGroup`] — a group of named children, each a subgroup or
//!   a dataset
//!
//! [`MemoryBackend`] serves an in-memory tree. Bindings to a real HDF5
//! library implement the same traits outside this crate.

mod input;
mod memory;
mod readiness;
mod session;
mod walker;

pub use input::ContainerInput;
pub use memory::{MemoryBackend, MemoryEntry, MemoryGroup};
pub use readiness::BackendSlot;
pub use session::SessionGuard;
pub use walker::{walk, ContainerSource, Layout};

use crate::ContainerError;
use nir_ir::Value;

/// The 8-byte HDF5 format signature.
pub const HDF5_SIGNATURE: [u8; 8] = *b"\x89HDF\r\n\x1a\n";

/// One child of a container group.
pub enum Entry {
    Group(Box<dyn ContainerGroup>),
    Dataset(Value),
}

impl Entry {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::Dataset(_) => "dataset",
        }
    }
}

/// A group of named children.
pub trait ContainerGroup {
    /// Child names in storage order.
    fn keys(&self) -> Result<Vec<String>, ContainerError>;

    /// Reads the child called `key`.
    fn get(&self, key: &str) -> Result<Entry, ContainerError>;
}

/// An open container. Its root is a group.
pub trait ContainerSession: ContainerGroup {
    fn root(&self) -> &dyn ContainerGroup;

    /// Releases the backend's handle on the input.
    fn close(&mut self) -> Result<(), ContainerError>;
}

/// A container library binding.
pub trait ContainerBackend: Send + Sync {
    fn name(&self) -> &str;

    /// One-time process-wide setup. Called at most once per
    /// [`BackendSlot`], before any `open`.
    fn initialize(&self) -> Result<(), ContainerError> {
        Ok(())
    }

    /// Returns `true` if `bytes` look like a container this backend reads.
    fn accepts(&self, bytes: &[u8]) -> bool {
        has_hdf5_signature(bytes)
    }

    fn open(&self, input: &ContainerInput<'_>) -> Result<Box<dyn ContainerSession>, ContainerError>;
}

/// Checks for the HDF5 signature at offset 0 or at any power-of-two
/// offset from 512 onwards (files with a user block).
pub fn has_hdf5_signature(bytes: &[u8]) -> bool {
    let mut offset = 0usize;
    while offset + HDF5_SIGNATURE.len() <= bytes.len() {
        if bytes[offset..offset + HDF5_SIGNATURE.len()] == HDF5_SIGNATURE {
            return true;
        }
        offset = if offset == 0 { 512 } else { offset * 2 };
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_at_start() {
        let mut bytes = HDF5_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0; 16]);
        assert!(has_hdf5_signature(&bytes));
    }

    #[test]
    fn test_signature_after_user_block() {
        let mut bytes = vec![0u8; 1024];
        bytes.extend_from_slice(&HDF5_SIGNATURE);
        assert!(has_hdf5_signature(&bytes));

        let mut misplaced = vec![0u8; 700];
        misplaced.extend_from_slice(&HDF5_SIGNATURE);
        assert!(!has_hdf5_signature(&misplaced));
    }

    #[test]
    fn test_no_signature() {
        assert!(!has_hdf5_signature(b"{\"nodes\": {}}"));
        assert!(!has_hdf5_signature(b""));
    }
}
