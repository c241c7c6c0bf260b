// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Container input handed to a backend.

use crate::ContainerError;
use std::cell::OnceCell;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Borrowed container bytes plus the name they arrived under.
///
/// Backends that can only open paths call [`path`](Self::path), which
/// writes the bytes to a temporary file on first use. The file is removed
/// when the input is dropped, whether or not decoding succeeded.
#[derive(Debug)]
pub struct ContainerInput<'a> {
    bytes: &'a [u8],
    filename: &'a str,
    staged: OnceCell<NamedTempFile>,
}

impl<'a> ContainerInput<'a> {
    pub fn new(bytes: &'a [u8], filename: &'a str) -> Self {
        Self {
            bytes,
            filename,
            staged: OnceCell::new(),
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn filename(&self) -> &'a str {
        self.filename
    }

    /// Path of a temporary file holding the bytes, created on first call.
    pub fn path(&self) -> Result<&Path, ContainerError> {
        if let Some(file) = self.staged.get() {
            return Ok(file.path());
        }

        let mut file = tempfile::Builder::new()
            .prefix("nir-")
            .suffix(".h5")
            .tempfile()
            .map_err(|e| ContainerError::new(format!("cannot create staging file: {e}")))?;
        file.write_all(self.bytes)
            .and_then(|_| file.flush())
            .map_err(|e| ContainerError::new(format!("cannot write staging file: {e}")))?;
        tracing::debug!(
            "staged {} bytes of '{}' at {}",
            self.bytes.len(),
            self.filename,
            file.path().display()
        );

        Ok(self.staged.get_or_init(|| file).path())
    }

    /// Returns `true` once [`path`](Self::path) has staged the bytes.
    pub fn is_staged(&self) -> bool {
        self.staged.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_staging() {
        let bytes = b"payload".to_vec();
        let input = ContainerInput::new(&bytes, "model.nir");
        assert!(!input.is_staged());

        let path = input.path().unwrap().to_path_buf();
        assert!(input.is_staged());
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
        assert_eq!(input.path().unwrap(), path.as_path());

        drop(input);
        assert!(!path.exists());
    }
}
