// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! One-time backend initialisation.

use super::ContainerBackend;
use crate::DecodeError;
use std::sync::OnceLock;

/// A container backend plus its initialisation state.
///
/// [`ensure_ready`](Self::ensure_ready) runs the backend's `initialize`
/// exactly once. Concurrent callers block until the first one finishes and
/// all observe the same outcome, including a failure.
pub struct BackendSlot {
    backend: Box<dyn ContainerBackend>,
    ready: OnceLock<Result<(), String>>,
}

impl BackendSlot {
    pub fn new(backend: impl ContainerBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            ready: OnceLock::new(),
        }
    }

    pub fn backend(&self) -> &dyn ContainerBackend {
        self.backend.as_ref()
    }

    /// Initialises the backend on first call; later calls return the
    /// cached outcome.
    pub fn ensure_ready(&self) -> Result<(), DecodeError> {
        let outcome = self.ready.get_or_init(|| {
            tracing::info!("initialising container backend '{}'", self.backend.name());
            self.backend.initialize().map_err(|e| {
                tracing::warn!("container backend '{}' failed to initialise: {e}", self.backend.name());
                e.to_string()
            })
        });
        outcome
            .clone()
            .map_err(|e| DecodeError::ContainerIo(format!("backend initialisation failed: {e}")))
    }

    /// Returns `true` once initialisation has completed successfully.
    pub fn is_ready(&self) -> bool {
        matches!(self.ready.get(), Some(Ok(())))
    }
}

impl std::fmt::Debug for BackendSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSlot")
            .field("backend", &self.backend.name())
            .field("ready", &self.ready.get())
            .finish()
    }
}
