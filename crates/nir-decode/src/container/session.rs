// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! RAII guard that closes a container session on drop.
//!
//! The walker reads through a [`SessionGuard`]; whether it returns
//! normally, bails out with `?` or panics, the session is closed exactly
//! once.

use super::{ContainerGroup, ContainerSession};
use crate::ContainerError;

/// Owns an open [`ContainerSession`] and closes it when dropped.
///
/// # Example
/// ```ignore
/// let guard = SessionGuard::new(backend.open(&input)?, backend.name());
/// let source = walk(guard.root(), "model.nir", &config)?;
/// guard.close()?;            // explicit close, error reported
/// // or just drop(guard);    // close, error logged
/// ```
pub struct SessionGuard {
    session: Box<dyn ContainerSession>,
    /// Backend name for log messages.
    backend: String,
    closed: bool,
}

impl SessionGuard {
    pub fn new(session: Box<dyn ContainerSession>, backend: impl Into<String>) -> Self {
        Self {
            session,
            backend: backend.into(),
            closed: false,
        }
    }

    /// The session's root group.
    pub fn root(&self) -> &dyn ContainerGroup {
        self.session.root()
    }

    /// Closes the session, reporting any error to the caller.
    pub fn close(mut self) -> Result<(), ContainerError> {
        self.closed = true;
        self.session.close()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.session.close() {
            tracing::warn!("failed to close {} container session: {e}", self.backend);
        }
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("backend", &self.backend)
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{ContainerBackend, ContainerInput, MemoryBackend, MemoryGroup};

    fn open(backend: &MemoryBackend) -> SessionGuard {
        let input = ContainerInput::new(b"", "m.nir");
        SessionGuard::new(backend.open(&input).unwrap(), backend.name())
    }

    #[test]
    fn test_drop_closes() {
        let backend = MemoryBackend::new(MemoryGroup::new().with_dataset("version", "1.0"));
        let guard = open(&backend);
        assert_eq!(backend.open_sessions(), 1);
        assert_eq!(guard.root().keys().unwrap(), vec!["version".to_string()]);
        drop(guard);
        assert_eq!(backend.open_sessions(), 0);
    }

    #[test]
    fn test_explicit_close_once() {
        let backend = MemoryBackend::new(MemoryGroup::new());
        let guard = open(&backend);
        guard.close().unwrap();
        assert_eq!(backend.open_sessions(), 0);
        assert_eq!(backend.sessions_closed(), 1);
    }
}
