// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! In-memory container backend.
//!
//! [`MemoryBackend`] serves a prebuilt [`MemoryGroup`] tree for every
//! accepted input. Embedders that already hold a decoded container (from
//! their own HDF5 bindings, say) use it to reach the shared decoding path.
//! It also counts open sessions so callers can check that none leak.

use super::{ContainerBackend, ContainerGroup, ContainerInput, ContainerSession, Entry};
use crate::ContainerError;
use nir_ir::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One child of a [`MemoryGroup`].
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryEntry {
    Group(MemoryGroup),
    Dataset(Value),
    /// A dataset the producer could not convert; reading it fails with the
    /// stored reason.
    Unreadable(String),
}

/// An in-memory group with children in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryGroup {
    entries: Vec<(String, MemoryEntry)>,
}

impl MemoryGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a child, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, entry: MemoryEntry) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((name, entry)),
        }
    }

    pub fn with_group(mut self, name: impl Into<String>, group: MemoryGroup) -> Self {
        self.insert(name, MemoryEntry::Group(group));
        self
    }

    pub fn with_dataset(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, MemoryEntry::Dataset(value.into()));
        self
    }

    pub fn with_unreadable(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.insert(name, MemoryEntry::Unreadable(reason.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ContainerGroup for MemoryGroup {
    fn keys(&self) -> Result<Vec<String>, ContainerError> {
        Ok(self.entries.iter().map(|(n, _)| n.clone()).collect())
    }

    fn get(&self, key: &str) -> Result<Entry, ContainerError> {
        let (_, entry) = self
            .entries
            .iter()
            .find(|(n, _)| n == key)
            .ok_or_else(|| ContainerError::new(format!("no such entry '{key}'")))?;
        match entry {
            MemoryEntry::Group(g) => Ok(Entry::Group(Box::new(g.clone()))),
            MemoryEntry::Dataset(v) => Ok(Entry::Dataset(v.clone())),
            MemoryEntry::Unreadable(reason) => Err(ContainerError::new(format!(
                "cannot read dataset '{key}': {reason}"
            ))),
        }
    }
}

#[derive(Debug, Default)]
struct SessionCounters {
    open: AtomicUsize,
    closed: AtomicUsize,
}

/// A backend serving one in-memory tree.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    root: MemoryGroup,
    counters: Arc<SessionCounters>,
}

impl MemoryBackend {
    pub fn new(root: MemoryGroup) -> Self {
        Self {
            root,
            counters: Arc::new(SessionCounters::default()),
        }
    }

    /// Sessions opened and not yet closed.
    pub fn open_sessions(&self) -> usize {
        self.counters.open.load(Ordering::SeqCst)
    }

    /// Sessions closed so far.
    pub fn sessions_closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }
}

impl ContainerBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn open(&self, input: &ContainerInput<'_>) -> Result<Box<dyn ContainerSession>, ContainerError> {
        tracing::debug!(
            "opening in-memory container for '{}' ({} bytes)",
            input.filename(),
            input.bytes().len()
        );
        self.counters.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            root: self.root.clone(),
            counters: self.counters.clone(),
            closed: false,
        }))
    }
}

struct MemorySession {
    root: MemoryGroup,
    counters: Arc<SessionCounters>,
    closed: bool,
}

impl ContainerGroup for MemorySession {
    fn keys(&self) -> Result<Vec<String>, ContainerError> {
        self.root.keys()
    }

    fn get(&self, key: &str) -> Result<Entry, ContainerError> {
        self.root.get(key)
    }
}

impl ContainerSession for MemorySession {
    fn root(&self) -> &dyn ContainerGroup {
        &self.root
    }

    fn close(&mut self) -> Result<(), ContainerError> {
        if self.closed {
            return Err(ContainerError::new("session already closed"));
        }
        self.closed = true;
        self.counters.open.fetch_sub(1, Ordering::SeqCst);
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
