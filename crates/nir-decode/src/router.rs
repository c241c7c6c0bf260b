// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Format routing: picks a decode path from the file extension.
//!
//! | Extension       | Path                                                |
//! |-----------------|-----------------------------------------------------|
//! | `.json`         | JSON only                                           |
//! | `.nir`          | JSON, then container if JSON fails                  |
//! | `.h5` / `.hdf5` | container, if `allow_hdf5_extensions` is set        |
//! | anything else   | rejected before any decode attempt                  |

use crate::assembler::{assemble, Decoded};
use crate::config::DecoderConfig;
use crate::container::{walk, BackendSlot, ContainerBackend, ContainerInput, SessionGuard};
use crate::json::JsonSource;
use crate::DecodeError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The encoding implied by a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    /// `.nir`: JSON or container.
    Nir,
    Hdf5,
}

impl FileFormat {
    /// Classifies `filename` by extension, case-insensitively.
    ///
    /// # Errors
    /// [`DecodeError::UnsupportedFormat`] for any other extension.
    pub fn from_filename(filename: &str) -> Result<Self, DecodeError> {
        let extension = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "nir" => Ok(Self::Nir),
            "h5" | "hdf5" => Ok(Self::Hdf5),
            "" => Err(DecodeError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(DecodeError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Nir => "nir",
            Self::Hdf5 => "hdf5",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes NIR files of either encoding.
///
/// Cheap to clone and safe to share between threads; clones share the
/// container backend and its one-time initialisation.
///
/// # Example
/// ```
/// use nir_decode::NirReader;
///
/// let reader = NirReader::default();
/// let decoded = reader
///     .route(br#"{"nodes": {}, "edges": []}"#, "empty.json")
///     .unwrap();
/// assert_eq!(decoded.graph.version, "1.0");
/// ```
#[derive(Clone, Default)]
pub struct NirReader {
    config: DecoderConfig,
    backend: Option<Arc<BackendSlot>>,
}

impl NirReader {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            backend: None,
        }
    }

    /// Attaches a container backend.
    pub fn with_backend(self, backend: impl ContainerBackend + 'static) -> Self {
        self.with_backend_slot(Arc::new(BackendSlot::new(backend)))
    }

    /// Attaches a backend slot shared with other readers, so the backend
    /// is initialised once for all of them.
    pub fn with_backend_slot(mut self, slot: Arc<BackendSlot>) -> Self {
        self.backend = Some(slot);
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Initialises the container backend if that has not happened yet.
    ///
    /// # Errors
    /// [`DecodeError::ContainerIo`] if no backend is attached or its
    /// initialisation failed (now or on an earlier call).
    pub fn ensure_ready(&self) -> Result<(), DecodeError> {
        self.slot()?.ensure_ready()
    }

    /// Decodes `bytes`, choosing the path from `filename`'s extension.
    pub fn route(&self, bytes: &[u8], filename: &str) -> Result<Decoded, DecodeError> {
        let format = FileFormat::from_filename(filename)?;
        tracing::info!("decoding '{filename}' ({} bytes) as {format}", bytes.len());

        match format {
            FileFormat::Json => self.decode_json(bytes),
            FileFormat::Hdf5 if self.config.allow_hdf5_extensions => {
                self.decode_container(bytes, filename)
            }
            FileFormat::Hdf5 => {
                let extension = Path::new(filename)
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                Err(DecodeError::UnsupportedFormat(extension))
            }
            FileFormat::Nir => match self.decode_json(bytes) {
                Ok(decoded) => Ok(decoded),
                Err(e) if e.is_structural() => Err(e),
                Err(json_err) => {
                    tracing::debug!("'{filename}' is not JSON ({json_err}), trying container");
                    self.decode_container(bytes, filename)
                        .map_err(|container_err| DecodeError::Undecodable {
                            filename: filename.to_string(),
                            json: Box::new(json_err),
                            container: Box::new(container_err),
                        })
                }
            },
        }
    }

    /// Reads a file from disk and routes it by its name.
    pub fn read_file(&self, path: &Path) -> Result<Decoded, DecodeError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        // Reject unsupported names before touching the disk.
        FileFormat::from_filename(&filename)?;
        let bytes = std::fs::read(path)?;
        self.route(&bytes, &filename)
    }

    /// Decodes a JSON document.
    pub fn decode_json(&self, bytes: &[u8]) -> Result<Decoded, DecodeError> {
        assemble(JsonSource::parse(bytes)?, &self.config)
    }

    /// Decodes a container through the attached backend.
    pub fn decode_container(&self, bytes: &[u8], filename: &str) -> Result<Decoded, DecodeError> {
        let slot = self.slot()?;
        slot.ensure_ready()?;
        let backend = slot.backend();

        if !backend.accepts(bytes) {
            return Err(DecodeError::ContainerIo(format!(
                "'{filename}' is not a container the {} backend reads",
                backend.name()
            )));
        }

        let input = ContainerInput::new(bytes, filename);
        let session = backend
            .open(&input)
            .map_err(|e| DecodeError::ContainerIo(format!("cannot open '{filename}': {e}")))?;
        let guard = SessionGuard::new(session, backend.name());
        let source = walk(guard.root(), filename, &self.config)?;
        if let Err(e) = guard.close() {
            tracing::warn!("failed to close container session for '{filename}': {e}");
        }
        drop(input);

        assemble(source, &self.config)
    }

    fn slot(&self) -> Result<&BackendSlot, DecodeError> {
        self.backend
            .as_deref()
            .ok_or_else(|| DecodeError::ContainerIo("no container backend configured".to_string()))
    }
}

impl fmt::Debug for NirReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NirReader")
            .field("config", &self.config)
            .field("backend", &self.backend)
            .finish()
    }
}

/// Decodes `bytes` with a default, JSON-only reader.
pub fn route(bytes: &[u8], filename: &str) -> Result<Decoded, DecodeError> {
    NirReader::default().route(bytes, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_classification() {
        assert_eq!(FileFormat::from_filename("a.json").unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_filename("A.NIR").unwrap(), FileFormat::Nir);
        assert_eq!(FileFormat::from_filename("m.Hdf5").unwrap(), FileFormat::Hdf5);
        assert!(matches!(
            FileFormat::from_filename("model.onnx"),
            Err(DecodeError::UnsupportedFormat(ext)) if ext == ".onnx"
        ));
        assert!(FileFormat::from_filename("README").is_err());
    }

    #[test]
    fn test_hdf5_gated_by_config() {
        let err = route(b"\x89HDF\r\n\x1a\n", "model.h5").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(ext) if ext == ".h5"));
    }

    #[test]
    fn test_json_only_reader_reports_missing_backend() {
        let err = route(b"\x89HDF\r\n\x1a\n", "model.nir").unwrap_err();
        match err {
            DecodeError::Undecodable { json, container, .. } => {
                assert!(matches!(*json, DecodeError::MalformedDocument(_)));
                assert!(matches!(*container, DecodeError::ContainerIo(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reader_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<NirReader>();
    }
}
