// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Decoder configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! default_version = "1.0"
//! strict_edges = false
//! allow_hdf5_extensions = false
//! heuristic_params = ["weight", "bias", "tau", "threshold"]
//! ```
//!
//! Every key is optional; missing keys take the [`Default`] values.

use crate::DecodeError;
use std::path::Path;

/// Parameter names that mark a top-level container group as a node during
/// heuristic discovery.
pub const DEFAULT_HEURISTIC_PARAMS: [&str; 4] = ["weight", "bias", "tau", "threshold"];

/// Configuration for the NIR decoder.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Version stamped on graphs whose source does not declare one.
    pub default_version: String,
    /// Reject unrecognised edge data instead of decoding it as no edges.
    pub strict_edges: bool,
    /// Route `.h5` / `.hdf5` files to the container decoder instead of
    /// rejecting them as unsupported.
    pub allow_hdf5_extensions: bool,
    /// Child names that identify a node group during heuristic discovery.
    pub heuristic_params: Vec<String>,
}

impl DecoderConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DecodeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DecodeError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, DecodeError> {
        toml::from_str(toml_str).map_err(|e| DecodeError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, DecodeError> {
        toml::to_string_pretty(self)
            .map_err(|e| DecodeError::Config(format!("TOML serialise error: {e}")))
    }

    /// Returns `true` if `name` is one of the heuristic parameter names.
    pub fn is_heuristic_param(&self, name: &str) -> bool {
        self.heuristic_params.iter().any(|p| p == name)
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            default_version: "1.0".to_string(),
            strict_edges: false,
            allow_hdf5_extensions: false,
            heuristic_params: DEFAULT_HEURISTIC_PARAMS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = DecoderConfig::default();
        assert_eq!(c.default_version, "1.0");
        assert!(!c.strict_edges);
        assert!(!c.allow_hdf5_extensions);
        assert!(c.is_heuristic_param("tau"));
        assert!(!c.is_heuristic_param("nodes"));
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
default_version = "0.2"
strict_edges = true
heuristic_params = ["weight", "kernel"]
"#;
        let c = DecoderConfig::from_toml(toml).unwrap();
        assert_eq!(c.default_version, "0.2");
        assert!(c.strict_edges);
        assert!(!c.allow_hdf5_extensions);
        assert!(c.is_heuristic_param("kernel"));
        assert!(!c.is_heuristic_param("tau"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(DecoderConfig::from_toml("").unwrap(), DecoderConfig::default());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = DecoderConfig {
            allow_hdf5_extensions: true,
            ..Default::default()
        };
        let back = DecoderConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            DecoderConfig::from_toml("strict_edges = \"maybe\""),
            Err(DecodeError::Config(_))
        ));
    }
}
