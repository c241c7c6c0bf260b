// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared setup.

pub mod check;
pub mod inspect;

use anyhow::Context;
use nir_decode::{DecoderConfig, NirReader};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` repetitions pick the level.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds a reader from an optional TOML config file.
pub fn reader(config: Option<&Path>) -> anyhow::Result<NirReader> {
    let config = match config {
        Some(path) => DecoderConfig::from_file(path)
            .with_context(|| format!("failed to load config from '{}'", path.display()))?,
        None => DecoderConfig::default(),
    };
    tracing::debug!("decoder config: {config:?}");
    Ok(NirReader::new(config))
}

/// Decodes `file`, attaching the path to any error.
pub fn decode(reader: &NirReader, file: &Path) -> anyhow::Result<nir_decode::Decoded> {
    reader
        .read_file(file)
        .with_context(|| format!("failed to decode '{}'", file.display()))
}
