// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # nir-decode
//!
//! Decodes NIR models from their two on-disk encodings into one canonical
//! [`nir_ir::Graph`].
//!
//! - [`NirReader`] — routes input by file extension and owns the container
//!   backend.
//! - [`json`] — the JSON document reader.
//! - [`container`] — the hierarchical container capability, the bundled
//!   in-memory backend and the tree walker.
//! - [`decoder`] — raw record → typed node, with per-type defaults.
//! - [`edges`] / [`normalize`] — edge reconstruction and value coercions
//!   shared by both encodings.
//! - [`assemble`] — builds the graph from either reader's output.
//!
//! Problems below the node level never abort a decode; they are returned
//! as [`Diagnostic`]s in [`Decoded`].
//!
//! # Example
//! ```
//! use nir_decode::{DecoderConfig, NirReader};
//!
//! let doc = br#"{
//!     "nodes": {"fc": {"type": "Linear", "weight": [[1, 2], [3, 4]]}},
//!     "edges": [["fc", "fc"]]
//! }"#;
//! let reader = NirReader::new(DecoderConfig::default());
//! let decoded = reader.route(doc, "model.json").unwrap();
//! assert_eq!(decoded.graph.num_nodes(), 1);
//! assert_eq!(decoded.graph.num_edges(), 1);
//! ```

mod assembler;
pub mod config;
pub mod container;
pub mod decoder;
mod diagnostics;
pub mod edges;
mod error;
pub mod json;
pub mod normalize;
mod router;
pub mod source;

pub use assembler::{assemble, Decoded};
pub use config::DecoderConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{ContainerError, DecodeError};
pub use router::{route, FileFormat, NirReader};
pub use source::{RawGraphSource, RawNode, SourceFormat};
