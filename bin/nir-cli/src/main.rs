// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # nir-inspect
//!
//! Command-line inspector for NIR model files.
//!
//! ## Usage
//! ```bash
//! # Print the decoded graph
//! nir-inspect inspect --file ./models/lif_chain.nir
//!
//! # Dump the canonical graph as JSON
//! nir-inspect inspect --file ./models/lif_chain.json --json
//!
//! # Integrity report; exits non-zero on problems
//! nir-inspect check --file ./models/lif_chain.nir --config decoder.toml
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nir-inspect",
    about = "Decode and inspect NIR (Neuromorphic Intermediate Representation) files",
    version,
    author
)]
struct Cli {
    /// Path to a TOML decoder configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a file and print its nodes, edges, ports and metadata.
    Inspect {
        /// Path to a `.json` or `.nir` file.
        #[arg(short, long)]
        file: PathBuf,

        /// Print the canonical graph as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Decode a file and report dangling edges, isolated and placeholder nodes.
    Check {
        /// Path to a `.json` or `.nir` file.
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let reader = commands::reader(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { file, json } => commands::inspect::execute(&reader, file, json),
        Commands::Check { file } => commands::check::execute(&reader, file),
    }
}
