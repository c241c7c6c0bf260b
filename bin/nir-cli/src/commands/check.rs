// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `nir-inspect check` command: integrity report for a decoded graph.
//!
//! Exits with an error when the graph has dangling edges, isolated nodes
//! or placeholder nodes, or when decoding recovered from any problem.

use nir_decode::NirReader;
use std::path::PathBuf;

pub fn execute(reader: &NirReader, file: PathBuf) -> anyhow::Result<()> {
    let decoded = super::decode(reader, &file)?;
    let graph = &decoded.graph;

    let dangling = graph.dangling_edges();
    let isolated = graph.isolated_nodes();
    let placeholders = graph.placeholder_nodes();

    println!("  {}", graph.summary());
    println!("  Encoding: {}", decoded.format);
    println!();

    report("Dangling edges", dangling.iter().map(|e| e.to_string()));
    report("Isolated nodes", isolated.iter().map(|id| id.to_string()));
    report("Placeholder nodes", placeholders.iter().map(|id| id.to_string()));
    report(
        "Recovered problems",
        decoded.diagnostics.iter().map(|d| d.to_string()),
    );

    let problems = dangling.len() + isolated.len() + placeholders.len() + decoded.diagnostics.len();
    if problems > 0 {
        anyhow::bail!("'{}' has {problems} integrity problem(s)", file.display());
    }

    println!("  OK");
    Ok(())
}

fn report(title: &str, items: impl Iterator<Item = String>) {
    let items: Vec<String> = items.collect();
    println!("  {title}: {}", items.len());
    for item in &items {
        println!("   - {item}");
    }
}
