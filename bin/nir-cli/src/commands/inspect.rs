// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `nir-inspect inspect` command: print a decoded graph.

use nir_decode::NirReader;
use nir_ir::{Graph, TypeSpec};
use std::path::PathBuf;

pub fn execute(reader: &NirReader, file: PathBuf, json: bool) -> anyhow::Result<()> {
    let decoded = super::decode(reader, &file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decoded.graph)?);
        return Ok(());
    }

    let graph = &decoded.graph;
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               nir-inspect · Graph View               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // ── Summary ────────────────────────────────────────────────
    println!("  File: {}", file.display());
    println!("  Encoding: {}", decoded.format);
    println!("  Version: {}", graph.version);
    println!("  Nodes: {}", graph.num_nodes());
    println!("  Edges: {}", graph.num_edges());
    println!("  Parameters: {}", graph.parameter_count());
    println!("  Input type: {}", ports(&graph.input_type));
    println!("  Output type: {}", ports(&graph.output_type));
    println!();

    print_nodes(graph);
    print_edges(graph);

    // ── Metadata ───────────────────────────────────────────────
    if !graph.metadata.is_empty() {
        let keys: Vec<&str> = graph.metadata.keys().map(String::as_str).collect();
        println!("  Metadata keys: {}", keys.join(", "));
        println!();
    }

    // ── Diagnostics ────────────────────────────────────────────
    if !decoded.diagnostics.is_empty() {
        println!("  Diagnostics ({}):", decoded.diagnostics.len());
        for diagnostic in &decoded.diagnostics {
            println!("   {diagnostic}");
        }
        println!();
    }

    Ok(())
}

fn print_nodes(graph: &Graph) {
    println!("  {:<24} {:<12} {:>10}  {}", "Id", "Type", "Params", "Detail");
    println!("  {}", "-".repeat(72));
    for (id, node) in graph.iter_nodes() {
        println!(
            "  {:<24} {:<12} {:>10}  {}",
            truncate(id.as_str(), 24),
            node.node_type().as_str(),
            node.parameter_count(),
            node.summary(),
        );
    }
    println!();
}

fn print_edges(graph: &Graph) {
    if graph.edges.is_empty() {
        return;
    }
    println!("  Edges:");
    for edge in &graph.edges {
        println!("   {edge}");
    }
    println!();
}

fn ports(spec: &TypeSpec) -> String {
    if spec.is_empty() {
        "-".to_string()
    } else {
        spec.to_string()
    }
}

/// Truncates a string to `max_len` characters with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    }
}
