use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use crate::cli_utils::load_ranges;

pub fn cmd_inspect(ranges: Vec<PathBuf>, json_output: bool, verbose: bool) -> Result<()> {
    let loaded = load_ranges(&ranges)?;
    let stats = loaded.tree.stats();

    if json_output {
        let mut output = json!({
            "files": ranges.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "stats": stats,
            "skipped_count": loaded.skipped.len(),
        });

        if verbose {
            output["skipped"] = loaded
                .skipped
                .iter()
                .map(|s| {
                    json!({
                        "origin": loaded.origin(s.index),
                        "error": s.error.to_string(),
                    })
                })
                .collect();
        }

        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Ranges:    {}", stats.ranges);
    println!("Skipped:   {}", loaded.skipped.len());
    println!("Depth:     {}", stats.depth);
    println!(
        "Coverage:  {} addresses ({:.4}% of IPv4)",
        stats.covered_addresses,
        stats.covered_addresses as f64 / (1u64 << 32) as f64 * 100.0
    );
    if stats.overlapping_ranges > 0 {
        println!(
            "Overlaps:  {} ranges overlap an earlier range; lookups in overlapped space depend on tree shape",
            stats.overlapping_ranges
        );
    }

    if verbose && !loaded.skipped.is_empty() {
        println!();
        println!("Skipped records:");
        for skipped in &loaded.skipped {
            println!("  {}: {}", loaded.origin(skipped.index), skipped.error);
        }
    }

    Ok(())
}
