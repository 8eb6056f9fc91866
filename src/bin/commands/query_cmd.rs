use anyhow::{bail, Result};
use geotree::address::format_address;
use serde_json::json;
use std::path::PathBuf;

use crate::cli_utils::{collect_queries, load_ranges};

pub fn cmd_query(
    ranges: Vec<PathBuf>,
    ips: Vec<String>,
    format: String,
    quiet: bool,
) -> Result<()> {
    if format != "text" && format != "json" {
        bail!("Unknown output format '{}' (expected text or json)", format);
    }
    if is_stdin(&ranges) && ips.iter().any(|ip| ip == "-") {
        bail!("Cannot read both ranges and addresses from stdin ('-')");
    }

    let loaded = load_ranges(&ranges)?;
    let queries = collect_queries(ips)?;

    let mut all_found = true;
    for ip in &queries {
        let hit = loaded.tree.find_range(ip);
        all_found &= hit.is_some();

        if quiet {
            continue;
        }

        if format == "json" {
            let line = match hit {
                Some(range) => json!({
                    "ip": ip,
                    "country": range.country,
                    "start": format_address(range.start),
                    "end": format_address(range.end),
                }),
                None => json!({
                    "ip": ip,
                    "country": null,
                    "start": null,
                    "end": null,
                }),
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            match hit {
                Some(range) => println!("{}\t{}", ip, range.country),
                None => println!("{}\tnot found", ip),
            }
        }
    }

    // Exit status: 0 only if every address resolved
    std::process::exit(if all_found { 0 } else { 1 });
}

fn is_stdin(ranges: &[PathBuf]) -> bool {
    ranges.iter().any(|p| p.to_str() == Some("-"))
}
