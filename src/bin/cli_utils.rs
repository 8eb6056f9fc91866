use anyhow::{Context, Result};
use geotree::{file_reader, RangeError, RangeTree, RangeTreeBuilder, SkippedRecord};
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Ranges loaded from one or more files, with the origin of every record
pub struct LoadedRanges {
    pub tree: RangeTree,
    pub skipped: Vec<SkippedRecord>,
    /// File and line of each record, indexed like `SkippedRecord::index`
    origins: Vec<(PathBuf, u64)>,
}

impl LoadedRanges {
    /// Human-readable `file:line` for a record index
    pub fn origin(&self, index: usize) -> String {
        match self.origins.get(index) {
            Some((path, line)) => format!("{}:{}", path.display(), line),
            None => format!("record {}", index),
        }
    }
}

/// Read headerless CSV range files into a tree
///
/// Rows may have any number of fields; `#` starts a comment line and
/// surrounding whitespace is trimmed. Bad rows, including rows that are not
/// valid UTF-8, are skipped by the builder; only I/O failures abort the load.
pub fn load_ranges(inputs: &[PathBuf]) -> Result<LoadedRanges> {
    let mut builder = RangeTreeBuilder::new();
    let mut origins = Vec::new();

    for input in inputs {
        let reader = file_reader::open(input)
            .with_context(|| format!("Failed to open range file: {}", input.display()))?;
        read_csv(input, reader, &mut builder, &mut origins)?;
    }

    let skipped = builder.skipped().to_vec();
    Ok(LoadedRanges {
        tree: builder.build(),
        skipped,
        origins,
    })
}

fn read_csv(
    path: &Path,
    reader: Box<dyn BufRead + Send>,
    builder: &mut RangeTreeBuilder,
    origins: &mut Vec<(PathBuf, u64)>,
) -> Result<()> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    for result in csv_reader.byte_records() {
        let record =
            result.with_context(|| format!("Failed to read range file: {}", path.display()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        origins.push((path.to_path_buf(), line));

        match record
            .iter()
            .map(std::str::from_utf8)
            .collect::<std::result::Result<Vec<&str>, _>>()
        {
            Ok(fields) => {
                builder.ingest([fields]);
            }
            Err(err) => builder.skip_record(RangeError::Format(format!(
                "record is not valid UTF-8: {}",
                err
            ))),
        }
    }

    Ok(())
}

/// Collect query addresses, expanding `-` into lines read from stdin
///
/// Stdin lines are decoded lossily, so an undecodable line becomes a query
/// that reports not found.
pub fn collect_queries(ips: Vec<String>) -> Result<Vec<String>> {
    let mut queries = Vec::with_capacity(ips.len());
    for ip in ips {
        if ip == "-" {
            let reader = file_reader::open("-").context("Failed to read stdin")?;
            for line in reader.split(b'\n') {
                let line = line.context("Failed to read stdin")?;
                let line = String::from_utf8_lossy(&line);
                let line = line.trim();
                if !line.is_empty() {
                    queries.push(line.to_string());
                }
            }
        } else {
            queries.push(ip);
        }
    }
    Ok(queries)
}
