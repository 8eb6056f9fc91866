//! Range Tree for IPv4 country lookups
//!
//! Builds a height-balanced binary search tree over ranges sorted by start
//! address. The tree is balanced by index, not by value: the median of each
//! sorted slice becomes the subtree root, so the shape depends only on the
//! number of ranges and their sorted order.
//!
//! Lookups walk from the root and stop at the first node whose range
//! contains the target. This is exact for disjoint ranges. With overlapping
//! ranges the answer is whichever overlapping range the walk meets first,
//! which depends on the sort tie-break and the tree shape.

use crate::address::parse_address;
use crate::error::{RangeError, Result};
use crate::range_parser::{parse_record, IpRange};
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::net::Ipv4Addr;

/// Range count at which the build switches to rayon's parallel stable sort
pub const PARALLEL_SORT_THRESHOLD: usize = 100_000;

/// Most ranges a tree can hold; arena slots are addressed by `u32`
pub const MAX_RANGES: usize = u32::MAX as usize;

/// A node in the tree arena
#[derive(Debug, Clone)]
struct Node {
    range: IpRange,
    /// Index of the left child in the arena
    left: Option<u32>,
    /// Index of the right child in the arena
    right: Option<u32>,
}

/// Immutable range tree using arena allocation
///
/// Arena slot `i` holds the `i`-th range in sorted order; children are
/// referenced by `u32` slot index, which caps a tree at [`MAX_RANGES`].
#[derive(Debug, Clone, Default)]
pub struct RangeTree {
    nodes: Vec<Node>,
    root: Option<u32>,
    depth: usize,
}

/// Summary of a built tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Ranges stored in the tree
    pub ranges: usize,
    /// Height of the tree (0 when empty)
    pub depth: usize,
    /// Distinct addresses covered by at least one range
    pub covered_addresses: u64,
    /// Ranges that overlap an earlier range in sorted order
    pub overlapping_ranges: usize,
}

impl RangeTree {
    /// Build a tree from raw records, skipping malformed ones
    ///
    /// Each record is a sequence of text fields accepted by
    /// [`parse_record`]. Bad records are logged and dropped; they never fail
    /// the build.
    ///
    /// # Example
    /// ```
    /// use geotree::RangeTree;
    ///
    /// let tree = RangeTree::new([
    ///     vec!["1.0.0.0", "1.0.0.255", "AU"],
    ///     vec!["2.0.0.0/8", "FR"],
    ///     vec!["999.1.1.1", "999.1.1.2", "XX"],
    /// ]);
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.find("2.1.1.1"), Some("FR"));
    /// assert_eq!(tree.find("4.4.4.4"), None);
    /// ```
    pub fn new<I, R, S>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut builder = RangeTreeBuilder::new();
        builder.ingest(records);
        builder.build()
    }

    /// Build a tree from already-validated ranges
    ///
    /// Ranges are stably sorted by start address, so ranges sharing a start
    /// keep their input order. Ranges past [`MAX_RANGES`] in sorted order
    /// are dropped with a warning.
    pub fn from_ranges(mut ranges: Vec<IpRange>) -> Self {
        if ranges.len() >= PARALLEL_SORT_THRESHOLD {
            ranges.par_sort_by_key(|r| r.start);
        } else {
            ranges.sort_by_key(|r| r.start);
        }

        if ranges.len() > MAX_RANGES {
            warn!(
                "Range tree holds at most {} ranges, dropping {}",
                MAX_RANGES,
                ranges.len() - MAX_RANGES
            );
            ranges.truncate(MAX_RANGES);
        }

        let mut nodes: Vec<Node> = ranges
            .into_iter()
            .map(|range| Node {
                range,
                left: None,
                right: None,
            })
            .collect();

        let count = nodes.len();
        let (root, depth) = link_subtree(&mut nodes, 0, count);

        debug!("Built range tree: {} ranges, depth {}", count, depth);

        Self { nodes, root, depth }
    }

    /// Look up the country for a dotted-quad address
    ///
    /// Returns `None` when the address is malformed, the tree is empty, or no
    /// range contains the address. These cases are deliberately
    /// indistinguishable.
    pub fn find(&self, ip: &str) -> Option<&str> {
        self.find_range(ip).map(|r| r.country.as_str())
    }

    /// Look up the range containing a dotted-quad address
    pub fn find_range(&self, ip: &str) -> Option<&IpRange> {
        let target = parse_address(ip).ok()?;
        self.find_range_addr(target)
    }

    /// Look up the country for a numeric address
    pub fn find_addr(&self, addr: u32) -> Option<&str> {
        self.find_range_addr(addr).map(|r| r.country.as_str())
    }

    /// Look up the country for an [`Ipv4Addr`]
    pub fn find_ip(&self, ip: Ipv4Addr) -> Option<&str> {
        self.find_addr(u32::from(ip))
    }

    /// Look up the range containing a numeric address
    pub fn find_range_addr(&self, addr: u32) -> Option<&IpRange> {
        let mut current = self.root;

        while let Some(index) = current {
            let node = self.nodes.get(index as usize)?;
            if node.range.contains(addr) {
                return Some(&node.range);
            }
            current = if addr < node.range.start {
                node.left
            } else {
                node.right
            };
        }

        None
    }

    /// Number of ranges in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no ranges
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the tree, `ceil(log2(n + 1))`
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Ranges in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &IpRange> + '_ {
        self.nodes.iter().map(|n| &n.range)
    }

    /// Compute coverage and overlap statistics
    pub fn stats(&self) -> TreeStats {
        let mut covered = 0u64;
        let mut overlapping = 0;
        // Highest end seen so far; ranges are visited in start order
        let mut reach: Option<u32> = None;

        for range in self.iter() {
            match reach {
                Some(end) if range.start <= end => {
                    overlapping += 1;
                    if range.end > end {
                        covered += u64::from(range.end - end);
                        reach = Some(range.end);
                    }
                }
                _ => {
                    covered += range.size();
                    reach = Some(range.end);
                }
            }
        }

        TreeStats {
            ranges: self.len(),
            depth: self.depth,
            covered_addresses: covered,
            overlapping_ranges: overlapping,
        }
    }
}

/// Link `nodes[left..right]` into a subtree rooted at its median
///
/// Returns the subtree root and its height.
fn link_subtree(nodes: &mut [Node], left: usize, right: usize) -> (Option<u32>, usize) {
    if left >= right {
        return (None, 0);
    }

    // Floor median of the inclusive slice [left, right - 1]
    let mid = left + (right - 1 - left) / 2;
    let (left_child, left_depth) = link_subtree(nodes, left, mid);
    let (right_child, right_depth) = link_subtree(nodes, mid + 1, right);

    let node = &mut nodes[mid];
    node.left = left_child;
    node.right = right_child;

    // In range: from_ranges caps the arena at MAX_RANGES
    (u32::try_from(mid).ok(), 1 + left_depth.max(right_depth))
}

fn check_capacity(len: usize) -> Result<()> {
    if len >= MAX_RANGES {
        return Err(RangeError::format(format!(
            "range tree is full ({} ranges)",
            MAX_RANGES
        )));
    }
    Ok(())
}

/// A record rejected during batch ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Zero-based position of the record among all records offered to the builder
    pub index: usize,
    /// Why the record was rejected
    pub error: RangeError,
}

/// Batch ingestion for [`RangeTree`]
///
/// Collects parsed ranges, rejecting malformed and inverted records without
/// aborting the batch.
///
/// # Example
/// ```
/// use geotree::RangeTreeBuilder;
///
/// let mut builder = RangeTreeBuilder::new();
/// builder.add_record(&["1.1.1.0", "1.1.1.255", "CN"])?;
/// assert!(builder.add_record(&["1.2.3.0/33", "US"]).is_err());
///
/// let tree = builder.build();
/// assert_eq!(tree.find("1.1.1.1"), Some("CN"));
/// # Ok::<(), geotree::RangeError>(())
/// ```
#[derive(Debug, Default)]
pub struct RangeTreeBuilder {
    ranges: Vec<IpRange>,
    skipped: Vec<SkippedRecord>,
    records_seen: usize,
}

impl RangeTreeBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with room for `capacity` ranges
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Parse and add one record
    ///
    /// On error the record is counted as seen but not stored; the error is
    /// returned for the caller to handle.
    pub fn add_record<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        self.records_seen += 1;
        let range = parse_record(fields)?;
        self.push_checked(range)
    }

    /// Add an already-parsed range
    pub fn add_range(&mut self, range: IpRange) -> Result<()> {
        self.records_seen += 1;
        self.push_checked(range)
    }

    fn push_checked(&mut self, range: IpRange) -> Result<()> {
        check_capacity(self.ranges.len())?;
        if range.start > range.end {
            return Err(RangeError::StructuralInvalid {
                start: range.start,
                end: range.end,
            });
        }
        self.ranges.push(range);
        Ok(())
    }

    /// Add a batch of records, logging and skipping any that fail
    ///
    /// Returns the number of records accepted from this batch.
    pub fn ingest<I, R, S>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut accepted = 0;
        for record in records {
            let index = self.records_seen;
            match self.add_record(record.as_ref()) {
                Ok(()) => accepted += 1,
                Err(error) => {
                    warn!("Skipping range record {}: {}", index, error);
                    self.skipped.push(SkippedRecord { index, error });
                }
            }
        }
        accepted
    }

    /// Count a record that was rejected before it could be parsed
    ///
    /// For input layers that fail on a row themselves (e.g. undecodable
    /// bytes). The record is logged and listed in [`skipped`](Self::skipped)
    /// under the next record index, exactly like a failure inside
    /// [`ingest`](Self::ingest).
    pub fn skip_record(&mut self, error: RangeError) {
        let index = self.records_seen;
        self.records_seen += 1;
        warn!("Skipping range record {}: {}", index, error);
        self.skipped.push(SkippedRecord { index, error });
    }

    /// Records rejected by [`ingest`](Self::ingest) or [`skip_record`](Self::skip_record)
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Number of ranges accepted so far
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Sort the accepted ranges and build the tree
    pub fn build(self) -> RangeTree {
        if !self.skipped.is_empty() {
            debug!(
                "Building range tree with {} of {} records ({} skipped)",
                self.ranges.len(),
                self.records_seen,
                self.skipped.len()
            );
        }
        RangeTree::from_ranges(self.ranges)
    }
}
