//! End-to-end lookups against a realistic country range list
//!
//! Exercises record parsing, batch tolerance, and tree lookups together.

use geotree::{RangeError, RangeTree, RangeTreeBuilder};

/// Sample country ranges, unsorted on purpose
const SAMPLE_RANGES: &[[&str; 3]] = &[
    ["210.0.0.0", "210.255.255.255", "KR"],
    ["1.0.0.0", "1.0.0.255", "AU"],
    ["1.1.1.0", "1.1.1.255", "CN"],
    ["2.0.0.0", "2.255.255.255", "FR"],
    ["5.5.5.0", "5.5.5.50", "DE"],
    ["8.8.8.0", "8.8.8.255", "US"],
    ["23.0.0.0", "23.255.255.255", "US"],
    ["31.0.0.0", "31.255.255.255", "GB"],
    ["45.0.0.0", "45.255.255.255", "CA"],
    ["62.0.0.0", "62.255.255.255", "IT"],
    ["84.0.0.0", "84.255.255.255", "ES"],
    ["103.0.0.0", "103.255.255.255", "JP"],
    ["151.101.0.0", "151.101.255.255", "US"],
    ["172.217.0.0", "172.217.255.255", "IE"],
    ["185.0.0.0", "185.255.255.255", "NL"],
];

#[test]
fn test_full_sample_set() {
    let tree = RangeTree::new(SAMPLE_RANGES);
    assert_eq!(tree.len(), 15);
    assert_eq!(tree.depth(), 4);

    assert_eq!(tree.find("8.8.8.8"), Some("US"));
    assert_eq!(tree.find("2.1.1.1"), Some("FR"));
    assert_eq!(tree.find("4.4.4.4"), None);
    assert_eq!(tree.find("210.1.1.1"), Some("KR"));

    assert_eq!(tree.find("5.5.5.50"), Some("DE"));
    assert_eq!(tree.find("5.5.5.51"), None);
    assert_eq!(tree.find("151.101.1.69"), Some("US"));
    assert_eq!(tree.find("172.217.14.206"), Some("IE"));
    assert_eq!(tree.find("255.255.255.255"), None);
    assert_eq!(tree.find("0.0.0.0"), None);
}

#[test]
fn test_sample_subset_without_us_block() {
    let tree = RangeTree::new([
        ["1.0.0.0", "1.0.0.255", "AU"],
        ["1.1.1.0", "1.1.1.255", "CN"],
        ["2.0.0.0", "2.255.255.255", "FR"],
        ["210.0.0.0", "210.255.255.255", "KR"],
    ]);

    assert_eq!(tree.find("8.8.8.8"), None);
    assert_eq!(tree.find("2.1.1.1"), Some("FR"));
    assert_eq!(tree.find("210.1.1.1"), Some("KR"));
}

#[test]
fn test_every_boundary_resolves() {
    let tree = RangeTree::new(SAMPLE_RANGES);
    for [start, end, country] in SAMPLE_RANGES {
        assert_eq!(tree.find(start), Some(*country), "start of {}", country);
        assert_eq!(tree.find(end), Some(*country), "end of {}", country);
    }
}

#[test]
fn test_mixed_cidr_and_pair_records() {
    let tree = RangeTree::new(vec![
        vec!["1.2.3.0/24", "US"],
        vec!["10.0.0.0", "10.0.0.255", "source", "XX"],
        vec!["9.9.9.9/32", "CH"],
    ]);

    assert_eq!(tree.find("1.2.3.0"), Some("US"));
    assert_eq!(tree.find("1.2.3.255"), Some("US"));
    assert_eq!(tree.find("1.2.4.0"), None);
    assert_eq!(tree.find("10.0.0.128"), Some("XX"));
    assert_eq!(tree.find("9.9.9.9"), Some("CH"));
    assert_eq!(tree.find("9.9.9.10"), None);
}

#[test]
fn test_empty_input() {
    let records: Vec<Vec<String>> = Vec::new();
    let tree = RangeTree::new(records);
    assert!(tree.is_empty());
    for ip in ["0.0.0.0", "1.2.3.4", "255.255.255.255", "garbage"] {
        assert_eq!(tree.find(ip), None);
    }
}

#[test]
fn test_malformed_records_do_not_disturb_valid_ones() {
    let tree = RangeTree::new(vec![
        vec!["1.0.0.0", "1.0.0.255", "AU"],
        vec!["999.1.1.1", "999.1.1.255", "XX"],
        vec!["2.0.0.0", "2.255.255.255", "FR"],
        vec!["3.0.0.0/33", "XX"],
        vec!["4.0.0.0"],
        vec!["6.6.6.6", "5.5.5.5", "XX"],
        vec!["210.0.0.0/8", "KR"],
    ]);

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.find("1.0.0.1"), Some("AU"));
    assert_eq!(tree.find("2.1.1.1"), Some("FR"));
    assert_eq!(tree.find("210.1.1.1"), Some("KR"));
    assert_eq!(tree.find("3.0.0.1"), None);
    assert_eq!(tree.find("5.5.5.5"), None);
    assert_eq!(tree.find("6.0.0.0"), None);
}

#[test]
fn test_builder_reports_skips() {
    let mut builder = RangeTreeBuilder::new();
    builder.ingest(SAMPLE_RANGES);
    builder.ingest([["999.1.1.1", "999.1.1.2", "XX"]]);
    builder.ingest([["1.2.3.0/33", "US"]]);

    let skipped = builder.skipped();
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0].index, SAMPLE_RANGES.len());
    assert_eq!(skipped[1].index, SAMPLE_RANGES.len() + 1);
    assert!(matches!(skipped[1].error, RangeError::Format(_)));

    let tree = builder.build();
    assert_eq!(tree.len(), SAMPLE_RANGES.len());
}

#[test]
fn test_concurrent_lookups() {
    let tree = RangeTree::new(SAMPLE_RANGES);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..1000 {
                    assert_eq!(tree.find("8.8.8.8"), Some("US"));
                    assert_eq!(tree.find("4.4.4.4"), None);
                }
            });
        }
    });
}
