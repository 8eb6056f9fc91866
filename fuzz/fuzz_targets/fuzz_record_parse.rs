#![no_main]
use geotree::RangeTree;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // One record per line, comma-separated fields
        let records: Vec<Vec<&str>> = s.lines().map(|l| l.split(',').collect()).collect();
        let tree = RangeTree::new(&records);

        for range in tree.iter() {
            assert!(range.start <= range.end);
        }
    }
});
