#![no_main]
use geotree::RangeTree;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let tree = RangeTree::new([
            vec!["1.0.0.0", "1.0.0.255", "AU"],
            vec!["2.0.0.0/8", "FR"],
            vec!["8.8.8.0/24", "US"],
            vec!["210.0.0.0", "210.255.255.255", "KR"],
        ]);

        // Malformed queries collapse to "not found"
        let _ = tree.find(s);
    }
});
