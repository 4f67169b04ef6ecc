//! Fuzz target for whole-file label-graph parsing.
//!
//! Arbitrary bytes are decoded lossily, the same way files are read from
//! disk, then parsed and joined.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lgbox::lg::parse_lg_str;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let text = String::from_utf8_lossy(data);
    let graph = parse_lg_str(&text);
    for obj in graph.annotated_objects() {
        assert!(obj.bbox.is_ordered());
    }
});
