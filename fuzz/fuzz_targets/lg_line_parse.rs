//! Fuzz target for single-line label-graph parsing.
//!
//! Feeds arbitrary UTF-8 lines to the `O,` / `BB,` record parser, checking
//! for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lgbox::lg::parser::fuzz_parse_line;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_line(line);
});
