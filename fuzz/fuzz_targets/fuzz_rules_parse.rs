#![no_main]

use barnacle::fuzz_api::parse_rules;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let _ = parse_rules(raw);
    }
});
