#![no_main]

use arbitrary::Arbitrary;
use barnacle::fuzz_api::redact;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    text: Option<String>,
    trigger: String,
}

fuzz_target!(|input: Input| {
    let out = redact(input.text.as_deref(), &input.trigger);
    if input.trigger.is_empty()
        && let Some(text) = input.text.as_deref()
        && !text.is_empty()
    {
        assert_eq!(out, text);
    }
});
