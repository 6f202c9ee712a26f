#![no_main]

use arbitrary::Arbitrary;
use barnacle::automod::ModerationEvent;
use barnacle::fuzz_api::render;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    template: String,
    user_id: String,
    keyword: Option<String>,
    matched: Option<String>,
    content: Option<String>,
}

fuzz_target!(|input: Input| {
    let event = ModerationEvent {
        user_id: input.user_id,
        matched_keyword: input.keyword,
        matched_content: input.matched,
        content: input.content,
        ..Default::default()
    };
    let _ = render(&input.template, &event);
});
