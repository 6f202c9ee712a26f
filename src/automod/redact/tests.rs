use super::*;
use proptest::prelude::*;

proptest! {
    // Trigger alphabet avoids every letter of the placeholder, so a surviving match could
    // only come from a missed replacement.
    #[test]
    fn redacted_text_never_contains_trigger(
        text in "[ -~]{0,64}",
        trigger in "[0-9fgkmnpswxyzFGKMNPSWXYZ]{1,6}",
    ) {
        let out = redact(Some(&text), &trigger);
        prop_assert!(!out.to_lowercase().contains(&trigger.to_lowercase()));
    }

    #[test]
    fn redacted_text_is_never_empty(text in ".{0,32}", trigger in ".{0,8}") {
        prop_assert!(!redact(Some(&text), &trigger).is_empty());
    }

    #[test]
    fn text_without_trigger_is_unchanged(text in "[a-m ]{1,40}") {
        prop_assert_eq!(redact(Some(&text), "zz"), text);
    }
}

#[test]
fn test_redact_case_insensitive() {
    assert_eq!(redact(Some("buy SPAM now"), "spam"), "buy <redacted> now");
}

#[test]
fn test_redact_every_occurrence() {
    assert_eq!(
        redact(Some("Spam spam sPaM"), "spam"),
        "<redacted> <redacted> <redacted>"
    );
}

#[test]
fn test_redact_inside_words() {
    assert_eq!(redact(Some("antispamming"), "spam"), "anti<redacted>ming");
}

#[test]
fn test_redact_trigger_is_literal() {
    assert_eq!(redact(Some("a.b axb"), "a.b"), "<redacted> axb");
    assert_eq!(redact(Some("cost $5 (maybe)"), "(maybe)"), "cost $5 <redacted>");
    assert_eq!(redact(Some("x[0]*y"), "[0]*"), "x<redacted>y");
}

#[test]
fn test_redact_empty_text_returns_placeholder() {
    assert_eq!(redact(Some(""), "spam"), REDACTED_PLACEHOLDER);
    assert_eq!(redact(None, "spam"), REDACTED_PLACEHOLDER);
}

#[test]
fn test_redact_empty_trigger_leaves_text() {
    assert_eq!(redact(Some("hello"), ""), "hello");
}

#[test]
fn test_redact_multibyte() {
    assert_eq!(redact(Some("ÄPFEL und äpfel"), "äpfel"), "<redacted> und <redacted>");
}

#[test]
fn test_redact_phrase_with_spaces() {
    assert_eq!(
        redact(Some("get FREE  nitro or free nitro"), "free nitro"),
        "get FREE  nitro or <redacted>"
    );
}
