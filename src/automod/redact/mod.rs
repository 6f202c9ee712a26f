use regex::{NoExpand, RegexBuilder};

/// Token substituted for every occurrence of a rule's trigger.
pub const REDACTED_PLACEHOLDER: &str = "<redacted>";

/// Replace every case-insensitive occurrence of `trigger` in `text` with [`REDACTED_PLACEHOLDER`].
///
/// The trigger is matched as a literal substring. Empty or absent text yields the placeholder
/// itself so a republished message is never blank. An empty trigger matches nothing.
pub fn redact(text: Option<&str>, trigger: &str) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return REDACTED_PLACEHOLDER.to_string();
    };
    if trigger.is_empty() {
        return text.to_string();
    }

    match RegexBuilder::new(&regex::escape(trigger))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(text, NoExpand(REDACTED_PLACEHOLDER)).into_owned(),
        Err(e) => {
            // Never fall back to the original text.
            tracing::warn!("failed to compile redaction pattern: {}", e);
            REDACTED_PLACEHOLDER.to_string()
        }
    }
}

#[cfg(test)]
mod tests;
