use crate::automod::event::ModerationEvent;

/// Discord mention markup for a user id.
pub fn format_user_mention(user_id: &str) -> String {
    format!("<@{}>", user_id)
}

/// Fill a rule's warning template from an event.
///
/// `{user}` becomes a mention of the actor, `{keyword}` the matched keyword and `{content}`
/// the matched content (falling back to the raw content). Replacement is literal, so
/// placeholders may repeat or be omitted freely.
pub fn render(template: &str, event: &ModerationEvent) -> String {
    template
        .replace("{user}", &format_user_mention(&event.user_id))
        .replace("{keyword}", event.matched_keyword.as_deref().unwrap_or(""))
        .replace("{content}", event.template_content())
}
