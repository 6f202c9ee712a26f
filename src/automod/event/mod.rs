use serde::Deserialize;

/// An AutoMod action execution, as delivered by the gateway.
///
/// Field names follow the `AUTO_MODERATION_ACTION_EXECUTION` payload so the raw
/// dispatch body deserializes directly. The record is never mutated after receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModerationEvent {
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    pub user_id: String,
    pub rule_id: String,
    #[serde(default)]
    pub matched_keyword: Option<String>,
    #[serde(default)]
    pub matched_content: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Best-effort author details known at receipt time (e.g. from the gateway cache).
    #[serde(skip)]
    pub actor: Option<ActorHint>,
}

/// Display hints about the flagged author that don't require a member fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorHint {
    pub global_name: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl ModerationEvent {
    /// Text to republish: the full message content, else whatever AutoMod matched.
    pub fn redaction_source(&self) -> Option<&str> {
        non_empty(self.content.as_deref()).or_else(|| non_empty(self.matched_content.as_deref()))
    }

    /// Value substituted for `{content}` in warning templates.
    ///
    /// Prefers the matched fragment, even when it's empty, over the full content.
    pub fn template_content(&self) -> &str {
        self.matched_content
            .as_deref()
            .or(self.content.as_deref())
            .unwrap_or("")
    }

    pub fn actor_global_name(&self) -> Option<&str> {
        self.actor.as_ref().and_then(|a| a.global_name.as_deref())
    }

    pub fn actor_username(&self) -> Option<&str> {
        self.actor.as_ref().and_then(|a| a.username.as_deref())
    }

    pub fn actor_avatar_url(&self) -> Option<&str> {
        self.actor.as_ref().and_then(|a| a.avatar_url.as_deref())
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
