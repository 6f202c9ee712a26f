use crate::automod::event::{ModerationEvent, non_empty};
use crate::automod::identity::{MemberProfile, resolve_avatar, resolve_display_name};
use crate::automod::redact::redact;
use crate::automod::rules::{RuleStore, normalize_keyword};
use crate::automod::template::render;
use crate::automod::webhook_cache::{DeliveryIdentity, WebhookCache};
use crate::errors::{BarnacleError, DeliveryStage};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn fetch(&self, guild_id: &str, user_id: &str) -> Result<MemberProfile>;
}

/// A message sent through a webhook on behalf of another user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyMessage {
    pub content: String,
    pub username: String,
    pub avatar_url: Option<String>,
}

#[async_trait]
pub trait ProxyChannel: Send + Sync {
    /// Execute the webhook and wait for Discord to confirm delivery.
    async fn send(&self, identity: &DeliveryIdentity, message: &ProxyMessage) -> Result<()>;
}

/// Which mentions in a message are allowed to notify anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedMentions {
    pub users: Vec<String>,
}

impl AllowedMentions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only_user(user_id: &str) -> Self {
        Self {
            users: vec![user_id.to_string()],
        }
    }
}

#[async_trait]
pub trait ChannelPoster: Send + Sync {
    async fn post(&self, channel_id: &str, content: &str, mentions: &AllowedMentions)
    -> Result<()>;
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    MissingChannel,
    MissingKeyword,
    UnknownRule,
    KeywordMismatch,
}

/// Stage at which a dispatch gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Acquire,
    Republish,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event isn't one this handler reacts to.
    Filtered(FilterReason),
    /// Both the redacted republish and the warning were posted.
    Delivered,
    /// An outbound step failed; the error has already been logged.
    Failed(FailedStage),
}

/// Turns AutoMod keyword hits into a redacted republish plus a warning.
///
/// `handle` contains every failure: it logs and reports an outcome instead of returning
/// errors, so one bad event can't disturb the event loop or other events.
pub struct DispatchPipeline {
    rules: RuleStore,
    webhooks: Arc<WebhookCache>,
    members: Arc<dyn MemberDirectory>,
    proxy: Arc<dyn ProxyChannel>,
    poster: Arc<dyn ChannelPoster>,
}

impl DispatchPipeline {
    pub fn new(
        rules: RuleStore,
        webhooks: Arc<WebhookCache>,
        members: Arc<dyn MemberDirectory>,
        proxy: Arc<dyn ProxyChannel>,
        poster: Arc<dyn ChannelPoster>,
    ) -> Self {
        Self {
            rules,
            webhooks,
            members,
            proxy,
            poster,
        }
    }

    pub async fn handle(&self, event: &ModerationEvent) -> DispatchOutcome {
        let Some(channel_id) = non_empty(event.channel_id.as_deref()) else {
            return DispatchOutcome::Filtered(FilterReason::MissingChannel);
        };
        let Some(matched_keyword) = non_empty(event.matched_keyword.as_deref()) else {
            return DispatchOutcome::Filtered(FilterReason::MissingKeyword);
        };

        let rules = self.rules.load().await;
        let Some(rule) = rules.get(&event.rule_id) else {
            trace!(rule_id = %event.rule_id, "no automod message configured for rule");
            return DispatchOutcome::Filtered(FilterReason::UnknownRule);
        };

        // A blank trigger would redact nothing, so it never matches.
        let trigger = normalize_keyword(&rule.trigger);
        if trigger.is_empty() || trigger != normalize_keyword(matched_keyword) {
            trace!(
                rule_id = %event.rule_id,
                "rule matched {:?}, configured for {:?}",
                matched_keyword,
                rule.trigger
            );
            return DispatchOutcome::Filtered(FilterReason::KeywordMismatch);
        }

        let redacted = redact(event.redaction_source(), &rule.trigger);
        let warning = render(&rule.message, event);

        let member = self.fetch_member(event).await;
        let message = ProxyMessage {
            content: redacted,
            username: resolve_display_name(member.as_ref(), event),
            avatar_url: resolve_avatar(member.as_ref(), event),
        };

        let identity = match self.webhooks.acquire(channel_id).await {
            Ok(identity) => identity,
            Err(e) => {
                report(event, &e);
                return DispatchOutcome::Failed(FailedStage::Acquire);
            }
        };

        // The warning references the republished message, so it's only posted once the
        // republish has gone through.
        if let Err(e) = self.proxy.send(&identity, &message).await {
            report(event, &BarnacleError::delivery(DeliveryStage::Republish, &e));
            return DispatchOutcome::Failed(FailedStage::Republish);
        }

        let mentions = AllowedMentions::only_user(&event.user_id);
        if let Err(e) = self.poster.post(channel_id, &warning, &mentions).await {
            report(event, &BarnacleError::delivery(DeliveryStage::Warning, &e));
            return DispatchOutcome::Failed(FailedStage::Warning);
        }

        info!(
            channel_id,
            rule_id = %event.rule_id,
            user_id = %event.user_id,
            "republished redacted message"
        );
        DispatchOutcome::Delivered
    }

    async fn fetch_member(&self, event: &ModerationEvent) -> Option<MemberProfile> {
        let guild_id = event.guild_id.as_deref()?;
        match self.members.fetch(guild_id, &event.user_id).await {
            Ok(member) => Some(member),
            Err(e) => {
                report(event, &BarnacleError::Profile(format!("{:#}", e)));
                None
            }
        }
    }
}

fn report(event: &ModerationEvent, err: &BarnacleError) {
    let channel_id = event.channel_id.as_deref().unwrap_or_default();
    if err.is_operational() {
        error!(channel_id, rule_id = %event.rule_id, "failed to send automod response: {}", err);
    } else {
        debug!(channel_id, user_id = %event.user_id, "{}", err);
    }
}
