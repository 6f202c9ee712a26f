//! AutoMod keyword responses: rule lookup, redaction, webhook republish and warning.

pub mod dispatch;
pub mod event;
pub mod identity;
pub mod redact;
pub mod rules;
pub mod template;
pub mod webhook_cache;

pub use dispatch::{
    AllowedMentions, ChannelPoster, DispatchOutcome, DispatchPipeline, FailedStage, FilterReason,
    MemberDirectory, ProxyChannel, ProxyMessage,
};
pub use event::{ActorHint, ModerationEvent};
pub use identity::{MemberProfile, UserProfile, resolve_avatar, resolve_display_name};
pub use redact::{REDACTED_PLACEHOLDER, redact};
pub use rules::{FileRuleSource, Rule, RuleConfigSource, RuleStore, RuleTable, normalize_keyword};
pub use template::render;
pub use webhook_cache::{ChannelIdentityDirectory, DeliveryIdentity, WebhookCache, WebhookRecord};
