use crate::automod::event::{ModerationEvent, non_empty};

/// Guild member details used to impersonate the flagged author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberProfile {
    /// Guild nickname.
    pub nickname: Option<String>,
    /// Guild-specific avatar URL.
    pub avatar_url: Option<String>,
    pub user: Option<UserProfile>,
}

/// Account-level details of a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub global_name: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl MemberProfile {
    fn account(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}

fn first_present<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates.into_iter().find_map(non_empty)
}

/// Best-effort display name for the author.
///
/// Order: nickname, account global name, account handle, then the event's own hints, and
/// finally the raw actor id.
pub fn resolve_display_name(member: Option<&MemberProfile>, event: &ModerationEvent) -> String {
    first_present([
        member.and_then(|m| m.nickname.as_deref()),
        member.and_then(MemberProfile::account).and_then(|u| u.global_name.as_deref()),
        member.and_then(MemberProfile::account).and_then(|u| u.username.as_deref()),
        event.actor_global_name(),
        event.actor_username(),
    ])
    .unwrap_or(&event.user_id)
    .to_string()
}

/// Best-effort avatar URL for the author; `None` lets Discord use its default avatar.
pub fn resolve_avatar(member: Option<&MemberProfile>, event: &ModerationEvent) -> Option<String> {
    first_present([
        member.and_then(|m| m.avatar_url.as_deref()),
        member.and_then(MemberProfile::account).and_then(|u| u.avatar_url.as_deref()),
        event.actor_avatar_url(),
    ])
    .map(ToString::to_string)
}

#[cfg(test)]
mod tests;
