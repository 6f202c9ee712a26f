//! Discord wire payloads for the two messages a dispatch sends.

use crate::automod::dispatch::{AllowedMentions, ProxyMessage};
use crate::automod::identity::{MemberProfile, UserProfile};
use serde::{Deserialize, Serialize};

/// Message flag that switches a message to the components-v2 layout.
pub const IS_COMPONENTS_V2: u64 = 1 << 15;

/// Character limit for all text displays in one components-v2 message.
pub const MAX_TEXT_DISPLAY_CHARS: usize = 4000;

/// Character limit for a webhook username override.
pub const MAX_USERNAME_CHARS: usize = 80;

/// Substrings Discord refuses in webhook usernames, matched case-insensitively.
const RESERVED_USERNAME_WORDS: &[&str] = &["discord", "clyde"];

const COMPONENT_TEXT_DISPLAY: u8 = 10;
const CDN_BASE: &str = "https://cdn.discordapp.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextDisplay {
    #[serde(rename = "type")]
    kind: u8,
    pub content: String,
}

impl TextDisplay {
    pub fn new(content: &str) -> Self {
        Self {
            kind: COMPONENT_TEXT_DISPLAY,
            content: truncate_chars(content, MAX_TEXT_DISPLAY_CHARS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedMentionsPayload {
    /// Always empty: nothing is pinged implicitly.
    parse: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    users: Vec<String>,
}

impl From<&AllowedMentions> for AllowedMentionsPayload {
    fn from(mentions: &AllowedMentions) -> Self {
        Self {
            parse: Vec::new(),
            users: mentions.users.clone(),
        }
    }
}

/// Body for both `POST /channels/{id}/messages` and webhook execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagePayload {
    flags: u64,
    pub components: Vec<TextDisplay>,
    pub allowed_mentions: AllowedMentionsPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl MessagePayload {
    /// A plain channel message with a single text block.
    pub fn text(content: &str, mentions: &AllowedMentions) -> Self {
        Self {
            flags: IS_COMPONENTS_V2,
            components: vec![TextDisplay::new(content)],
            allowed_mentions: mentions.into(),
            username: None,
            avatar_url: None,
        }
    }

    /// A webhook message posing as the flagged author. Mentions in the republished text
    /// never ping.
    pub fn impersonating(message: &ProxyMessage) -> Self {
        Self {
            username: Some(truncate_chars(
                &mask_reserved_words(&message.username),
                MAX_USERNAME_CHARS,
            )),
            avatar_url: message.avatar_url.clone(),
            ..Self::text(&message.content, &AllowedMentions::none())
        }
    }
}

/// Break up reserved words with a zero-width space so the name stays readable but is
/// accepted by Discord.
fn mask_reserved_words(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = String::with_capacity(name.len());
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        // The words are ASCII, so a match always starts and ends on a char boundary.
        let hit = RESERVED_USERNAME_WORDS.iter().find(|word| {
            bytes
                .get(i..i + word.len())
                .is_some_and(|window| window.eq_ignore_ascii_case(word.as_bytes()))
        });
        match hit {
            Some(word) => {
                out.push_str(&name[start..=i]);
                out.push('\u{200B}');
                out.push_str(&name[i + 1..i + word.len()]);
                i += word.len();
                start = i;
            }
            None => i += 1,
        }
    }
    out.push_str(&name[start..]);
    out
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some(_) => {
            let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
            out.push('…');
            out
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberResponse {
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub user: Option<UserResponse>,
}

impl MemberResponse {
    pub fn into_profile(self, guild_id: &str, user_id: &str) -> MemberProfile {
        let avatar_url = self
            .avatar
            .as_deref()
            .map(|hash| member_avatar_url(guild_id, user_id, hash));
        MemberProfile {
            nickname: self.nick,
            avatar_url,
            user: self.user.map(|u| UserProfile {
                avatar_url: u.avatar.as_deref().map(|hash| user_avatar_url(&u.id, hash)),
                global_name: u.global_name,
                username: u.username,
            }),
        }
    }
}

fn avatar_extension(hash: &str) -> &'static str {
    if hash.starts_with("a_") { "gif" } else { "png" }
}

pub fn user_avatar_url(user_id: &str, hash: &str) -> String {
    format!(
        "{}/avatars/{}/{}.{}",
        CDN_BASE,
        user_id,
        hash,
        avatar_extension(hash)
    )
}

pub fn member_avatar_url(guild_id: &str, user_id: &str, hash: &str) -> String {
    format!(
        "{}/guilds/{}/users/{}/avatars/{}.{}",
        CDN_BASE,
        guild_id,
        user_id,
        hash,
        avatar_extension(hash)
    )
}
