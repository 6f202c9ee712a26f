use super::*;
use crate::automod::event::ActorHint;

fn bare_event() -> ModerationEvent {
    ModerationEvent {
        user_id: "42".into(),
        rule_id: "R1".into(),
        ..Default::default()
    }
}

fn hinted_event() -> ModerationEvent {
    ModerationEvent {
        actor: Some(ActorHint {
            global_name: Some("Hint Global".into()),
            username: Some("hint_handle".into()),
            avatar_url: Some("https://cdn.example/hint.png".into()),
        }),
        ..bare_event()
    }
}

fn full_member() -> MemberProfile {
    MemberProfile {
        nickname: Some("Nick".into()),
        avatar_url: Some("https://cdn.example/guild.png".into()),
        user: Some(UserProfile {
            global_name: Some("Global".into()),
            username: Some("handle".into()),
            avatar_url: Some("https://cdn.example/user.png".into()),
        }),
    }
}

#[test]
fn test_display_name_falls_back_to_actor_id() {
    assert_eq!(resolve_display_name(None, &bare_event()), "42");
}

#[test]
fn test_display_name_prefers_nickname() {
    assert_eq!(resolve_display_name(Some(&full_member()), &hinted_event()), "Nick");
}

#[test]
fn test_display_name_member_order() {
    let mut member = full_member();
    member.nickname = None;
    assert_eq!(resolve_display_name(Some(&member), &hinted_event()), "Global");
    member.user.as_mut().unwrap().global_name = None;
    assert_eq!(resolve_display_name(Some(&member), &hinted_event()), "handle");
    member.user = None;
    assert_eq!(resolve_display_name(Some(&member), &hinted_event()), "Hint Global");
}

#[test]
fn test_display_name_event_hints() {
    let mut event = hinted_event();
    assert_eq!(resolve_display_name(None, &event), "Hint Global");
    event.actor.as_mut().unwrap().global_name = None;
    assert_eq!(resolve_display_name(None, &event), "hint_handle");
}

#[test]
fn test_display_name_skips_empty_strings() {
    let member = MemberProfile {
        nickname: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(resolve_display_name(Some(&member), &bare_event()), "42");
}

#[test]
fn test_avatar_order() {
    let mut member = full_member();
    let event = hinted_event();
    assert_eq!(
        resolve_avatar(Some(&member), &event).as_deref(),
        Some("https://cdn.example/guild.png")
    );
    member.avatar_url = None;
    assert_eq!(
        resolve_avatar(Some(&member), &event).as_deref(),
        Some("https://cdn.example/user.png")
    );
    assert_eq!(
        resolve_avatar(None, &event).as_deref(),
        Some("https://cdn.example/hint.png")
    );
}

#[test]
fn test_avatar_absent() {
    assert_eq!(resolve_avatar(None, &bare_event()), None);
    assert_eq!(resolve_avatar(Some(&MemberProfile::default()), &bare_event()), None);
}
