// Shared test helpers; not all items used by every test binary.
#![allow(unused)]

use barnacle::automod::{
    DispatchPipeline, FileRuleSource, ModerationEvent, Rule, RuleStore, RuleTable, WebhookCache,
};
use barnacle::discord::DiscordRest;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::MockServer;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

pub const TOKEN: &str = "test-bot-token";

/// A rule file on disk plus the temp dir keeping it alive.
pub struct RuleFile {
    _dir: TempDir,
    pub path: PathBuf,
}

pub fn write_rules(rules: &[(&str, &str, &str)]) -> RuleFile {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("automod-messages.json");
    let table: RuleTable = rules
        .iter()
        .map(|(id, trigger, message)| {
            (
                (*id).to_string(),
                Rule {
                    trigger: (*trigger).to_string(),
                    message: (*message).to_string(),
                },
            )
        })
        .collect();
    std::fs::write(&path, serde_json::to_string(&table).unwrap()).unwrap();
    RuleFile { _dir: dir, path }
}

/// A pipeline wired to a mock Discord API, the way `barnacle run` wires the real one.
pub fn pipeline(server: &MockServer, rules: &RuleFile) -> DispatchPipeline {
    let rest = Arc::new(DiscordRest::new(
        TOKEN,
        &server.uri(),
        Duration::from_secs(5),
    ));
    let store = RuleStore::new(Arc::new(FileRuleSource::new(&rules.path)));
    DispatchPipeline::new(
        store,
        Arc::new(WebhookCache::new(rest.clone())),
        rest.clone(),
        rest.clone(),
        rest,
    )
}

pub fn spam_event(channel_id: &str) -> ModerationEvent {
    ModerationEvent {
        guild_id: Some("G1".into()),
        channel_id: Some(channel_id.into()),
        user_id: "42".into(),
        rule_id: "R1".into(),
        matched_keyword: Some("spam".into()),
        matched_content: Some("SPAM".into()),
        content: Some("buy SPAM now".into()),
        actor: None,
    }
}

pub async fn mount_member(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/guilds/G1/members/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nick": "Nick",
            "avatar": null,
            "user": {"id": "42", "username": "handle", "global_name": "Global", "avatar": null}
        })))
        .mount(server)
        .await;
}
