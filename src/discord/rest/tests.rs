use super::*;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rest(server: &MockServer) -> DiscordRest {
    DiscordRest::new("bot-token", &format!("{}/api/v10/", server.uri()), Duration::from_secs(5))
}

#[tokio::test]
async fn test_list_webhooks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v10/channels/C1/webhooks"))
        .and(header("Authorization", "Bot bot-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "type": 2, "name": "Other App"},
            {"id": "2", "type": 1, "name": "Barnacle Automod", "token": "tok"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let hooks = rest(&server).list("C1").await.unwrap();
    assert_eq!(hooks.len(), 2);
    assert_eq!(hooks[0].token, None);
    assert_eq!(hooks[1].token.as_deref(), Some("tok"));
}

#[tokio::test]
async fn test_create_webhook_sends_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v10/channels/C1/webhooks"))
        .and(header("Authorization", "Bot bot-token"))
        .and(body_json(json!({"name": "Barnacle Automod"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "9", "token": "fresh"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let hook = rest(&server).create("C1", "Barnacle Automod").await.unwrap();
    assert_eq!(hook.id, "9");
    assert_eq!(hook.token.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v10/channels/C1/webhooks"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"message": "Missing Permissions", "code": 50013})),
        )
        .mount(&server)
        .await;

    let err = rest(&server).list("C1").await.unwrap_err().to_string();
    assert!(err.contains("403"), "{}", err);
    assert!(err.contains("Missing Permissions"), "{}", err);
}

#[tokio::test]
async fn test_fetch_member_builds_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v10/guilds/G1/members/42"))
        .and(header("Authorization", "Bot bot-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nick": null,
            "avatar": null,
            "user": {"id": "42", "username": "handle", "global_name": "Global", "avatar": "hash"}
        })))
        .mount(&server)
        .await;

    let member = rest(&server).fetch("G1", "42").await.unwrap();
    assert_eq!(member.nickname, None);
    let user = member.user.unwrap();
    assert_eq!(user.global_name.as_deref(), Some("Global"));
    assert_eq!(
        user.avatar_url.as_deref(),
        Some("https://cdn.discordapp.com/avatars/42/hash.png")
    );
}

#[tokio::test]
async fn test_fetch_unknown_member_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v10/guilds/G1/members/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Unknown Member"})))
        .mount(&server)
        .await;

    assert!(rest(&server).fetch("G1", "42").await.is_err());
}

#[tokio::test]
async fn test_execute_webhook_waits_and_impersonates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v10/webhooks/7/secret"))
        .and(query_param("wait", "true"))
        .and(query_param("with_components", "true"))
        .and(body_partial_json(json!({
            "flags": 32768,
            "components": [{"type": 10, "content": "buy <redacted> now"}],
            "username": "Nick",
            "allowed_mentions": {"parse": []}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m1"})))
        .expect(1)
        .mount(&server)
        .await;

    let identity = DeliveryIdentity {
        id: "7".into(),
        token: "secret".into(),
    };
    let message = ProxyMessage {
        content: "buy <redacted> now".into(),
        username: "Nick".into(),
        avatar_url: None,
    };
    rest(&server).send(&identity, &message).await.unwrap();
}

#[tokio::test]
async fn test_execute_webhook_error_hides_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v10/webhooks/7/secret-token-value"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Unknown Webhook"})))
        .mount(&server)
        .await;

    let identity = DeliveryIdentity {
        id: "7".into(),
        token: "secret-token-value".into(),
    };
    let message = ProxyMessage {
        content: "x".into(),
        username: "y".into(),
        avatar_url: None,
    };
    let err = rest(&server).send(&identity, &message).await.unwrap_err().to_string();
    assert!(err.contains("Unknown Webhook"), "{}", err);
    assert!(!err.contains("secret-token-value"), "{}", err);
}

#[tokio::test]
async fn test_post_warning_restricts_mentions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v10/channels/C1/messages"))
        .and(header("Authorization", "Bot bot-token"))
        .and(body_json(json!({
            "flags": 32768,
            "components": [{"type": 10, "content": "<@42> tripped the spam filter"}],
            "allowed_mentions": {"parse": [], "users": ["42"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m2"})))
        .expect(1)
        .mount(&server)
        .await;

    rest(&server)
        .post(
            "C1",
            "<@42> tripped the spam filter",
            &AllowedMentions::only_user("42"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_connection_failure_is_error() {
    let rest = DiscordRest::new("t", "http://127.0.0.1:1", Duration::from_millis(500));
    assert!(rest.list("C1").await.is_err());
}
