use common::{SessionContext, StaticConfig, UserConfig};
use mockito::{Matcher, Server, ServerGuard};
use router::AgentRouter;
use services::{ChatModel, QbraidClient};
use std::sync::Arc;

const ENABLED: SessionContext = SessionContext {
    agent_behavior_enabled: true,
};

fn chat_body(content: &str) -> String {
    format!(
        r#"{{"content":"{content}","usage":{{"completion_tokens":1,"prompt_tokens":9,"total_tokens":10}}}}"#
    )
}

fn router_for(server: &ServerGuard) -> AgentRouter<QbraidClient> {
    AgentRouter::new(QbraidClient::new(Arc::new(StaticConfig(UserConfig {
        api_url: server.url(),
        api_key: "test-key".to_string(),
    }))))
}

fn model() -> ChatModel {
    serde_json::from_str(
        r#"{"model":"gpt-4o","description":"Fast","pricing":{"units":"1M tokens","input":5,"output":15}}"#,
    )
    .unwrap()
}

async fn answer_classifications(server: &mut ServerGuard, yes: &str, no: &str) {
    server
        .mock("POST", "/chat")
        .match_body(Matcher::Regex(format!("Qbraid ({yes}) API")))
        .with_status(200)
        .with_body(chat_body("Yes"))
        .create_async()
        .await;
    server
        .mock("POST", "/chat")
        .match_body(Matcher::Regex(format!("Qbraid ({no}) API")))
        .with_status(200)
        .with_body(chat_body("No"))
        .create_async()
        .await;
}

#[tokio::test]
async fn test_models_reply_shows_body_as_sent() {
    let mut server = Server::new_async().await;
    answer_classifications(&mut server, "Models", "Devices|Jobs").await;
    let body = r#"[{"model":"gpt-4o","description":"Fast","pricing":{"units":"1M tokens","input":5,"output":15}}]"#;
    let models = server
        .mock("GET", "/chat/models")
        .match_header("api-key", "test-key")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let reply = router_for(&server)
        .process_user_request(ENABLED, &model(), "which models can I use?")
        .await
        .unwrap();

    assert_eq!(
        reply,
        format!("Here are the details on your Models request: {body}...")
    );
    assert!(reply.ends_with(r#""input":5,"output":15}}]..."#));
    models.assert_async().await;
}

#[tokio::test]
async fn test_devices_reply_keeps_key_order_and_extra_fields() {
    let mut server = Server::new_async().await;
    answer_classifications(&mut server, "Devices", "Jobs|Models").await;
    let body = concat!(
        r#"[{"numberQubits":34.0,"region":"us-east-1","status":"ONLINE","qbraid_id":"aws_sv1","name":"SV1","#,
        r#""provider":"AWS","vendor":"AWS","pendingJobs":0,"paradigm":"gate-based","type":"SIMULATOR","#,
        r#""runPackage":"braket","statusMsg":null,"isAvailable":true,"nextAvailable":null,"#,
        r#""pricing":{"perTask":0.075,"perShot":0,"perMinute":0.075}}]"#
    );
    server
        .mock("GET", "/quantum-devices")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let reply = router_for(&server)
        .process_user_request(ENABLED, &model(), "list my devices")
        .await
        .unwrap();

    // 34.0 prints as 34, the way a JavaScript client would show it
    let shown = body.replace("34.0", "34");
    assert_eq!(
        reply,
        format!("Here are the details on your Devices request: {}...", &shown[..100])
    );
    assert!(reply.contains(r#"[{"numberQubits":34,"region":"us-east-1","status""#));
}
