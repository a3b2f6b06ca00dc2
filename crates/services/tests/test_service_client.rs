use common::{QbraidChatError, StaticConfig, UserConfig};
use mockito::{Matcher, Server};
use serde_json::json;
use services::{
    QbraidApi, QbraidClient, RequestOptions, ServiceClient, ServiceRequest, ServiceRequestDetails,
};
use std::sync::Arc;

fn client_for(url: String) -> QbraidClient {
    QbraidClient::new(Arc::new(StaticConfig(UserConfig {
        api_url: url,
        api_key: "test-key".to_string(),
    })))
}

fn chat_model() -> services::ChatModel {
    serde_json::from_value(json!({
        "model": "gpt-4o-mini",
        "description": "Small and fast",
        "pricing": { "units": "1M tokens", "input": 0.15, "output": 0.6 }
    }))
    .unwrap()
}

fn create_mock_chat_response() -> String {
    r#"{
        "content": "Test response",
        "usage": { "completion_tokens": 2, "prompt_tokens": 7, "total_tokens": 9 }
    }"#
    .to_string()
}

#[tokio::test]
async fn test_send_chat_posts_non_streaming_body() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/chat")
        .match_header("api-key", "test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "prompt": "Hello",
            "model": "gpt-4o-mini",
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(create_mock_chat_response())
        .create_async()
        .await;

    let client = client_for(server.url());
    let response = client.send_chat(&chat_model(), "Hello").await.unwrap();

    assert_eq!(response.content, "Test response");
    assert_eq!(response.usage.total_tokens, 9.0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_chat_models() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/chat/models")
        .match_header("api-key", "test-key")
        .with_status(200)
        .with_body(
            json!([
                { "model": "gpt-4o-mini", "description": "Small", "pricing": { "units": "1M tokens", "input": 0.15, "output": 0.6 } },
                { "model": "gpt-4o", "description": "Large", "pricing": { "units": "1M tokens", "input": 2.5, "output": 10 } }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let models = client_for(server.url()).get_chat_models().await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[1].model, "gpt-4o");
    assert_eq!(models[1].pricing.output, 10.0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_quantum_devices_and_filter() {
    let mut server = Server::new_async().await;
    let device = json!({
        "qbraid_id": "aws_sv1",
        "name": "SV1",
        "provider": "AWS",
        "vendor": "AWS",
        "numberQubits": 34,
        "pendingJobs": 0,
        "paradigm": "gate-based",
        "type": "SIMULATOR",
        "runPackage": "braket",
        "status": "ONLINE",
        "statusMsg": null,
        "isAvailable": true,
        "nextAvailable": null,
        "pricing": { "perTask": 0.075, "perShot": 0, "perMinute": 0.075 }
    });

    let all = server
        .mock("GET", "/quantum-devices")
        .with_status(200)
        .with_body(json!([device]).to_string())
        .create_async()
        .await;

    let devices = client_for(server.url()).get_quantum_devices().await.unwrap();
    assert_eq!(devices[0].qbraid_id, "aws_sv1");
    assert!(devices[0].is_available);
    all.assert_async().await;

    let mut filtered_server = Server::new_async().await;
    let filtered = filtered_server
        .mock("GET", "/quantum-devices")
        .match_query(Matcher::UrlEncoded("provider".into(), "AWS".into()))
        .with_status(200)
        .with_body(json!([device]).to_string())
        .create_async()
        .await;

    let devices = client_for(filtered_server.url())
        .get_quantum_devices_filtered("provider=AWS")
        .await
        .unwrap();
    assert_eq!(devices.len(), 1);
    filtered.assert_async().await;
}

#[tokio::test]
async fn test_get_quantum_jobs() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/quantum-jobs")
        .with_status(200)
        .with_body(
            json!({
                "jobsArray": [{
                    "timeStamps": { "createdAt": "2024-06-01T10:00:00Z", "endedAt": "2024-06-01T10:01:00Z", "executionDuration": 1200 },
                    "queuePosition": null,
                    "queueDepth": null,
                    "circuitNumQubits": 2,
                    "circuitDepth": 3,
                    "qbraidDeviceId": "aws_sv1",
                    "qbraidJobId": "aws_sv1-job-1",
                    "status": "COMPLETED",
                    "vendor": "aws",
                    "provider": "aws",
                    "escrow": 0,
                    "cost": 0.075,
                    "shots": 100,
                    "openQasm": "OPENQASM 3;",
                    "measurementCounts": { "00": 50, "11": 50 }
                }],
                "statusGroup": "all",
                "provider": "all",
                "total": 1
            })
            .to_string(),
        )
        .create_async()
        .await;

    let jobs = client_for(server.url()).get_quantum_jobs().await.unwrap();
    assert_eq!(jobs.total, 1.0);
    assert_eq!(jobs.jobs_array[0].status, "COMPLETED");
    assert_eq!(jobs.jobs_array[0].time_stamps.execution_duration, Some(1200.0));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bad_response_shape_is_typed_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/chat/models")
        .with_status(200)
        .with_body(r#"[{"model": "gpt-4o-mini", "description": 5}]"#)
        .create_async()
        .await;

    let err = client_for(server.url()).get_chat_models().await.unwrap_err();
    match err {
        QbraidChatError::BadApiResponseFormat {
            endpoint,
            violations,
        } => {
            assert_eq!(endpoint, "/chat/models");
            assert_eq!(
                violations,
                vec![
                    "$[0].description: expected string".to_string(),
                    "$[0].pricing: missing".to_string(),
                ]
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_service_json_keeps_body_as_received() {
    let mut server = Server::new_async().await;
    let body = r#"[{"description":"Fast","model":"gpt-4o","pricing":{"units":"1M tokens","input":5,"output":15},"contextWindow":128000}]"#;

    let mock = server
        .mock("GET", "/chat/models")
        .match_header("api-key", "test-key")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let value = client_for(server.url())
        .get_service_json(ServiceRequestDetails::GetChatModels)
        .await
        .unwrap();

    assert_eq!(serde_json::to_string(&value).unwrap(), body);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_json_rejects_bad_shape() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/quantum-devices")
        .with_status(200)
        .with_body(r#"{"devices": []}"#)
        .create_async()
        .await;

    let err = client_for(server.url())
        .get_service_json(ServiceRequestDetails::GetQuantumDevices { queryparam: None })
        .await
        .unwrap_err();

    assert!(matches!(err, QbraidChatError::BadApiResponseFormat { .. }));
}

#[tokio::test]
async fn test_error_status_with_json_body_is_still_validated() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat")
        .with_status(401)
        .with_body(r#"{"message": "Unauthorized"}"#)
        .create_async()
        .await;

    let err = client_for(server.url())
        .send_chat(&chat_model(), "Hello")
        .await
        .unwrap_err();
    assert!(matches!(err, QbraidChatError::BadApiResponseFormat { .. }));
}

#[tokio::test]
async fn test_non_json_body_is_json_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/quantum-jobs")
        .with_status(502)
        .with_body("<html>Bad gateway</html>")
        .create_async()
        .await;

    let err = client_for(server.url()).get_quantum_jobs().await.unwrap_err();
    assert!(matches!(err, QbraidChatError::Json(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let err = client_for("http://127.0.0.1:1".to_string())
        .get_quantum_devices()
        .await
        .unwrap_err();
    assert!(matches!(err, QbraidChatError::Transport(_)));
}

#[tokio::test]
async fn test_job_mutations_pass_through_unchecked() {
    let mut server = Server::new_async().await;

    let cancel = server
        .mock("PUT", "/quantum-jobs")
        .match_query(Matcher::UrlEncoded("id".into(), "job-7".into()))
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/quantum-jobs")
        .match_body(Matcher::Json(json!({"shots": 10})))
        .with_status(200)
        .with_body(r#""created""#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/quantum-jobs")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(server.url());
    assert_eq!(client.cancel_quantum_job("job-7").await.unwrap(), json!({"ok": true}));
    assert_eq!(client.create_quantum_job(&json!({"shots": 10})).await.unwrap(), json!("created"));
    assert_eq!(client.delete_quantum_job().await.unwrap(), json!([]));

    cancel.assert_async().await;
    create.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_make_service_request_with_extra_headers() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/chat/models")
        .match_header("api-key", "")
        .match_header("x-client", "qbraid-chat")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let request = ServiceRequest {
        api_url: server.url(),
        api_key: None,
        details: ServiceRequestDetails::GetChatModels,
    };
    let models: Vec<services::ChatModel> = ServiceClient::new()
        .make_service_request(
            &request,
            RequestOptions::default().header("x-client", "qbraid-chat"),
        )
        .await
        .unwrap();

    assert!(models.is_empty());
    mock.assert_async().await;
}
