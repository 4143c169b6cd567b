use pcl_core::{compose_issue_request, ChangeSet, GenerationService, PclError, Service};
use pcl_remote::{OpenAiClient, OpenAiConfig};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DIFF: &str = "diff --git a/src/api.rs b/src/api.rs\n@@ -0,0 +1 @@\n+pub fn ping() {}";

fn client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(OpenAiConfig {
        // trailing slash as commonly found in OPENAI_BASE_URL
        base_url: format!("{}/", server.uri()),
        api_key: "sk-test".to_string(),
        model: "gpt-5".to_string(),
    })
    .unwrap()
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

#[tokio::test]
async fn sends_model_seed_and_three_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("null")))
        .expect(1)
        .mount(&server)
        .await;

    let request = compose_issue_request(&ChangeSet::new(DIFF), "PCL", "acc-1");
    let text = client(&server).complete(&request).await.unwrap();
    assert_eq!(text, "null");

    let received = &server.received_requests().await.unwrap()[0];
    let body: Value = serde_json::from_slice(&received.body).unwrap();
    assert_eq!(body["model"], "gpt-5");
    assert_eq!(body["seed"], 42);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[2]["role"], "user");
    assert_eq!(messages[2]["content"], DIFF);
}

#[tokio::test]
async fn non_success_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"bad key\"}"))
        .mount(&server)
        .await;

    let request = compose_issue_request(&ChangeSet::new(DIFF), "PCL", "acc-1");
    let err = client(&server).complete(&request).await.unwrap_err();

    match err {
        PclError::Status {
            service,
            status,
            body,
        } => {
            assert_eq!(service, Service::Generation);
            assert_eq!(status, 401);
            assert!(body.contains("bad key"));
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn empty_choices_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let request = compose_issue_request(&ChangeSet::new(DIFF), "PCL", "acc-1");
    let err = client(&server).complete(&request).await.unwrap_err();

    assert!(
        matches!(
            err,
            PclError::Transport {
                service: Service::Generation,
                ..
            }
        ),
        "{err}"
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = OpenAiClient::new(OpenAiConfig {
        base_url: uri,
        api_key: "sk-test".to_string(),
        model: "gpt-5".to_string(),
    })
    .unwrap();

    let request = compose_issue_request(&ChangeSet::new(DIFF), "PCL", "acc-1");
    let err = client.complete(&request).await.unwrap_err();
    assert!(matches!(err, PclError::Transport { .. }), "{err}");
}
