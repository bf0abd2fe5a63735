use anatomize_core::model::{Region, RelaySettingsDraft};
use serde_json::json;
use services::{HttpRelayClient, RelayError, TutorRelay};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpRelayClient {
    let settings = RelaySettingsDraft {
        base_url: Some(server.uri()),
        timeout_secs: Some(5),
    }
    .validate()
    .unwrap();
    HttpRelayClient::new(settings).unwrap()
}

#[tokio::test]
async fn chat_posts_region_and_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "region": "thorax", "inputText": "What is the diaphragm?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "The diaphragm separates the thorax from the abdomen."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .chat(Region::Thorax, "What is the diaphragm?")
        .await
        .unwrap();
    assert_eq!(reply, "The diaphragm separates the thorax from the abdomen.");
}

#[tokio::test]
async fn chat_error_status_and_missing_reply_fail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "busy" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.chat(Region::Back, "hi").await.unwrap_err();
    assert!(matches!(err, RelayError::HttpStatus(status) if status.as_u16() == 502));

    let err = client.chat(Region::Back, "hi").await.unwrap_err();
    assert!(matches!(err, RelayError::EmptyReply));
}

#[tokio::test]
async fn quiz_returns_validated_question() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/quiz"))
        .and(body_json(json!({ "region": "lowerlimb" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "Which bone is the longest in the body?",
            "options": ["Tibia", "Femur", "Fibula", "Patella"],
            "answer": "Femur",
            "explanation": "The femur is the longest bone."
        })))
        .mount(&server)
        .await;

    let question = client_for(&server).quiz(Region::LowerLimb).await.unwrap();
    assert_eq!(question.text(), "Which bone is the longest in the body?");
    assert!(question.is_correct("Femur"));
}

#[tokio::test]
async fn quiz_with_bad_shape_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/quiz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "Pick one",
            "options": ["A", "B", "C"],
            "answer": "A"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/quiz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.quiz(Region::Head).await.unwrap_err();
    assert!(matches!(err, RelayError::InvalidQuestion(_)));

    let err = client.quiz(Region::Head).await.unwrap_err();
    assert!(matches!(err, RelayError::Http(_)));
}

#[tokio::test]
async fn health_checks_status_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "degraded" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.health().await.unwrap();
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, RelayError::Unhealthy(status) if status == "degraded"));
}
