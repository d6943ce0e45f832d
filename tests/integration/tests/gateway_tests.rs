//! Gateway Integration Tests
//!
//! Exercise the WebSocket relay end to end: messages sent through the HTTP
//! API or the gateway itself reach the receiver's live connection.
//!
//! Requires DATABASE_URL and REDIS_URL.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::{assert_json, assert_status, check_test_env, fixtures::*, TestGateway, TestServer};
use reqwest::StatusCode;
use serde_json::json;

/// Time for the gateway to finish its Redis subscription after READY
const SUBSCRIBE_GRACE: Duration = Duration::from_millis(500);

async fn signed_up(server: &TestServer) -> (RegisterRequest, String) {
    let request = RegisterRequest::unique();
    let response = server.post("/alumni/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post("/alumni/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let login: LoginResponse = assert_json(response, StatusCode::OK).await.unwrap();
    (request, login.token)
}

#[tokio::test]
async fn test_identify_returns_ready_with_name() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let (account, token) = signed_up(&server).await;

    let mut client = gateway.connect().await.unwrap();
    client
        .send(&json!({"op": 2, "d": {"token": token}}))
        .await
        .unwrap();

    let ready = client.next_dispatch("READY").await.unwrap();
    assert_eq!(ready["name"], account.name.as_str());
    assert!(ready["session_id"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn test_http_message_is_relayed_to_receiver() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let (alice, alice_token) = signed_up(&server).await;
    let (bob, bob_token) = signed_up(&server).await;

    let mut bob_client = gateway.identify(&bob_token).await.unwrap();
    tokio::time::sleep(SUBSCRIBE_GRACE).await;

    let response = server
        .post_auth("/chat/send", &alice_token, &SendMessageRequest::new(&bob.name, "over http"))
        .await
        .unwrap();
    let sent: ChatMessageResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let event = bob_client.next_dispatch("MESSAGE_CREATE").await.unwrap();
    assert_eq!(event["id"], sent.id.as_str());
    assert_eq!(event["sender"], alice.name.as_str());
    assert_eq!(event["message"], "over http");
}

#[tokio::test]
async fn test_gateway_message_is_persisted_and_relayed() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let (alice, alice_token) = signed_up(&server).await;
    let (bob, bob_token) = signed_up(&server).await;

    let mut alice_client = gateway.identify(&alice_token).await.unwrap();
    let mut bob_client = gateway.identify(&bob_token).await.unwrap();
    tokio::time::sleep(SUBSCRIBE_GRACE).await;

    alice_client
        .send(&json!({"op": 3, "d": {"receiver": bob.name, "message": "over the socket"}}))
        .await
        .unwrap();

    let event = bob_client.next_dispatch("MESSAGE_CREATE").await.unwrap();
    assert_eq!(event["sender"], alice.name.as_str());
    assert_eq!(event["receiver"], bob.name.as_str());
    assert!(event["createdAt"].is_string());

    let response = server
        .get(&format!("/chat/{}/{}", alice.name, bob.name))
        .await
        .unwrap();
    let history: Vec<ChatMessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].message, "over the socket");
}

#[tokio::test]
async fn test_heartbeat_is_acknowledged() {
    if !check_test_env().await {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.unwrap();

    client.send(&json!({"op": 1, "d": null})).await.unwrap();
    let ack = client.next_frame().await.unwrap();
    assert_eq!(ack["op"], 11);
}
