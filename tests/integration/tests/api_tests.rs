//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, check_test_env, fixtures::*, TestServer};
use reqwest::StatusCode;

/// Register a fresh account and log it in
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

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/alumni/register", &request).await.unwrap();
    let _: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post("/alumni/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let login: LoginResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(login.alumni.name, request.name);
    assert_eq!(login.alumni.email, request.email);
    assert!(!login.token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/alumni/register", &request).await.unwrap();

    let response = server.post("/alumni/register", &request).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(error.error.code, "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_duplicate_name() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (first, _) = signed_up(&server).await;

    let mut same_name = RegisterRequest::unique();
    same_name.name = first.name.clone();
    let response = server.post("/alumni/register", &same_name).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(error.error.code, "NAME_ALREADY_EXISTS");

    let response = server
        .post("/alumni/login", &LoginRequest::from_register(&same_name))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = signed_up(&server).await;

    let case_variant = request.password.to_uppercase();
    let prefix = request.password[..request.password.len() - 1].to_string();
    let padded = format!("{} ", request.password);
    for password in ["", case_variant.as_str(), prefix.as_str(), padded.as_str(), "not-the-password"] {
        let wrong_password = LoginRequest {
            email: request.email.clone(),
            password: password.to_string(),
        };
        let response = server.post("/alumni/login", &wrong_password).await.unwrap();
        assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
    }

    let unknown = LoginRequest {
        email: format!("nobody-{}@example.com", unique_suffix()),
        password: "whatever1".to_string(),
    };
    let response = server.post("/alumni/login", &unknown).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_alumni_directory_lists_registered_names() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = signed_up(&server).await;

    for path in ["/alumni", "/alumni/"] {
        let response = server.get(path).await.unwrap();
        let alumni: Vec<AlumniSummary> = assert_json(response, StatusCode::OK).await.unwrap();
        assert!(alumni
            .iter()
            .any(|a| a.name == request.name && a.occupation == request.occupation));
    }
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_profile_upsert_and_fetch() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, token) = signed_up(&server).await;
    let path = format!("/profile/{}", request.name);

    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let body = serde_json::json!({"department": "CS", "degree": "BSc", "about": "Hi"});
    let response = server.post_auth("/profile/update", &token, &body).await.unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.name, request.name);
    assert!(profile.profile_pic.is_none());

    let picture = reqwest::multipart::Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("me.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .text("department", "Maths")
        .text("degree", "MSc")
        .text("about", "Updated")
        .part("profilePic", picture);
    let response = server.post_form("/profile/update", &token, form).await.unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let pic = profile.profile_pic.expect("picture should be stored");
    assert!(pic.starts_with("/uploads/"));
    assert!(pic.ends_with(".png"));

    let response = server.get(&pic).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get(&path).await.unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.department, "Maths");
    assert_eq!(profile.degree, "MSc");
}

#[tokio::test]
async fn test_profile_update_requires_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let body = serde_json::json!({"department": "CS"});
    let response = server.post("/profile/update", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Forum Tests
// ============================================================================

#[tokio::test]
async fn test_thread_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (author, token) = signed_up(&server).await;
    let (_, other_token) = signed_up(&server).await;

    let form = thread_form("Reunion", "Who is coming?", "events, 2026");
    let response = server.post_form("/forum/create-thread", &token, form).await.unwrap();
    let thread: ThreadResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(thread.author, author.name);
    assert_eq!(thread.tags, vec!["events", "2026"]);
    assert!(thread.poll.is_none());

    let reply_path = format!("/forum/{}/reply", thread.id);
    let response = server
        .post_auth(&reply_path, &other_token, &ReplyRequest { message: "Me!".into() })
        .await
        .unwrap();
    let thread: ThreadResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread.replies.len(), 1);
    let reply_id = thread.replies[0].id.clone();

    // Only the reply's author may delete it
    let delete_reply = format!("/forum/{}/reply/{reply_id}", thread.id);
    let response = server.delete_auth(&delete_reply, &token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    let response = server.delete_auth(&delete_reply, &other_token).await.unwrap();
    let thread: ThreadResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(thread.replies.is_empty());

    let response = server.get(&format!("/forum/my-posts/{}", author.name)).await.unwrap();
    let mine: Vec<ThreadResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(mine.len(), 1);

    for (reply_token, message) in [(&other_token, "See you there"), (&token, "Great!")] {
        server
            .post_auth(&reply_path, reply_token, &ReplyRequest { message: message.into() })
            .await
            .unwrap();
    }

    let thread_path = format!("/forum/{}", thread.id);
    let response = server.get(&thread_path).await.unwrap();
    let before: ThreadResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(before.replies.len(), 2);

    let response = server.delete_auth(&thread_path, &other_token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // A refused delete leaves every reply in place, in order
    let response = server.get(&thread_path).await.unwrap();
    let after: ThreadResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let ids = |t: &ThreadResponse| t.replies.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&after), ids(&before));
    let messages: Vec<_> = after.replies.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, vec!["See you there", "Great!"]);

    let response = server.delete_auth(&thread_path, &token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get(&thread_path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_poll_votes_once_per_account() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_up(&server).await;
    let (_, voter_token) = signed_up(&server).await;

    let poll = CreatePollRequest::new("Best venue?", &["Campus", "Downtown"]);
    let response = server.post_auth("/forum/create-poll", &token, &poll).await.unwrap();
    let thread: ThreadResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(thread.poll.as_ref().unwrap().options.len(), 2);

    let vote_path = format!("/forum/{}/poll", thread.id);

    let response = server
        .post_auth(&vote_path, &voter_token, &VoteRequest { option_index: 5 })
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_auth(&vote_path, &voter_token, &VoteRequest { option_index: 1 })
        .await
        .unwrap();
    let poll: PollResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(poll.options[1].votes, 1);
    assert_eq!(poll.options[0].votes, 0);
    assert_eq!(poll.voted_users.len(), 1);

    let response = server
        .post_auth(&vote_path, &voter_token, &VoteRequest { option_index: 0 })
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(error.error.code, "ALREADY_VOTED");

    let response = server.get("/forum/polls").await.unwrap();
    let polls: Vec<ThreadResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(polls.iter().any(|t| t.id == thread.id));
}

#[tokio::test]
async fn test_vote_on_discussion_thread_is_not_found() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_up(&server).await;

    let form = thread_form("No poll here", "Just talk", "");
    let response = server.post_form("/forum/create-thread", &token, form).await.unwrap();
    let thread: ThreadResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(&format!("/forum/{}/poll", thread.id), &token, &VoteRequest { option_index: 0 })
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Chat Tests
// ============================================================================

#[tokio::test]
async fn test_chat_history_and_partners() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (alice, alice_token) = signed_up(&server).await;
    let (bob, bob_token) = signed_up(&server).await;

    let response = server
        .post_auth("/chat/send", &alice_token, &SendMessageRequest::new(&bob.name, "hello bob"))
        .await
        .unwrap();
    let sent: ChatMessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(sent.sender, alice.name);
    assert_eq!(sent.receiver, bob.name);

    server
        .post_auth("/chat/send", &bob_token, &SendMessageRequest::new(&alice.name, "hi alice"))
        .await
        .unwrap();

    let response = server.get(&format!("/chat/{}/{}", bob.name, alice.name)).await.unwrap();
    let history: Vec<ChatMessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let texts: Vec<_> = history.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["hello bob", "hi alice"]);

    let response = server.get(&format!("/chat/users/{}", alice.name)).await.unwrap();
    let partners: Vec<String> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(partners, vec![bob.name.clone()]);
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_up(&server).await;

    let response = server
        .post_auth("/chat/send", &token, &SendMessageRequest::new("someone", "   "))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
