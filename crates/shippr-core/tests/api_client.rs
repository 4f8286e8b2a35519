//! API client behavior against a mock tRPC server

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shippr::api::{ApiErrorKind, LoginInput};
use common::{client, ok, token_for, trpc_error};

fn login_input() -> LoginInput {
    LoginInput {
        email: "ada@example.com".into(),
        password: "correct-horse".into(),
    }
}

#[tokio::test]
async fn test_login_sends_batch_mutation() {
    let server = MockServer::start().await;
    let token = token_for("ada@example.com");

    Mock::given(method("POST"))
        .and(path("/auth.login"))
        .and(query_param("batch", "1"))
        .and(body_json(json!({
            "0": { "json": { "email": "ada@example.com", "password": "correct-horse" } }
        })))
        .respond_with(ok(json!({
            "token": token,
            "user": { "id": "user-1", "email": "ada@example.com", "name": "Ada" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _dir) = client(&server.uri());
    let payload = client.login(&login_input()).await.unwrap();

    assert_eq!(payload.token, token);
    assert_eq!(payload.user.unwrap().display_name(), "Ada");
}

#[tokio::test]
async fn test_query_sends_input_and_bearer_token() {
    let server = MockServer::start().await;
    let (client, _dir) = client(&server.uri());
    let token = token_for("ada@example.com");
    client.credentials().save(&token).unwrap();

    Mock::given(method("GET"))
        .and(path("/motd.getRandom"))
        .and(query_param("batch", "1"))
        .and(query_param(
            "input",
            r#"{"0":{"json":null,"meta":{"values":["undefined"]}}}"#,
        ))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ok(json!({ "message": "Ship it", "author": "shippr" })))
        .expect(1)
        .mount(&server)
        .await;

    let motd = client.random_motd().await.unwrap();
    assert_eq!(motd.message, "Ship it");
    assert_eq!(motd.author.as_deref(), Some("shippr"));
}

#[tokio::test]
async fn test_unauthorized_clears_credentials_without_retry() {
    let server = MockServer::start().await;
    let (client, _dir) = client(&server.uri());
    client.credentials().save(&token_for("ada@example.com")).unwrap();

    Mock::given(method("POST"))
        .and(path("/user.refresh"))
        .respond_with(trpc_error(401, "UNAUTHORIZED", "Session expired", None))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.refresh_user().await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    assert_eq!(err.message, "Session expired");
    assert!(!client.credentials().path().exists());
}

#[tokio::test]
async fn test_server_errors_are_retried_three_times() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth.login"))
        .respond_with(trpc_error(500, "INTERNAL_SERVER_ERROR", "boom", None))
        .expect(3)
        .mount(&server)
        .await;

    let (client, _dir) = client(&server.uri());
    let err = client.login(&login_input()).await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Server);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_retry_recovers_after_transient_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/motd.getRandom"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/motd.getRandom"))
        .respond_with(ok(json!({ "message": "Back again" })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _dir) = client(&server.uri());
    let motd = client.random_motd().await.unwrap();

    assert_eq!(motd.message, "Back again");
}

#[tokio::test]
async fn test_bad_request_surfaces_validation_issues() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth.createUser"))
        .respond_with(trpc_error(
            400,
            "BAD_REQUEST",
            "Invalid input",
            Some(json!({
                "formErrors": [],
                "fieldErrors": { "email": ["Email already in use"] }
            })),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _dir) = client(&server.uri());
    let err = client
        .create_user(&shippr::api::CreateUserInput {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "correct-horse".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::BadRequest);
    assert_eq!(err.issues, vec!["email: Email already in use".to_string()]);
    assert_eq!(
        err.display_lines(),
        vec![
            "Invalid input".to_string(),
            "• email: Email already in use".to_string()
        ]
    );
}

#[tokio::test]
async fn test_conflict_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth.login"))
        .respond_with(trpc_error(409, "CONFLICT", "Already signed in elsewhere", None))
        .expect(3)
        .mount(&server)
        .await;

    let (client, _dir) = client(&server.uri());
    let err = client.login(&login_input()).await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Conflict);
    assert_eq!(err.kind.code(), "CONFLICT");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (client, _dir) = client(&format!("http://{addr}"));
    let err = client.login(&login_input()).await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Network);
    assert_eq!(err.kind.code(), "NETWORK_ERROR");
}

#[tokio::test]
async fn test_void_mutation_succeeds_on_first_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth.resetPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "result": { "data": { "json": null, "meta": { "values": ["undefined"] } } }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _dir) = client(&server.uri());
    let ack = client
        .reset_password(&shippr::api::ResetPasswordInput {
            email: "ada@example.com".into(),
            code: "123456".into(),
            password: "new-password".into(),
        })
        .await
        .unwrap();

    assert_eq!(ack.message, None);
}
