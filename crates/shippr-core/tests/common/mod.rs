//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::Utc;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::ResponseTemplate;

use shippr::api::{ApiClient, RetryPolicy};
use shippr::auth::token::encode_unsigned;
use shippr::auth::CredentialStore;
use shippr::config::{ApiConfig, Config};

/// Client pointed at `url` with a credential store in a temp dir.
/// Retries are immediate so failure paths stay fast.
pub fn client(url: &str) -> (ApiClient, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = Config {
        api: ApiConfig {
            url: url.to_string(),
            ..ApiConfig::default()
        },
        ..Config::default()
    };
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    let client = ApiClient::new(&config, store)
        .unwrap()
        .with_retry_policy(RetryPolicy::new(3, Vec::new()));
    (client, dir)
}

/// Unsigned token for `email` expiring in an hour
pub fn token_for(email: &str) -> String {
    encode_unsigned(&json!({
        "sub": "user-1",
        "email": email,
        "exp": Utc::now().timestamp() + 3600,
    }))
}

/// Token whose `exp` is in the past
pub fn expired_token() -> String {
    encode_unsigned(&json!({
        "email": "ada@example.com",
        "exp": Utc::now().timestamp() - 60,
    }))
}

/// Batch success item
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([{ "result": { "data": { "json": data } } }]))
}

/// Batch error item with a tRPC code
pub fn trpc_error(status: u16, code: &str, message: &str, zod: Option<Value>) -> ResponseTemplate {
    let mut data = json!({ "code": code, "httpStatus": status });
    if let Some(zod) = zod {
        data["zodError"] = zod;
    }
    ResponseTemplate::new(status).set_body_json(json!([{
        "error": { "json": { "message": message, "code": -32000, "data": data } }
    }]))
}
