//! # API Client
//!
//! tRPC-over-HTTP client for the Shippr API.
//!
//! Calls use the batch wire format with the superjson envelope:
//!
//! - query: `GET /{procedure}?batch=1&input={"0":{"json":...}}`
//! - mutation: `POST /{procedure}?batch=1` with body `{"0":{"json":...}}`
//!
//! Every call is retried according to the configured [`RetryPolicy`] and
//! logged with its duration and outcome.

use std::fmt;
use std::time::Instant;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::error::{ApiError, ApiErrorKind, ApiResult, TrpcErrorShape};
use super::retry::{with_retry, Attempted, RetryPolicy};
use crate::auth::CredentialStore;
use crate::config::Config;
use crate::error::{Error, Result};

/// Whether a call reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Idempotent read, sent as `GET`.
    Query,
    /// Write, sent as `POST`.
    Mutation,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Mutation => f.write_str("mutation"),
        }
    }
}

/// HTTP client for the Shippr tRPC API.
///
/// Cheap to clone. Holds the [`CredentialStore`] so that it can attach the
/// session token and drop it when the server rejects it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
    retry: RetryPolicy,
    credentials: CredentialStore,
}

impl ApiClient {
    /// Creates a client from configuration.
    pub fn new(config: &Config, credentials: CredentialStore) -> Result<Self> {
        let mut base_url = Url::parse(&config.api.url)
            .map_err(|e| Error::config(format!("invalid api.url '{}': {e}", config.api.url)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder().timeout(config.api.timeout).build()?;

        Ok(Self {
            base_url,
            http,
            retry: RetryPolicy::from(&config.retry),
            credentials,
        })
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Base URL every procedure path is joined onto.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Store used for the session token.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Calls a query procedure.
    pub async fn query<I, O>(&self, procedure: &str, input: &I) -> ApiResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.call(CallKind::Query, procedure, input).await
    }

    /// Calls a mutation procedure.
    pub async fn mutate<I, O>(&self, procedure: &str, input: &I) -> ApiResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.call(CallKind::Mutation, procedure, input).await
    }

    async fn call<I, O>(&self, kind: CallKind, procedure: &str, input: &I) -> ApiResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let envelope = envelope(input)?;
        let body = &envelope;
        let started = Instant::now();

        let Attempted { result, attempts } = with_retry(&self.retry, procedure, move |attempt| {
            debug!(procedure, %kind, attempt, "Sending request");
            self.send_once(kind, procedure, body)
        })
        .await;

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                info!(procedure, %kind, attempts, duration_ms, outcome = "ok", "API call completed");
            }
            Err(err) => {
                warn!(
                    procedure,
                    %kind,
                    attempts,
                    duration_ms,
                    outcome = "error",
                    code = %err.kind,
                    error = %err.message,
                    "API call failed"
                );
                if err.kind == ApiErrorKind::Unauthorized {
                    if let Err(e) = self.credentials.clear() {
                        warn!(error = %e, "Failed to clear credentials after UNAUTHORIZED");
                    }
                }
            }
        }
        result
    }

    async fn send_once<O>(&self, kind: CallKind, procedure: &str, envelope: &Value) -> ApiResult<O>
    where
        O: DeserializeOwned,
    {
        let mut url = self.base_url.join(procedure).map_err(|e| {
            ApiError::new(ApiErrorKind::Unknown, format!("invalid procedure '{procedure}'"))
                .with_source(e)
        })?;

        let request = match kind {
            CallKind::Query => {
                url.query_pairs_mut()
                    .append_pair("batch", "1")
                    .append_pair("input", &envelope.to_string());
                self.http.get(url)
            }
            CallKind::Mutation => {
                url.query_pairs_mut().append_pair("batch", "1");
                self.http.post(url).json(envelope)
            }
        };

        let request = match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(ApiError::from_transport)?;

        decode_response(status, &body)
    }
}

/// Wraps `input` as the first (and only) item of a batch.
fn envelope<I: Serialize + ?Sized>(input: &I) -> ApiResult<Value> {
    let value = serde_json::to_value(input).map_err(|e| {
        ApiError::new(ApiErrorKind::Unknown, "could not encode request").with_source(e)
    })?;

    let item = if value.is_null() {
        json!({ "json": null, "meta": { "values": ["undefined"] } })
    } else {
        json!({ "json": value })
    };
    Ok(json!({ "0": item }))
}

#[derive(Debug, Deserialize)]
struct ResponseItem {
    #[serde(default)]
    result: Option<ResultBody>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ResultBody {
    #[serde(default)]
    data: Value,
}

/// Strips the superjson `{ "json": ... }` wrapper when present.
fn unwrap_superjson(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("json") => map.remove("json").unwrap_or(Value::Null),
        other => other,
    }
}

/// Decodes the first item of a batch response.
pub(crate) fn decode_response<O: DeserializeOwned>(status: u16, body: &[u8]) -> ApiResult<O> {
    let item = serde_json::from_slice::<Vec<ResponseItem>>(body)
        .ok()
        .and_then(|items| items.into_iter().next())
        .or_else(|| serde_json::from_slice::<ResponseItem>(body).ok());

    let Some(item) = item else {
        let kind = if (200..300).contains(&status) {
            ApiErrorKind::Unknown
        } else {
            ApiErrorKind::from_status(status)
        };
        return Err(ApiError::new(
            kind,
            format!("unexpected response from server (HTTP {status})"),
        ));
    };

    if let Some(error) = item.error {
        let shape: TrpcErrorShape =
            serde_json::from_value(unwrap_superjson(error)).unwrap_or_default();
        return Err(ApiError::from_trpc(shape, status));
    }

    let Some(result) = item.result else {
        return Err(ApiError::new(
            ApiErrorKind::Unknown,
            "response contained neither a result nor an error",
        ));
    };

    let data = unwrap_superjson(result.data);
    let decoded = match serde_json::from_value(data.clone()) {
        // void procedures answer `null`; let object outputs fall back to their defaults
        Err(_) if data.is_null() => serde_json::from_value(json!({})),
        other => other,
    };
    decoded.map_err(|e| {
        ApiError::new(ApiErrorKind::Unknown, "unexpected response from server").with_source(e)
    })
}
