//! HTTP transport and response classification.

use async_trait::async_trait;
use aula_core::{ApiError, ApiResult, ClientConfig};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A fully prepared HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, query included.
    pub url: Url,
    /// Headers, including `Authorization` when credentials apply.
    pub headers: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Look up a header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Performs a single HTTP exchange.
///
/// Implementations return `Err` only when no response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return whatever the server answered.
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client from the configured timeout and user agent.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "Making HTTP request");

        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        debug!(status, bytes = body.len(), "Received HTTP response");
        Ok(HttpResponse { status, body })
    }
}

/// Map a reqwest failure to a network error.
fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::network(format!("request timed out: {}", err))
    } else if err.is_connect() {
        ApiError::network(format!("connection failed: {}", err))
    } else {
        ApiError::network(err.to_string())
    }
}

/// Classified outcome of one exchange.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    /// 2xx; `None` for 204 or an empty body.
    Success(Option<Value>),
    /// 401.
    Unauthorized(ApiError),
    /// Any other non-2xx, or an unparseable success body.
    Failed(ApiError),
}

pub(crate) fn classify(response: HttpResponse) -> Outcome {
    if response.is_success() {
        if response.status == 204 || response.body.trim().is_empty() {
            return Outcome::Success(None);
        }
        return match serde_json::from_str(&response.body) {
            Ok(value) => Outcome::Success(Some(value)),
            Err(e) => Outcome::Failed(ApiError::malformed(format!(
                "invalid JSON in {} response: {}",
                response.status, e
            ))),
        };
    }

    let error = ApiError::request_failed(
        response.status,
        error_message(response.status, &response.body),
    );
    if response.status == 401 {
        Outcome::Unauthorized(error)
    } else {
        Outcome::Failed(error)
    }
}

/// Server-supplied failure message, or `Request failed (<status>)`.
///
/// Looks at `message` then `error`; a list of messages (validation errors)
/// is joined with `", "`.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            message_field(v.get("message")).or_else(|| message_field(v.get("error")))
        })
        .unwrap_or_else(|| format!("Request failed ({})", status))
}

fn message_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::message(r#"{"message":"Group is full"}"#, "Group is full")]
    #[case::error(r#"{"error":"Bad Request"}"#, "Bad Request")]
    #[case::message_wins(r#"{"message":"first","error":"second"}"#, "first")]
    #[case::message_list(r#"{"message":["name is required","code too long"]}"#, "name is required, code too long")]
    #[case::empty_message(r#"{"message":"","error":"fallback"}"#, "fallback")]
    #[case::not_json("<html>oops</html>", "Request failed (400)")]
    #[case::empty("", "Request failed (400)")]
    #[case::object_message(r#"{"message":{"nested":true}}"#, "Request failed (400)")]
    fn test_error_message(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(error_message(400, body), expected);
    }

    #[test]
    fn test_classify_success() {
        let outcome = classify(HttpResponse::new(200, r#"{"id":1}"#));
        assert_eq!(outcome, Outcome::Success(Some(json!({"id": 1}))));
    }

    #[rstest]
    #[case(204, "")]
    #[case(200, "")]
    #[case(201, "  ")]
    fn test_classify_empty_success(#[case] status: u16, #[case] body: &str) {
        assert_eq!(classify(HttpResponse::new(status, body)), Outcome::Success(None));
    }

    #[test]
    fn test_classify_malformed_success() {
        let outcome = classify(HttpResponse::new(200, "not json"));
        assert!(matches!(outcome, Outcome::Failed(ApiError::MalformedResponse(_))));
    }

    #[test]
    fn test_classify_unauthorized() {
        let outcome = classify(HttpResponse::new(401, r#"{"message":"jwt expired"}"#));
        assert_eq!(
            outcome,
            Outcome::Unauthorized(ApiError::request_failed(401, "jwt expired"))
        );
    }

    #[test]
    fn test_classify_failure() {
        let outcome = classify(HttpResponse::new(500, ""));
        assert_eq!(outcome, Outcome::Failed(ApiError::generic_failure(500)));
    }

    #[test]
    fn test_request_header_lookup() {
        let request = HttpRequest {
            method: Method::GET,
            url: Url::parse("http://localhost/").unwrap(),
            headers: vec![("Authorization".into(), "Bearer T1".into())],
            body: None,
            timeout: None,
        };
        assert_eq!(request.header("authorization"), Some("Bearer T1"));
        assert_eq!(request.header("x-missing"), None);
    }

    #[test]
    fn test_reqwest_transport_from_config() {
        let transport = ReqwestTransport::new(&ClientConfig::default());
        assert!(transport.is_ok());
    }
}
