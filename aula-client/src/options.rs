//! Per-request options.

use crate::transport::HttpRequest;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Options for a single logical request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method (GET by default).
    pub method: Method,
    /// JSON body.
    pub body: Option<Value>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Query parameters appended to the endpoint.
    pub query: Vec<(String, String)>,
    /// Omit the bearer credential and never trigger a refresh.
    pub skip_auth: bool,
    /// Per-request timeout overriding the client default.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options for a GET request.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// Options for a POST request with a JSON body.
    #[must_use]
    pub fn post(body: Value) -> Self {
        Self::default().method(Method::POST).json(body)
    }

    /// Options for a PUT request with a JSON body.
    #[must_use]
    pub fn put(body: Value) -> Self {
        Self::default().method(Method::PUT).json(body)
    }

    /// Options for a PATCH request with a JSON body.
    #[must_use]
    pub fn patch(body: Value) -> Self {
        Self::default().method(Method::PATCH).json(body)
    }

    /// Options for a DELETE request.
    #[must_use]
    pub fn delete() -> Self {
        Self::default().method(Method::DELETE)
    }

    /// Set the method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Send without credentials.
    #[must_use]
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the wire request. `access_token` is ignored when `skip_auth` is set.
    pub(crate) fn prepare(&self, mut url: Url, access_token: Option<&str>) -> HttpRequest {
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }

        let mut headers = self.headers.clone();
        if !self.skip_auth {
            if let Some(token) = access_token {
                headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
            }
        }

        HttpRequest {
            method: self.method.clone(),
            url,
            headers,
            body: self.body.clone(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn url() -> Url {
        Url::parse("http://localhost/api/groups").unwrap()
    }

    fn authorization(request: &HttpRequest) -> Option<&str> {
        request
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_defaults_to_get() {
        let options = RequestOptions::get();
        assert_eq!(options.method, Method::GET);
        assert!(!options.skip_auth);
        assert!(options.body.is_none());
    }

    #[test]
    fn test_prepare_attaches_bearer() {
        let request = RequestOptions::get().prepare(url(), Some("T1"));
        assert_eq!(authorization(&request), Some("Bearer T1"));
    }

    #[test]
    fn test_prepare_skip_auth_omits_bearer() {
        let request = RequestOptions::get().skip_auth().prepare(url(), Some("T1"));
        assert_eq!(authorization(&request), None);
    }

    #[test]
    fn test_prepare_without_token() {
        let request = RequestOptions::get().prepare(url(), None);
        assert_eq!(authorization(&request), None);
    }

    #[test]
    fn test_prepare_query_and_body() {
        let request = RequestOptions::post(json!({"name": "1A"}))
            .query("page", "2")
            .query("search", "math & art")
            .header("X-Trace", "abc")
            .prepare(url(), None);

        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.url.as_str(),
            "http://localhost/api/groups?page=2&search=math+%26+art"
        );
        assert_eq!(request.body, Some(json!({"name": "1A"})));
        assert_eq!(
            request.headers,
            vec![("X-Trace".to_string(), "abc".to_string())]
        );
    }

    #[test]
    fn test_method_shortcuts() {
        assert_eq!(RequestOptions::put(json!({})).method, Method::PUT);
        assert_eq!(RequestOptions::patch(json!({})).method, Method::PATCH);
        assert_eq!(RequestOptions::delete().method, Method::DELETE);
    }
}
