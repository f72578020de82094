// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! HTTP plumbing: request/response values and the blocking reqwest transport.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP verbs the backend understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Ordered `name=value` pairs sent as `application/x-www-form-urlencoded`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push((name.to_string(), value.into()));
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// A single request against the backend, relative to the configured base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path beginning with `/`, e.g. `/posts/42`.
    pub endpoint: String,
    pub form: Option<FormData>,
    /// Sent verbatim as the `Authorization` header when present.
    pub access_token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            form: None,
            access_token: None,
        }
    }

    pub fn with_form(mut self, form: FormData) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }
}

/// What came back from the backend, already read into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    /// Value of the `authorization` response header (fresh access token).
    pub authorization: Option<String>,
    pub body: String,
}

impl ApiResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Failures below HTTP semantics: no response was obtained at all.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid request URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("Could not build HTTP client: {0}")]
    Client(String),
    #[error("Request {method} {endpoint} failed: {message}")]
    Connection {
        method: &'static str,
        endpoint: String,
        message: String,
    },
}

/// Sends one request and returns one response. No retries happen at this layer.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Blocking reqwest client with a cookie jar for the HTTP-only refresh cookie.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: Url) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client, base_url })
    }
}

/// Append an endpoint path to the base URL, keeping any base path prefix.
pub fn endpoint_url(base: &Url, endpoint: &str) -> Result<Url, TransportError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| TransportError::InvalidUrl {
        url: joined.clone(),
        message: e.to_string(),
    })
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = endpoint_url(&self.base_url, &request.endpoint)?;
        let connection_error = |e: reqwest::Error| TransportError::Connection {
            method: request.method.as_str(),
            endpoint: request.endpoint.clone(),
            message: e.to_string(),
        };

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &request.access_token {
            builder = builder.header(AUTHORIZATION, token);
        }
        if let Some(form) = &request.form {
            builder = builder.form(form.fields());
        }

        let response = builder.send().map_err(connection_error)?;
        let status = response.status().as_u16();
        let authorization = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().map_err(connection_error)?;

        tracing::debug!(
            method = request.method.as_str(),
            endpoint = %request.endpoint,
            status,
            "backend responded"
        );

        Ok(ApiResponse {
            status,
            authorization,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{ApiResponse, FormData, endpoint_url};

    #[test]
    fn endpoint_url_keeps_base_path_prefix() {
        let base = Url::parse("https://example.com/api/").unwrap();
        let url = endpoint_url(&base, "/posts/7").unwrap();

        assert_eq!(url.as_str(), "https://example.com/api/posts/7");
    }

    #[test]
    fn endpoint_url_works_with_bare_host() {
        let base = Url::parse("http://localhost:5000").unwrap();
        let url = endpoint_url(&base, "/auth/tokens").unwrap();

        assert_eq!(url.as_str(), "http://localhost:5000/auth/tokens");
    }

    #[test]
    fn form_data_returns_first_value_for_name() {
        let form = FormData::new().with("title", "One").with("title", "Two");

        assert_eq!(form.get("title"), Some("One"));
        assert_eq!(form.get("missing"), None);
        assert_eq!(form.fields().len(), 2);
    }

    #[test]
    fn success_covers_only_2xx() {
        let mut response = ApiResponse {
            status: 204,
            authorization: None,
            body: String::new(),
        };
        assert!(response.is_success());

        response.status = 302;
        assert!(!response.is_success());
        response.status = 401;
        assert!(!response.is_success());
    }
}
