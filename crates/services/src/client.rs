use common::{QbraidChatError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::request::ServiceRequest;
use crate::schema::Validation;

const API_KEY_HEADER: &str = "api-key";

/// Per-call additions to a service request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub body: Option<Value>,
    /// Replace the default headers when names collide
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn json_body(body: &impl Serialize) -> Result<Self> {
        Ok(Self {
            body: Some(serde_json::to_value(body)?),
            headers: Vec::new(),
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Executes [`ServiceRequest`]s. One network call per request, no retries.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    timeout: Option<Duration>,
}

impl Default for ServiceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QbraidChatError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout: Some(timeout),
        })
    }

    /// Sends the request, checks the body against the descriptor's schema and
    /// deserializes it into the operation's response type.
    pub async fn make_service_request<T: DeserializeOwned>(
        &self,
        request: &ServiceRequest,
        options: RequestOptions,
    ) -> Result<T> {
        let body = self.make_validated_json_request(request, options).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Like [`Self::make_service_request`] but hands back the checked body
    /// untouched: key order, unknown fields and number literals survive.
    pub async fn make_validated_json_request(
        &self,
        request: &ServiceRequest,
        options: RequestOptions,
    ) -> Result<Value> {
        let body = self.fetch_json(request, options).await?;
        let endpoint = request.details.endpoint();

        match request.details.check_response_type(&body) {
            Validation::Valid => Ok(body),
            Validation::Invalid(violations) => {
                warn!(endpoint = %endpoint, ?violations, "Unexpected response shape");
                Err(QbraidChatError::bad_response(endpoint, violations))
            }
        }
    }

    async fn fetch_json(&self, request: &ServiceRequest, options: RequestOptions) -> Result<Value> {
        let url = request.url();
        let method = request.details.method();
        debug!(%method, %url, "Sending service request");

        let mut builder = self
            .client
            .request(method.into(), &url)
            .headers(build_headers(request, &options.headers)?);
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(&request.details.endpoint(), e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Service responded with an error status");
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&request.details.endpoint(), e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn transport_error(&self, endpoint: &str, error: reqwest::Error) -> QbraidChatError {
        match self.timeout {
            Some(timeout) if error.is_timeout() => QbraidChatError::Timeout {
                operation: endpoint.to_string(),
                after_ms: timeout.as_millis() as u64,
            },
            _ => QbraidChatError::Transport(error.to_string()),
        }
    }
}

fn build_headers(request: &ServiceRequest, extra: &[(String, String)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        header_value(request.api_key.as_deref().unwrap_or(""))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| QbraidChatError::Transport(format!("Invalid header name {name}: {e}")))?;
        headers.insert(name, header_value(value)?);
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| QbraidChatError::Transport(format!("Invalid header value: {e}")))
}
