//! Descriptors for every remote operation of the qBraid API.
//!
//! The client never branches on the operation: endpoint, method, query
//! parameter and response shape all come from [`ServiceRequestDetails`].

use common::UserConfig;
use serde_json::Value;
use std::fmt;

use crate::schema::{self, FieldType, Validation};

/// Top level service paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceEndpoint {
    Devices,
    Jobs,
    Chat,
}

impl ServiceEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            ServiceEndpoint::Devices => "/quantum-devices",
            ServiceEndpoint::Jobs => "/quantum-jobs",
            ServiceEndpoint::Chat => "/chat",
        }
    }
}

/// Paths nested under a [`ServiceEndpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubEndpoint {
    ChatModels,
}

impl SubEndpoint {
    fn path(self) -> &'static str {
        match self {
            SubEndpoint::ChatModels => "/models",
        }
    }
}

fn join_endpoints(service: ServiceEndpoint, partials: &[SubEndpoint]) -> String {
    partials
        .iter()
        .fold(service.path().to_string(), |mut endpoint, partial| {
            endpoint.push_str(partial.path());
            endpoint
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// How a response body is checked before it is handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseSchema {
    Checked(FieldType),
    /// Not implemented yet: the response shape of this operation is not
    /// defined, so any JSON passes. Do not reuse for operations whose shape
    /// is known.
    Unchecked,
}

/// One remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRequestDetails {
    GetQuantumDevices { queryparam: Option<String> },
    GetQuantumJobs,
    CreateQuantumJob,
    CancelQuantumJob { queryparam: String },
    DeleteQuantumJob,
    SendChat,
    GetChatModels,
}

impl ServiceRequestDetails {
    pub fn endpoint(&self) -> String {
        match self {
            Self::GetQuantumDevices { .. } => ServiceEndpoint::Devices.path().to_string(),
            Self::GetQuantumJobs
            | Self::CreateQuantumJob
            | Self::CancelQuantumJob { .. }
            | Self::DeleteQuantumJob => ServiceEndpoint::Jobs.path().to_string(),
            Self::SendChat => ServiceEndpoint::Chat.path().to_string(),
            Self::GetChatModels => join_endpoints(ServiceEndpoint::Chat, &[SubEndpoint::ChatModels]),
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Self::GetQuantumDevices { .. } | Self::GetQuantumJobs | Self::GetChatModels => {
                HttpMethod::Get
            }
            Self::CreateQuantumJob | Self::SendChat => HttpMethod::Post,
            Self::CancelQuantumJob { .. } => HttpMethod::Put,
            Self::DeleteQuantumJob => HttpMethod::Delete,
        }
    }

    pub fn queryparam(&self) -> Option<&str> {
        match self {
            Self::GetQuantumDevices { queryparam } => queryparam.as_deref(),
            Self::CancelQuantumJob { queryparam } => Some(queryparam),
            _ => None,
        }
    }

    pub fn response_schema(&self) -> ResponseSchema {
        match self {
            Self::GetQuantumDevices { .. } => ResponseSchema::Checked(schema::QUANTUM_DEVICES),
            Self::GetQuantumJobs => ResponseSchema::Checked(schema::QUANTUM_JOBS_RESPONSE),
            Self::SendChat => ResponseSchema::Checked(schema::CHAT_RESPONSE),
            Self::GetChatModels => ResponseSchema::Checked(schema::CHAT_MODELS),
            // TODO: define the job mutation responses once the agent can issue them
            Self::CreateQuantumJob | Self::CancelQuantumJob { .. } | Self::DeleteQuantumJob => {
                ResponseSchema::Unchecked
            }
        }
    }

    /// False for operations whose responses are accepted unchecked.
    pub fn is_validated(&self) -> bool {
        matches!(self.response_schema(), ResponseSchema::Checked(_))
    }

    pub fn check_response_type(&self, response: &Value) -> Validation {
        match self.response_schema() {
            ResponseSchema::Checked(shape) => shape.validate(response),
            ResponseSchema::Unchecked => Validation::Valid,
        }
    }
}

/// A descriptor bound to an API location. Built per call.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub api_url: String,
    pub api_key: Option<String>,
    pub details: ServiceRequestDetails,
}

impl ServiceRequest {
    pub fn new(config: &UserConfig, details: ServiceRequestDetails) -> Self {
        Self {
            api_url: config.api_url.clone(),
            api_key: Some(config.api_key.clone()),
            details,
        }
    }

    pub fn url(&self) -> String {
        let mut url = format!("{}{}", self.api_url, self.details.endpoint());
        if let Some(query) = self.details.queryparam() {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_table() {
        let cases = [
            (ServiceRequestDetails::GetQuantumDevices { queryparam: None }, "/quantum-devices", HttpMethod::Get, true),
            (ServiceRequestDetails::GetQuantumJobs, "/quantum-jobs", HttpMethod::Get, true),
            (ServiceRequestDetails::CreateQuantumJob, "/quantum-jobs", HttpMethod::Post, false),
            (
                ServiceRequestDetails::CancelQuantumJob { queryparam: "id=1".into() },
                "/quantum-jobs",
                HttpMethod::Put,
                false,
            ),
            (ServiceRequestDetails::DeleteQuantumJob, "/quantum-jobs", HttpMethod::Delete, false),
            (ServiceRequestDetails::SendChat, "/chat", HttpMethod::Post, true),
            (ServiceRequestDetails::GetChatModels, "/chat/models", HttpMethod::Get, true),
        ];

        for (details, endpoint, method, validated) in cases {
            assert_eq!(details.endpoint(), endpoint, "{details:?}");
            assert_eq!(details.method(), method, "{details:?}");
            assert_eq!(details.is_validated(), validated, "{details:?}");
        }
    }

    #[test]
    fn test_unchecked_operations_accept_anything() {
        for details in [
            ServiceRequestDetails::CreateQuantumJob,
            ServiceRequestDetails::DeleteQuantumJob,
        ] {
            assert!(details.check_response_type(&json!(null)).is_valid());
            assert!(details.check_response_type(&json!({"anything": [1, 2]})).is_valid());
        }
    }

    #[test]
    fn test_checked_operation_rejects_wrong_shape() {
        let result = ServiceRequestDetails::SendChat.check_response_type(&json!({"content": 1}));
        assert!(!result.is_valid());
        assert!(result.violations().contains(&"$.content: expected string".to_string()));
    }

    #[test]
    fn test_url_with_and_without_queryparam() {
        let config = UserConfig {
            api_url: "https://api.qbraid.com/api".into(),
            api_key: "k".into(),
        };
        let plain = ServiceRequest::new(&config, ServiceRequestDetails::GetChatModels);
        assert_eq!(plain.url(), "https://api.qbraid.com/api/chat/models");
        assert_eq!(plain.api_key.as_deref(), Some("k"));

        let filtered = ServiceRequest::new(
            &config,
            ServiceRequestDetails::GetQuantumDevices {
                queryparam: Some("provider=AWS".into()),
            },
        );
        assert_eq!(filtered.url(), "https://api.qbraid.com/api/quantum-devices?provider=AWS");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(reqwest::Method::from(HttpMethod::Put), reqwest::Method::PUT);
    }
}
