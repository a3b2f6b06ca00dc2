use async_trait::async_trait;
use common::{Result, UserConfigProvider};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::client::{RequestOptions, ServiceClient};
use crate::request::{ServiceRequest, ServiceRequestDetails};
use crate::types::{
    ChatApiJsonResponseBody, ChatApiRequestBody, ChatModel, GetQuantumJobsResponse, QuantumDevice,
};

/// The qBraid operations the dispatcher and the chat front-end rely on.
#[async_trait]
pub trait QbraidApi: Send + Sync {
    /// One non-streaming chat completion.
    async fn send_chat(&self, model: &ChatModel, message: &str) -> Result<ChatApiJsonResponseBody>;

    async fn get_chat_models(&self) -> Result<Vec<ChatModel>>;

    async fn get_quantum_devices(&self) -> Result<Vec<QuantumDevice>>;

    async fn get_quantum_jobs(&self) -> Result<GetQuantumJobsResponse>;

    /// Validated response body of a read-only service call, as received.
    async fn get_service_json(&self, details: ServiceRequestDetails) -> Result<Value>;
}

/// HTTP implementation of [`QbraidApi`].
///
/// Credentials are resolved on every call.
#[derive(Clone)]
pub struct QbraidClient {
    config: Arc<dyn UserConfigProvider>,
    http: ServiceClient,
}

impl QbraidClient {
    pub fn new(config: Arc<dyn UserConfigProvider>) -> Self {
        Self::with_service_client(config, ServiceClient::new())
    }

    pub fn with_service_client(config: Arc<dyn UserConfigProvider>, http: ServiceClient) -> Self {
        Self { config, http }
    }

    fn request(&self, details: ServiceRequestDetails) -> Result<ServiceRequest> {
        let config = self.config.user_config()?;
        Ok(ServiceRequest::new(&config, details))
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        details: ServiceRequestDetails,
        options: RequestOptions,
    ) -> Result<T> {
        let request = self.request(details)?;
        self.http.make_service_request(&request, options).await
    }

    /// Devices filtered by a raw query string, e.g. `provider=AWS`.
    pub async fn get_quantum_devices_filtered(&self, query: &str) -> Result<Vec<QuantumDevice>> {
        self.execute(
            ServiceRequestDetails::GetQuantumDevices {
                queryparam: Some(query.to_string()),
            },
            RequestOptions::default(),
        )
        .await
    }

    // The job mutations below are not validated (see `ResponseSchema::Unchecked`),
    // so they hand back raw JSON.

    pub async fn create_quantum_job(&self, job: &Value) -> Result<Value> {
        self.execute(
            ServiceRequestDetails::CreateQuantumJob,
            RequestOptions::json_body(job)?,
        )
        .await
    }

    pub async fn cancel_quantum_job(&self, job_id: &str) -> Result<Value> {
        info!(job_id, "Cancelling quantum job");
        self.execute(
            ServiceRequestDetails::CancelQuantumJob {
                queryparam: format!("id={job_id}"),
            },
            RequestOptions::default(),
        )
        .await
    }

    pub async fn delete_quantum_job(&self) -> Result<Value> {
        self.execute(ServiceRequestDetails::DeleteQuantumJob, RequestOptions::default())
            .await
    }
}

#[async_trait]
impl QbraidApi for QbraidClient {
    async fn send_chat(&self, model: &ChatModel, message: &str) -> Result<ChatApiJsonResponseBody> {
        let body = ChatApiRequestBody::new(message, &model.model);
        self.execute(ServiceRequestDetails::SendChat, RequestOptions::json_body(&body)?)
            .await
    }

    async fn get_chat_models(&self) -> Result<Vec<ChatModel>> {
        self.execute(ServiceRequestDetails::GetChatModels, RequestOptions::default())
            .await
    }

    async fn get_quantum_devices(&self) -> Result<Vec<QuantumDevice>> {
        self.execute(
            ServiceRequestDetails::GetQuantumDevices { queryparam: None },
            RequestOptions::default(),
        )
        .await
    }

    async fn get_quantum_jobs(&self) -> Result<GetQuantumJobsResponse> {
        self.execute(ServiceRequestDetails::GetQuantumJobs, RequestOptions::default())
            .await
    }

    async fn get_service_json(&self, details: ServiceRequestDetails) -> Result<Value> {
        let request = self.request(details)?;
        self.http
            .make_validated_json_request(&request, RequestOptions::default())
            .await
    }
}
