use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A chat model offered by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatModel {
    /// Identifier sent back in chat requests
    pub model: String,
    pub description: String,
    pub pricing: ChatModelPricing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatModelPricing {
    /// e.g. "per 1M tokens"
    pub units: String,
    pub input: f64,
    pub output: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatApiRequestBody {
    pub prompt: String,
    pub model: String,
    pub stream: bool,
}

impl ChatApiRequestBody {
    /// Streaming is never requested.
    pub fn new(prompt: &str, model: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            model: model.to_string(),
            stream: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatApiJsonResponseBody {
    pub content: String,
    pub usage: ChatApiUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatApiUsage {
    pub completion_tokens: f64,
    pub prompt_tokens: f64,
    pub total_tokens: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumDevice {
    #[serde(rename = "qbraid_id")]
    pub qbraid_id: String,
    pub name: String,
    pub provider: String,
    pub vendor: String,
    pub number_qubits: f64,
    pub pending_jobs: f64,
    pub paradigm: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub run_package: String,
    pub status: String,
    pub status_msg: Option<String>,
    pub is_available: bool,
    pub next_available: Option<String>,
    pub pricing: DevicePricing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePricing {
    pub per_task: f64,
    pub per_shot: f64,
    pub per_minute: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetQuantumJobsResponse {
    pub jobs_array: Vec<QuantumJob>,
    pub status_group: String,
    pub provider: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumJob {
    pub time_stamps: QuantumJobTimeStamps,
    pub queue_position: Option<f64>,
    pub queue_depth: Option<f64>,
    pub circuit_num_qubits: f64,
    pub circuit_depth: f64,
    pub qbraid_device_id: String,
    pub qbraid_job_id: String,
    pub status: String,
    pub vendor: String,
    pub provider: String,
    pub escrow: f64,
    pub cost: f64,
    pub shots: f64,
    pub open_qasm: String,
    pub measurement_counts: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumJobTimeStamps {
    pub created_at: String,
    pub ended_at: Option<String>,
    pub execution_duration: Option<f64>,
}
