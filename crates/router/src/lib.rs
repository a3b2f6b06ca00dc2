//! Agentic request routing.
//!
//! Decides per user message whether it is a plain chat turn or a query
//! against one or more auxiliary qBraid services, and builds the reply text.

use common::{OperationTimer, QbraidChatError, Result, SessionContext};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use services::{ChatModel, QbraidApi, ServiceRequestDetails};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

const PROMPT_PREFIX: &str = "Does the following question have to do with Qbraid ";
const PROMPT_SUFFIX: &str = "Answer with a simple yes or no.";
const RESULTS_HEADER: &str = "Here are the results of your query:";

/// UTF-16 code units of serialized service data shown per reply line.
pub const PREVIEW_UNITS: usize = 100;

/// Largest magnitude below which every integral f64 is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Auxiliary services a message can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Devices,
    Jobs,
    Models,
}

impl Service {
    /// Classification and rendering order.
    pub const ALL: [Service; 3] = [Service::Devices, Service::Jobs, Service::Models];

    pub fn name(self) -> &'static str {
        match self {
            Service::Devices => "Devices",
            Service::Jobs => "Jobs",
            Service::Models => "Models",
        }
    }

    pub fn request_details(self) -> ServiceRequestDetails {
        match self {
            Service::Devices => ServiceRequestDetails::GetQuantumDevices { queryparam: None },
            Service::Jobs => ServiceRequestDetails::GetQuantumJobs,
            Service::Models => ServiceRequestDetails::GetChatModels,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bounds for the classification and fetch fan-outs.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Concurrent calls per fan-out; the default covers every service at once
    pub max_concurrency: usize,
    /// Limit for each individual remote call
    pub call_timeout: Option<Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrency: Service::ALL.len(),
            call_timeout: None,
        }
    }
}

/// Yes/no relevance question for one service.
pub fn create_prompt_question(service: Service, user_input: &str) -> String {
    format!("{PROMPT_PREFIX}{service} API: \"{user_input}\". {PROMPT_SUFFIX}")
}

/// Plain substring test: "yesterday" counts as a yes.
pub fn is_affirmative(reply: &str) -> bool {
    reply.to_lowercase().contains("yes")
}

pub fn render_service_details(service: Service, serialized: &str) -> String {
    let preview = utf16_prefix(serialized, PREVIEW_UNITS);
    format!("Here are the details on your {service} request: {preview}...")
}

/// Longest prefix of at most `units` UTF-16 code units. A character that
/// would straddle the limit is left out whole.
fn utf16_prefix(text: &str, units: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += ch.len_utf16();
        if used > units {
            return &text[..idx];
        }
    }
    text
}

/// Rewrites integral floats (`5.0`, `-0.0`) as integers so the text matches
/// what a JavaScript client would print for the same body.
pub fn normalize_numbers(value: &mut Value) {
    match value {
        Value::Number(n) if !n.is_i64() && !n.is_u64() => {
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
                    *value = Value::from(f as i64);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_numbers),
        Value::Object(map) => map.values_mut().for_each(normalize_numbers),
        _ => {}
    }
}

/// A single line is returned as is; several get the results header.
pub fn compose_reply(mut lines: Vec<String>) -> String {
    if lines.len() == 1 {
        lines.remove(0)
    } else {
        format!("{RESULTS_HEADER}\n{}", lines.join("\n"))
    }
}

/// Routes user messages to plain chat or to the auxiliary services.
pub struct AgentRouter<A: QbraidApi> {
    api: A,
    config: DispatcherConfig,
}

impl<A: QbraidApi> AgentRouter<A> {
    pub fn new(api: A) -> Self {
        Self::with_config(api, DispatcherConfig::default())
    }

    pub fn with_config(api: A, config: DispatcherConfig) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Produces the reply text for one user message.
    ///
    /// Any failed chat or fetch call fails the whole request; there are no
    /// partial answers.
    pub async fn process_user_request(
        &self,
        context: SessionContext,
        model: &ChatModel,
        user_request: &str,
    ) -> Result<String> {
        let timer = OperationTimer::new("process_user_request");
        let result = self.dispatch(context, model, user_request).await;
        timer.finish_with_result(&result);
        result
    }

    async fn dispatch(
        &self,
        context: SessionContext,
        model: &ChatModel,
        user_request: &str,
    ) -> Result<String> {
        if !context.agent_behavior_enabled {
            debug!("Agent behavior disabled, plain chat");
            return self.plain_chat(model, user_request).await;
        }

        let selected = self.classify(model, user_request).await?;
        if selected.is_empty() {
            info!("No service matched, plain chat");
            return self.plain_chat(model, user_request).await;
        }

        info!(services = ?selected, "Fetching service details");
        let lines = self.fetch_details(&selected).await?;
        Ok(compose_reply(lines))
    }

    async fn plain_chat(&self, model: &ChatModel, message: &str) -> Result<String> {
        let response = self
            .bounded("chat", self.api.send_chat(model, message))
            .await?;
        Ok(response.content)
    }

    /// Asks the chat model about every service. All calls settle before the
    /// first error, if any, is returned.
    async fn classify(&self, model: &ChatModel, user_request: &str) -> Result<Vec<Service>> {
        let verdicts: Vec<Result<(Service, bool)>> = stream::iter(Service::ALL)
            .map(|service| async move {
                let prompt = create_prompt_question(service, user_request);
                let reply = self
                    .bounded("classification", self.api.send_chat(model, &prompt))
                    .await?;
                let relevant = is_affirmative(&reply.content);
                debug!(%service, relevant, reply = %reply.content, "Classified");
                Ok::<_, QbraidChatError>((service, relevant))
            })
            .buffered(self.fan_out_width())
            .collect()
            .await;

        let verdicts = verdicts.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(verdicts
            .into_iter()
            .filter_map(|(service, relevant)| relevant.then_some(service))
            .collect())
    }

    /// Lines come back in `selected` order regardless of completion order.
    async fn fetch_details(&self, selected: &[Service]) -> Result<Vec<String>> {
        let lines: Vec<Result<String>> = stream::iter(selected.iter().copied())
            .map(|service| async move {
                let serialized = self.bounded(service.name(), self.fetch_serialized(service)).await?;
                Ok::<_, QbraidChatError>(render_service_details(service, &serialized))
            })
            .buffered(self.fan_out_width())
            .collect()
            .await;

        lines.into_iter().collect()
    }

    /// Compact text of the body as the service sent it.
    async fn fetch_serialized(&self, service: Service) -> Result<String> {
        let mut body = self.api.get_service_json(service.request_details()).await?;
        normalize_numbers(&mut body);
        Ok(serde_json::to_string(&body)?)
    }

    fn fan_out_width(&self) -> usize {
        self.config.max_concurrency.max(1)
    }

    async fn bounded<T>(&self, operation: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
        match self.config.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| QbraidChatError::Timeout {
                    operation: operation.to_string(),
                    after_ms: limit.as_millis() as u64,
                })?,
            None => call.await,
        }
    }
}
