//! OpenAI-compatible gateway client with schema-constrained output.

use crate::error::GeneratorError;
use crate::provider::{ContentGenerator, ProviderConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const SCHEMA_NAME: &str = "cluster_article";

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<GatewayMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: Value,
}

#[derive(Serialize)]
struct GatewayMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Gateway client
pub struct GatewayClient {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GatewayClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, GeneratorError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GeneratorError::NotConfigured(format!(
                "No API key: set provider.api_key or the {} environment variable",
                config.api_key_env
            ))
        })?;
        let client = Client::builder()
            .no_proxy()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GeneratorError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            model: config.model.clone(),
            api_key,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ContentGenerator for GatewayClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: &Value,
    ) -> Result<Value, GeneratorError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                GatewayMessage {
                    role: "system",
                    content: system_prompt,
                },
                GatewayMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: response_format(schema),
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "sending generation request");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status.as_u16(), &error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeneratorError::Transport(format!("Failed to read response: {}", e)))?;
        parse_completion(&body)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn response_format(schema: &Value) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "strict": true,
            "schema": schema,
        }
    })
}

fn map_http_error(error: reqwest::Error) -> GeneratorError {
    if error.is_timeout() {
        GeneratorError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        GeneratorError::Transport(format!("Connection error: {}", error))
    } else {
        GeneratorError::Transport(format!("HTTP error: {}", error))
    }
}

/// 429 is a rate limit and 402 means the gateway's credits ran out.
pub(crate) fn classify_status(status: u16, body: &str) -> GeneratorError {
    match status {
        429 => GeneratorError::RateLimited(format!("Rate limit exceeded: {}", body)),
        402 => GeneratorError::QuotaExhausted(format!("Quota exhausted: {}", body)),
        _ => GeneratorError::Transport(format!("Request failed with status {}: {}", status, body)),
    }
}

/// Pull the JSON object out of the first choice's message content.
pub(crate) fn parse_completion(body: &str) -> Result<Value, GeneratorError> {
    let completion: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GeneratorError::MalformedOutput(format!("Failed to parse response: {}", e)))?;
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GeneratorError::MalformedOutput("No content in response".to_string()))?;
    let value: Value = serde_json::from_str(strip_code_fence(&content)).map_err(|e| {
        GeneratorError::MalformedOutput(format!("Message content is not JSON: {}", e))
    })?;
    if !value.is_object() {
        return Err(GeneratorError::MalformedOutput(
            "Message content is not a JSON object".to_string(),
        ));
    }
    Ok(value)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
