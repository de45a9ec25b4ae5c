//! Google Gemini `generateContent` client.
//!
//! Without tools the request asks for `application/json` output constrained by
//! a response schema. With tools the API does not accept a response schema, so
//! the schema is appended to the prompt instead and the client runs the
//! function-call loop itself.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::{GenerationRequest, LlmError, TextGenerator, Tool};
use crate::config::Config;
use crate::utils::strip_code_fences;

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    max_tool_rounds: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

/// What the model did on one turn.
#[derive(Debug, PartialEq)]
enum ModelTurn {
    Answer(String),
    ToolCalls(Vec<FunctionCall>),
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            temperature: config.llm_temperature,
            max_tool_rounds: config.llm_max_tool_rounds,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(&self, contents: &[Value], request: &GenerationRequest) -> Value {
        let mut generation_config = serde_json::Map::new();
        if let Some(t) = self.temperature {
            generation_config.insert("temperature".into(), json!(t));
        }

        let mut body = json!({ "contents": contents });
        if request.tools.is_empty() {
            generation_config.insert("responseMimeType".into(), json!("application/json"));
            generation_config.insert("responseSchema".into(), request.output_schema.clone());
        } else {
            let declarations: Vec<Value> = request
                .tools
                .iter()
                .map(|tool| {
                    json!({
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.parameters(),
                    })
                })
                .collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }
        body["generationConfig"] = Value::Object(generation_config);
        body
    }

    async fn send(&self, body: &Value) -> Result<GeminiResponse, LlmError> {
        debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = %status, "Gemini API response status");

        if !status.is_success() {
            error!("Gemini API error: {} - {}", status, text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &parsed.usage_metadata {
            info!(
                prompt_tokens = ?usage.prompt_token_count,
                response_tokens = ?usage.candidates_token_count,
                "Gemini API usage"
            );
        }
        Ok(parsed)
    }

    fn run_tool(tools: &[Arc<dyn Tool>], call: &FunctionCall) -> Result<Value, LlmError> {
        let tool = tools
            .iter()
            .find(|t| t.name() == call.name)
            .ok_or_else(|| LlmError::Tool {
                name: call.name.clone(),
                reason: "model called an undeclared tool".into(),
            })?;
        info!(tool = %call.name, "Model invoked tool");
        tool.call(call.args.clone())
    }
}

fn interpret(response: GeminiResponse) -> Result<ModelTurn, LlmError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("no candidates in response".into()))?;

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    if parts.is_empty() {
        return Err(LlmError::InvalidResponse(format!(
            "candidate had no content (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    let calls: Vec<FunctionCall> = parts.iter().filter_map(|p| p.function_call.clone()).collect();
    if !calls.is_empty() {
        return Ok(ModelTurn::ToolCalls(calls));
    }

    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    Ok(ModelTurn::Answer(text))
}

fn parse_answer(text: &str) -> Result<Value, LlmError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(LlmError::InvalidResponse("model returned empty text".into()));
    }
    Ok(serde_json::from_str(&cleaned)?)
}

fn prompt_with_schema(request: &GenerationRequest) -> String {
    if request.tools.is_empty() {
        return request.prompt.clone();
    }
    format!(
        "{}\n\nRespond with a single JSON object only, no markdown, matching this JSON schema:\n{}",
        request.prompt, request.output_schema
    )
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, LlmError> {
        let mut contents = vec![json!({
            "role": "user",
            "parts": [{ "text": prompt_with_schema(&request) }]
        })];

        for round in 0..=self.max_tool_rounds {
            let body = self.request_body(&contents, &request);
            let turn = interpret(self.send(&body).await?)?;

            match turn {
                ModelTurn::Answer(text) => {
                    debug!(chars = text.len(), round, "Model answered");
                    return parse_answer(&text);
                }
                ModelTurn::ToolCalls(calls) => {
                    if round == self.max_tool_rounds {
                        break;
                    }
                    let call_parts: Vec<Value> = calls
                        .iter()
                        .map(|c| json!({ "functionCall": { "name": c.name, "args": c.args } }))
                        .collect();
                    contents.push(json!({ "role": "model", "parts": call_parts }));

                    let mut response_parts = Vec::with_capacity(calls.len());
                    for call in &calls {
                        let result = Self::run_tool(&request.tools, call)?;
                        response_parts.push(json!({
                            "functionResponse": {
                                "name": call.name,
                                "response": { "name": call.name, "content": result }
                            }
                        }));
                    }
                    contents.push(json!({ "role": "user", "parts": response_parts }));
                }
            }
        }

        warn!(rounds = self.max_tool_rounds, "Tool loop did not converge");
        Err(LlmError::ToolRoundsExhausted(self.max_tool_rounds))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
