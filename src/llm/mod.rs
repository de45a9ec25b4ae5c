//! # Text Generation Module
//!
//! Narrow seam between the flows and the hosted language model. Flows hand a
//! prompt, the JSON schema they expect back, and optionally a set of tools the
//! model may call mid-generation. The client returns untrusted JSON; shaping
//! and validating it is the caller's job.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod gemini;

pub use gemini::GeminiClient;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("request to text-generation service failed: {0}")]
    Http(reqwest::Error),
    #[error("text-generation service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not decode model output as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected response from text-generation service: {0}")]
    InvalidResponse(String),
    #[error("model kept calling tools after {0} rounds")]
    ToolRoundsExhausted(usize),
    #[error("tool '{name}' failed: {reason}")]
    Tool { name: String, reason: String },
}

impl From<reqwest::Error> for LlmError {
    // The request URL never reaches logs or callers.
    fn from(err: reqwest::Error) -> Self {
        LlmError::Http(err.without_url())
    }
}

/// A function the model may invoke while generating.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;
    fn call(&self, args: Value) -> Result<Value, LlmError>;
}

/// One generation call.
#[derive(Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub output_schema: Value,
    pub tools: Vec<Arc<dyn Tool>>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, output_schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            output_schema,
            tools: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("prompt_len", &self.prompt.len())
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name().to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Render `request.prompt` against the model and return JSON shaped (hopefully)
    /// like `request.output_schema`.
    async fn generate(&self, request: GenerationRequest) -> Result<Value, LlmError>;

    fn model_name(&self) -> &str;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Returns canned JSON and remembers every request it saw.
    pub(crate) struct ScriptedGenerator {
        reply: Result<Value, String>,
        pub(crate) seen: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        pub(crate) fn replying(reply: Value) -> Self {
            Self {
                reply: Ok(reply),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(reason: &str) -> Self {
            Self {
                reply: Err(reason.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn last_prompt(&self) -> String {
            self.seen
                .lock()
                .unwrap()
                .last()
                .map(|r| r.prompt.clone())
                .unwrap_or_default()
        }

        pub(crate) fn last_request(&self) -> GenerationRequest {
            self.seen.lock().unwrap().last().cloned().expect("no request recorded")
        }

        pub(crate) fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, request: GenerationRequest) -> Result<Value, LlmError> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok(v) => Ok(v.clone()),
                Err(reason) => Err(LlmError::InvalidResponse(reason.clone())),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }
}
