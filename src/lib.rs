// src/lib.rs

use std::sync::Arc;

// Re-export modules
pub mod addresses;
pub mod api;
pub mod config;
pub mod flows;
pub mod llm;
pub mod mcp;
pub mod templates;
pub mod utils;

pub use flows::FlowError;
pub use llm::{GenerationRequest, LlmError, TextGenerator, Tool};

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Text-generation backend used by every model-backed flow
    pub llm: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(config: config::Config, llm: Arc<dyn TextGenerator>) -> Self {
        Self { config, llm }
    }
}
