//! # Flows
//!
//! One module per capability. Each flow validates its input, renders a
//! prompt, makes a single call to the text-generation service and validates
//! the structured output before returning it. No state survives a call.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::llm::{GenerationRequest, LlmError, TextGenerator};
use crate::templates::TemplateError;

pub mod documentation;
pub mod error_prevention;
pub mod estimate_gas;
pub mod explain_parameter;
pub mod find_addresses;
pub mod generate_code;
pub mod refine_code;
pub mod save_lead;
pub mod test_cases;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("{flow}: text-generation call failed: {source}")]
    Upstream {
        flow: &'static str,
        #[source]
        source: LlmError,
    },
    #[error("{flow}: model output did not match the expected shape: {reason}")]
    InvalidOutput { flow: &'static str, reason: String },
    #[error("{flow}: model output is missing '{field}'")]
    MissingOutput {
        flow: &'static str,
        field: &'static str,
    },
}

impl From<ValidationErrors> for FlowError {
    fn from(errors: ValidationErrors) -> Self {
        FlowError::InvalidInput(errors.to_string())
    }
}

impl From<JsonRejection> for FlowError {
    fn from(rejection: JsonRejection) -> Self {
        FlowError::InvalidInput(rejection.body_text())
    }
}

impl From<TemplateError> for FlowError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::UnknownTemplate(id) => FlowError::UnknownTemplate(id),
            other => FlowError::InvalidInput(other.to_string()),
        }
    }
}

impl FlowError {
    pub fn status(&self) -> StatusCode {
        match self {
            FlowError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            FlowError::UnknownTemplate(_) => StatusCode::NOT_FOUND,
            FlowError::Upstream { .. }
            | FlowError::InvalidOutput { .. }
            | FlowError::MissingOutput { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self, FlowError::InvalidInput(_) | FlowError::UnknownTemplate(_))
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Rejects strings that are empty or only whitespace.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Validates `input` before anything else happens.
pub fn check_input<T: Validate>(input: &T) -> Result<(), FlowError> {
    input.validate().map_err(FlowError::from)
}

/// Sends one generation request inside a tracing span and returns the raw JSON.
pub async fn call_model(
    llm: &dyn TextGenerator,
    flow: &'static str,
    request: GenerationRequest,
) -> Result<Value, FlowError> {
    let span = tracing::info_span!("flow", flow = flow, invocation = %Uuid::new_v4());
    async move {
        info!(model = llm.model_name(), "Calling text-generation service");
        debug!(prompt = %request.prompt, "Rendered prompt");
        match llm.generate(request).await {
            Ok(value) => {
                debug!(output = %value, "Model output");
                Ok(value)
            }
            Err(source) => {
                error!("Text-generation call failed: {}", source);
                Err(FlowError::Upstream { flow, source })
            }
        }
    }
    .instrument(span)
    .await
}

/// Deserializes model output into the flow's strict output record.
pub fn decode_output<T: DeserializeOwned>(flow: &'static str, value: Value) -> Result<T, FlowError> {
    if value.is_null() {
        return Err(FlowError::InvalidOutput {
            flow,
            reason: "model returned no output".into(),
        });
    }
    serde_json::from_value(value).map_err(|e| FlowError::InvalidOutput {
        flow,
        reason: e.to_string(),
    })
}

/// Returns the field value, failing when it is absent or blank.
pub fn require_text(
    flow: &'static str,
    field: &'static str,
    value: Option<String>,
) -> Result<String, FlowError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(FlowError::MissingOutput { flow, field }),
    }
}

/// Shared JSON-schema fragment for a single required string field.
pub(crate) fn single_string_schema(field: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            field: { "type": "string", "description": description }
        },
        "required": [field]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedGenerator;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(FlowError::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(FlowError::UnknownTemplate("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            FlowError::MissingOutput { flow: "f", field: "code" }.status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn require_text_rejects_missing_and_blank() {
        assert!(require_text("f", "code", None).is_err());
        assert!(require_text("f", "code", Some("  ".into())).is_err());
        assert_eq!(require_text("f", "code", Some("x".into())).unwrap(), "x");
    }

    #[test]
    fn decode_output_rejects_null() {
        let r: Result<Value, _> = decode_output("f", Value::Null);
        assert!(matches!(r, Err(FlowError::InvalidOutput { .. })));
    }

    #[tokio::test]
    async fn upstream_failure_is_wrapped() {
        let llm = ScriptedGenerator::failing("boom");
        let err = call_model(&llm, "f", GenerationRequest::new("p", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Upstream { flow: "f", .. }));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
