//! Security review: prioritized suggestions plus a 0-100 score.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;
use validator::Validate;

use super::{call_model, check_input, decode_output, non_blank, FlowError};
use crate::llm::{GenerationRequest, TextGenerator};

pub const FLOW: &str = "suggestErrorPrevention";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPreventionInput {
    #[validate(custom = "non_blank")]
    pub contract_type: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[validate(custom = "non_blank")]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPreventionOutput {
    pub suggestions: Vec<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub security_score: f64,
}

pub fn render_prompt(input: &ErrorPreventionInput) -> String {
    let parameters = if input.parameters.is_empty() {
        "(none)".to_string()
    } else {
        serde_json::to_string_pretty(&input.parameters).unwrap_or_else(|_| "(unprintable)".into())
    };
    format!(
        "You are a smart-contract security auditor. Review the {} contract below, generated \
with these parameters:\n{}\n\
\n\
List concrete suggestions that prevent bugs, exploits or misconfiguration (reentrancy, \
access control, integer and rounding issues, unchecked external calls, front-running, \
denial of service, parameter values that are dangerous for this contract type). Most \
important first, one sentence each. Then rate the overall security from 0 (unsafe) to \
100 (no issues found).\n\
\n\
Contract:\n{}",
        input.contract_type.trim(),
        parameters,
        input.code
    )
}

pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "suggestions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Prioritized suggestions"
            },
            "securityScore": {
                "type": "number",
                "description": "Security score from 0 to 100"
            }
        },
        "required": ["suggestions", "securityScore"]
    })
}

pub async fn suggest_error_prevention(
    llm: &dyn TextGenerator,
    input: ErrorPreventionInput,
) -> Result<ErrorPreventionOutput, FlowError> {
    check_input(&input)?;
    let request = GenerationRequest::new(render_prompt(&input), output_schema());
    let output: ErrorPreventionOutput = decode_output(FLOW, call_model(llm, FLOW, request).await?)?;
    output.validate().map_err(|e| FlowError::InvalidOutput {
        flow: FLOW,
        reason: e.to_string(),
    })?;
    info!(
        suggestions = output.suggestions.len(),
        score = output.security_score,
        "Security review complete"
    );
    Ok(output)
}
