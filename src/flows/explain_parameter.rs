//! Explain what a template parameter means for the generated contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{call_model, check_input, decode_output, non_blank, require_text, single_string_schema, FlowError};
use crate::llm::{GenerationRequest, TextGenerator};

pub const FLOW: &str = "explainParameter";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExplainParameterInput {
    #[validate(custom = "non_blank")]
    pub parameter_name: String,
    #[validate(custom = "non_blank")]
    pub parameter_label: String,
    #[validate(custom = "non_blank")]
    pub contract_type_name: String,
    #[serde(default)]
    pub parameter_context_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainParameterOutput {
    pub explanation: String,
}

#[derive(Deserialize)]
struct RawOutput {
    #[serde(default)]
    explanation: Option<String>,
}

pub fn render_prompt(input: &ExplainParameterInput) -> String {
    let mut prompt = format!(
        "You are helping a non-expert configure a {} smart contract.\n\
Explain the parameter \"{}\" (key `{}`) in two or three short sentences: what it controls, \
a sensible value, and any security or economic consequence of getting it wrong.\n",
        input.contract_type_name.trim(),
        input.parameter_label.trim(),
        input.parameter_name.trim()
    );
    if let Some(extra) = input
        .parameter_context_description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        prompt.push_str(&format!("\nAdditional context: {}\n", extra.trim()));
    }
    prompt.push_str("\nReturn plain text in the `explanation` field.");
    prompt
}

pub fn output_schema() -> Value {
    single_string_schema("explanation", "Short plain-language explanation")
}

pub async fn explain_parameter(
    llm: &dyn TextGenerator,
    input: ExplainParameterInput,
) -> Result<ExplainParameterOutput, FlowError> {
    check_input(&input)?;
    let request = GenerationRequest::new(render_prompt(&input), output_schema());
    let raw: RawOutput = decode_output(FLOW, call_model(llm, FLOW, request).await?)?;
    Ok(ExplainParameterOutput {
        explanation: require_text(FLOW, "explanation", raw.explanation)?,
    })
}
