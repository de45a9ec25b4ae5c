//! Apply a requested change to existing contract code.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use super::{call_model, check_input, decode_output, non_blank, require_text, single_string_schema, FlowError};
use crate::llm::{GenerationRequest, TextGenerator};

pub const FLOW: &str = "refineCode";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefineCodeInput {
    #[validate(custom = "non_blank")]
    pub current_code: String,
    #[validate(custom = "non_blank")]
    pub refinement_request: String,
    /// Template name and parameters the code was generated from, if known.
    #[serde(default)]
    pub contract_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineCodeOutput {
    pub refined_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutput {
    #[serde(default)]
    refined_code: Option<String>,
}

pub fn render_prompt(input: &RefineCodeInput) -> String {
    let mut prompt = String::from(
        "You are an expert Solidity developer. Modify the contract below according to the \
refinement request. Keep everything that the request does not ask to change, keep the code \
compiling, and do not weaken existing security checks.\n",
    );
    if let Some(context) = input.contract_context.as_deref().filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("\nContract context:\n{}\n", context.trim()));
    }
    prompt.push_str(&format!(
        "\nCurrent code:\n{}\n\nRefinement request:\n{}\n\n\
Return the complete updated source in the `refinedCode` field, without markdown fences.",
        input.current_code, input.refinement_request.trim()
    ));
    prompt
}

pub fn output_schema() -> Value {
    single_string_schema("refinedCode", "Complete refined Solidity source file")
}

pub async fn refine_code(
    llm: &dyn TextGenerator,
    input: RefineCodeInput,
) -> Result<RefineCodeOutput, FlowError> {
    check_input(&input)?;
    let request = GenerationRequest::new(render_prompt(&input), output_schema());
    let raw: RawOutput = decode_output(FLOW, call_model(llm, FLOW, request).await?)?;
    let refined_code = require_text(FLOW, "refinedCode", raw.refined_code)?;
    info!(chars = refined_code.len(), "Refined contract code");
    Ok(RefineCodeOutput { refined_code })
}
