//! Rough deployment and call gas estimate for a contract.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use super::{call_model, check_input, decode_output, non_blank, FlowError};
use crate::llm::{GenerationRequest, TextGenerator};

pub const FLOW: &str = "estimateGas";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EstimateGasInput {
    #[validate(custom = "non_blank")]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateGasOutput {
    pub estimated_gas_range: String,
    pub explanation: String,
}

pub fn render_prompt(input: &EstimateGasInput) -> String {
    format!(
        "You are a Solidity gas optimization expert. Estimate the gas needed to deploy the \
contract below and to call its main functions. Give the deployment estimate as a range \
(for example \"1,200,000 - 1,500,000 gas\") and explain which constructs dominate the cost \
and how it could be reduced. This is an estimate, not a measurement.\n\
\n\
Contract:\n{}",
        input.code
    )
}

pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "estimatedGasRange": { "type": "string", "description": "Deployment gas range" },
            "explanation": { "type": "string", "description": "What drives the estimate" }
        },
        "required": ["estimatedGasRange", "explanation"]
    })
}

pub async fn estimate_gas(
    llm: &dyn TextGenerator,
    input: EstimateGasInput,
) -> Result<EstimateGasOutput, FlowError> {
    check_input(&input)?;
    let request = GenerationRequest::new(render_prompt(&input), output_schema());
    decode_output(FLOW, call_model(llm, FLOW, request).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedGenerator;

    #[tokio::test]
    async fn returns_both_fields() {
        let llm = ScriptedGenerator::replying(json!({
            "estimatedGasRange": "900,000 - 1,100,000 gas",
            "explanation": "Storage writes in the constructor dominate."
        }));
        let out = estimate_gas(&llm, EstimateGasInput { code: "contract A {}".into() })
            .await
            .unwrap();
        assert_eq!(out.estimated_gas_range, "900,000 - 1,100,000 gas");
        assert!(llm.last_prompt().contains("contract A {}"));
    }

    #[tokio::test]
    async fn missing_field_is_a_contract_violation() {
        let llm = ScriptedGenerator::replying(json!({ "estimatedGasRange": "1" }));
        let err = estimate_gas(&llm, EstimateGasInput { code: "contract A {}".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidOutput { flow: FLOW, .. }));
    }

    #[tokio::test]
    async fn empty_code_is_rejected() {
        let llm = ScriptedGenerator::replying(json!({}));
        assert!(estimate_gas(&llm, EstimateGasInput { code: "".into() })
            .await
            .unwrap_err()
            .is_input_error());
    }
}
