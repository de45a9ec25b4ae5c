//! Generate a complete Solidity contract from a natural-language description.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use super::{call_model, check_input, decode_output, non_blank, require_text, single_string_schema, FlowError};
use crate::llm::{GenerationRequest, TextGenerator};

pub const FLOW: &str = "generateCode";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeInput {
    /// What the contract should do, including any parameter values.
    #[validate(custom = "non_blank")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeOutput {
    pub code: String,
}

#[derive(Deserialize)]
struct RawOutput {
    #[serde(default)]
    code: Option<String>,
}

pub fn render_prompt(input: &GenerateCodeInput) -> String {
    format!(
        "You are an expert Solidity developer. Write a complete, secure, production-ready \
smart contract for the request below.\n\
\n\
Requirements:\n\
- Start with an SPDX license identifier and `pragma solidity ^0.8.20;`.\n\
- Prefer audited OpenZeppelin Contracts imports over hand-written primitives.\n\
- Use custom errors, emit events for state changes, and follow checks-effects-interactions.\n\
- Add concise comments for non-obvious logic.\n\
- Never invent deployed contract addresses; take them as constructor arguments instead.\n\
\n\
Request:\n{}\n\
\n\
Return the full source file in the `code` field, without markdown fences.",
        input.description.trim()
    )
}

pub fn output_schema() -> Value {
    single_string_schema("code", "Complete Solidity source file")
}

pub async fn generate_code(
    llm: &dyn TextGenerator,
    input: GenerateCodeInput,
) -> Result<GenerateCodeOutput, FlowError> {
    check_input(&input)?;
    let request = GenerationRequest::new(render_prompt(&input), output_schema());
    let raw: RawOutput = decode_output(FLOW, call_model(llm, FLOW, request).await?)?;
    let code = require_text(FLOW, "code", raw.code)?;
    info!(chars = code.len(), "Generated contract code");
    Ok(GenerateCodeOutput { code })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedGenerator;
    use serde_json::json;

    fn input(description: &str) -> GenerateCodeInput {
        GenerateCodeInput {
            description: description.into(),
        }
    }

    #[tokio::test]
    async fn returns_generated_code() {
        let llm = ScriptedGenerator::replying(json!({ "code": "contract A {}" }));
        let out = generate_code(&llm, input("An ERC20 named Forge")).await.unwrap();
        assert_eq!(out.code, "contract A {}");
        assert!(llm.last_prompt().contains("An ERC20 named Forge"));
        assert_eq!(llm.last_request().output_schema["required"], json!(["code"]));
    }

    #[tokio::test]
    async fn blank_description_is_rejected_before_calling_model() {
        let llm = ScriptedGenerator::replying(json!({ "code": "x" }));
        let err = generate_code(&llm, input("   ")).await.unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn missing_or_empty_code_is_an_error() {
        for reply in [json!({}), json!({ "code": "" }), json!({ "code": null })] {
            let llm = ScriptedGenerator::replying(reply);
            let err = generate_code(&llm, input("token")).await.unwrap_err();
            assert!(matches!(err, FlowError::MissingOutput { field: "code", .. }));
        }
    }

    #[tokio::test]
    async fn null_output_is_an_error() {
        let llm = ScriptedGenerator::replying(Value::Null);
        assert!(matches!(
            generate_code(&llm, input("token")).await,
            Err(FlowError::InvalidOutput { .. })
        ));
    }
}
