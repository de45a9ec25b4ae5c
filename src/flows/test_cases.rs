//! Generate a Hardhat test suite for a contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

use super::{call_model, check_input, decode_output, non_blank, single_string_schema, FlowError};
use crate::llm::{GenerationRequest, TextGenerator};
use crate::utils::strip_code_fences;

pub const FLOW: &str = "generateTestCases";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestCasesInput {
    #[validate(custom = "non_blank")]
    pub code: String,
    #[serde(default)]
    pub contract_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCasesOutput {
    pub test_cases_code: String,
}

pub fn render_prompt(input: &TestCasesInput) -> String {
    let subject = match input.contract_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => format!("the `{}` contract", name),
        _ => "the contract".to_string(),
    };
    format!(
        "Write a Hardhat test file in JavaScript (ethers v6, chai, @nomicfoundation/hardhat-network-helpers \
loadFixture) for {} below. Cover deployment, every public function's happy path, access \
control, reverts with the expected custom errors, emitted events and edge values.\n\
\n\
Contract:\n{}\n\
\n\
Return only the test file source in the `testCasesCode` field.",
        subject, input.code
    )
}

pub fn output_schema() -> Value {
    single_string_schema("testCasesCode", "Hardhat test file source")
}

pub async fn generate_test_cases(
    llm: &dyn TextGenerator,
    input: TestCasesInput,
) -> Result<TestCasesOutput, FlowError> {
    check_input(&input)?;
    let request = GenerationRequest::new(render_prompt(&input), output_schema());
    let output: TestCasesOutput = decode_output(FLOW, call_model(llm, FLOW, request).await?)?;
    let cleaned = strip_code_fences(&output.test_cases_code);
    if cleaned.len() != output.test_cases_code.len() {
        debug!("Stripped code fences from generated tests");
    }
    Ok(TestCasesOutput {
        test_cases_code: cleaned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedGenerator;
    use serde_json::json;

    fn input(name: Option<&str>) -> TestCasesInput {
        TestCasesInput {
            code: "contract Vault {}".into(),
            contract_name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn fences_are_stripped() {
        let llm = ScriptedGenerator::replying(json!({
            "testCasesCode": "```javascript\nconst { expect } = require(\"chai\");\n```"
        }));
        let out = generate_test_cases(&llm, input(Some("Vault"))).await.unwrap();
        assert_eq!(out.test_cases_code, "const { expect } = require(\"chai\");");
        assert!(llm.last_prompt().contains("`Vault` contract"));
    }

    #[tokio::test]
    async fn unfenced_output_passes_through() {
        let llm = ScriptedGenerator::replying(json!({ "testCasesCode": "describe(\"Vault\", () => {});" }));
        let out = generate_test_cases(&llm, input(None)).await.unwrap();
        assert_eq!(out.test_cases_code, "describe(\"Vault\", () => {});");
        assert!(llm.last_prompt().contains("for the contract below"));
    }

    #[tokio::test]
    async fn missing_field_raises() {
        let llm = ScriptedGenerator::replying(json!({}));
        assert!(matches!(
            generate_test_cases(&llm, input(None)).await,
            Err(FlowError::InvalidOutput { .. })
        ));
    }
}
