//! Add NatSpec documentation to a contract without changing its behavior.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{call_model, check_input, decode_output, non_blank, require_text, single_string_schema, FlowError};
use crate::llm::{GenerationRequest, TextGenerator};

pub const FLOW: &str = "generateDocumentation";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationInput {
    #[validate(custom = "non_blank")]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationOutput {
    pub documented_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutput {
    #[serde(default)]
    documented_code: Option<String>,
}

pub fn render_prompt(input: &DocumentationInput) -> String {
    format!(
        "Add complete NatSpec documentation to the Solidity contract below: @title, @author \
and @notice on the contract; @notice, @dev, @param and @return on every public and external \
function, event and custom error. Do not change any logic, names or formatting beyond adding \
comments.\n\
\n\
Contract:\n{}\n\
\n\
Return the full documented source in the `documentedCode` field, without markdown fences.",
        input.code
    )
}

pub fn output_schema() -> Value {
    single_string_schema("documentedCode", "Source with NatSpec comments added")
}

pub async fn generate_documentation(
    llm: &dyn TextGenerator,
    input: DocumentationInput,
) -> Result<DocumentationOutput, FlowError> {
    check_input(&input)?;
    let request = GenerationRequest::new(render_prompt(&input), output_schema());
    let raw: RawOutput = decode_output(FLOW, call_model(llm, FLOW, request).await?)?;
    Ok(DocumentationOutput {
        documented_code: require_text(FLOW, "documentedCode", raw.documented_code)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedGenerator;
    use serde_json::json;

    #[tokio::test]
    async fn returns_documented_code() {
        let llm = ScriptedGenerator::replying(json!({ "documentedCode": "/// @title A\ncontract A {}" }));
        let out = generate_documentation(&llm, DocumentationInput { code: "contract A {}".into() })
            .await
            .unwrap();
        assert!(out.documented_code.starts_with("/// @title"));
        assert!(llm.last_prompt().contains("NatSpec"));
    }

    #[tokio::test]
    async fn absent_documented_code_raises() {
        let llm = ScriptedGenerator::replying(json!({ "code": "contract A {}" }));
        assert!(matches!(
            generate_documentation(&llm, DocumentationInput { code: "contract A {}".into() }).await,
            Err(FlowError::MissingOutput { field: "documentedCode", .. })
        ));
    }
}
