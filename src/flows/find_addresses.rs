//! Answer address questions using only the built-in address table.
//!
//! The model gets the lookup as a tool and is told never to invent addresses.
//! A missing `results` array or summary is normalized instead of failing:
//! "nothing found" is a valid answer here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use validator::Validate;

use super::{call_model, check_input, decode_output, non_blank, FlowError};
use crate::addresses::{self, AddressFilter, ContractType, KnownContractAddress};
use crate::llm::{GenerationRequest, LlmError, TextGenerator, Tool};

pub const FLOW: &str = "findKnownAddresses";
pub const TOOL_NAME: &str = "fetchContractAddresses";
pub const NO_SUMMARY: &str = "No summary was provided.";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FindAddressesInput {
    #[validate(custom = "non_blank")]
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindAddressesOutput {
    pub results: Vec<KnownContractAddress>,
    pub summary: String,
}

#[derive(Deserialize, Default)]
struct RawOutput {
    #[serde(default)]
    results: Option<Vec<KnownContractAddress>>,
    #[serde(default)]
    summary: Option<String>,
}

/// Exposes the static address table to the model.
pub struct AddressLookupTool;

impl Tool for AddressLookupTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Look up verified DeFi contract addresses (routers, factories, wrapped native tokens) \
by network, protocol and contract type. All filters are optional; network and protocol \
match case-insensitively on substrings."
    }

    fn parameters(&self) -> Value {
        let types: Vec<&str> = ContractType::ALL.iter().map(|t| t.as_str()).collect();
        json!({
            "type": "object",
            "properties": {
                "mainnetName": { "type": "string", "description": "Network, e.g. Ethereum" },
                "systemName": { "type": "string", "description": "Protocol, e.g. Uniswap V2" },
                "contractType": { "type": "string", "enum": types }
            }
        })
    }

    fn call(&self, args: Value) -> Result<Value, LlmError> {
        let criteria: AddressFilter = if args.is_null() {
            AddressFilter::default()
        } else {
            serde_json::from_value(args).map_err(|e| LlmError::Tool {
                name: TOOL_NAME.to_string(),
                reason: e.to_string(),
            })?
        };
        let hits = addresses::lookup(&criteria);
        info!(?criteria, matches = hits.len(), "Address lookup tool");
        Ok(serde_json::to_value(hits)?)
    }
}

pub fn render_prompt(input: &FindAddressesInput) -> String {
    format!(
        "You help developers find official DeFi contract addresses.\n\
Use the `{}` tool to look up addresses. Never invent, guess or complete an address from \
memory: every address you return must come from the tool's output, copied exactly. If the \
tool returns nothing relevant, return an empty `results` array and say so in `summary`.\n\
\n\
User query: {}\n\
\n\
Return the matching records in `results` and a one or two sentence `summary`.",
        TOOL_NAME,
        input.query.trim()
    )
}

pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "results": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "mainnetName": { "type": "string" },
                        "systemName": { "type": "string" },
                        "contractName": { "type": "string" },
                        "address": { "type": "string" },
                        "type": { "type": "string", "enum": ["Router", "Factory", "WrappedNativeToken", "Other"] },
                        "explorerUrl": { "type": "string" },
                        "notes": { "type": "string" }
                    },
                    "required": ["mainnetName", "systemName", "contractName", "address", "type"]
                }
            },
            "summary": { "type": "string" }
        },
        "required": ["results", "summary"]
    })
}

pub async fn find_known_addresses(
    llm: &dyn TextGenerator,
    input: FindAddressesInput,
) -> Result<FindAddressesOutput, FlowError> {
    check_input(&input)?;
    let request = GenerationRequest::new(render_prompt(&input), output_schema())
        .with_tool(Arc::new(AddressLookupTool));

    let value = call_model(llm, FLOW, request).await?;
    let raw: RawOutput = if value.is_null() {
        RawOutput::default()
    } else {
        decode_output(FLOW, value)?
    };

    let results = raw.results.unwrap_or_else(|| {
        warn!("Model output had no results array; treating as empty");
        Vec::new()
    });
    let summary = match raw.summary {
        Some(s) if !s.trim().is_empty() => s,
        _ => NO_SUMMARY.to_string(),
    };
    info!(results = results.len(), "Address query answered");
    Ok(FindAddressesOutput { results, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedGenerator;

    fn query(q: &str) -> FindAddressesInput {
        FindAddressesInput { query: q.into() }
    }

    #[tokio::test]
    async fn undefined_results_normalize_to_empty() {
        let llm = ScriptedGenerator::replying(json!({ "summary": "Nothing known." }));
        let out = find_known_addresses(&llm, query("curve on fantom")).await.unwrap();
        assert!(out.results.is_empty());
        assert_eq!(out.summary, "Nothing known.");
    }

    #[tokio::test]
    async fn null_results_and_missing_summary_normalize() {
        let llm = ScriptedGenerator::replying(json!({ "results": null }));
        let out = find_known_addresses(&llm, query("anything")).await.unwrap();
        assert!(out.results.is_empty());
        assert_eq!(out.summary, NO_SUMMARY);

        let llm = ScriptedGenerator::replying(Value::Null);
        let out = find_known_addresses(&llm, query("anything")).await.unwrap();
        assert!(out.results.is_empty());
    }

    #[tokio::test]
    async fn tool_is_offered_and_results_pass_through() {
        let record = addresses::KNOWN_ADDRESSES[0].clone();
        let llm = ScriptedGenerator::replying(json!({
            "results": [record],
            "summary": "Uniswap V2 router on Ethereum."
        }));
        let out = find_known_addresses(&llm, query("uniswap v2 router")).await.unwrap();
        assert_eq!(out.results, vec![addresses::KNOWN_ADDRESSES[0].clone()]);

        let request = llm.last_request();
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.tools[0].name(), TOOL_NAME);
        assert!(request.prompt.contains("Never invent"));
    }

    #[tokio::test]
    async fn malformed_records_are_rejected() {
        let llm = ScriptedGenerator::replying(json!({
            "results": [{ "address": "0x0" }],
            "summary": "x"
        }));
        assert!(matches!(
            find_known_addresses(&llm, query("x")).await,
            Err(FlowError::InvalidOutput { .. })
        ));
    }

    #[test]
    fn tool_filters_the_table() {
        let out = AddressLookupTool
            .call(json!({ "systemName": "Uniswap V2" }))
            .unwrap();
        let rows = out.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["type"], "Router");
        assert_eq!(rows[1]["type"], "Factory");

        let all = AddressLookupTool.call(Value::Null).unwrap();
        assert_eq!(all.as_array().unwrap().len(), addresses::KNOWN_ADDRESSES.len());
    }

    #[test]
    fn tool_rejects_malformed_args() {
        assert!(AddressLookupTool.call(json!({ "mainnetName": 7 })).is_err());
    }
}
