//! # MCP Handler Module
//!
//! This module implements the Model Context Protocol (MCP) for the Solidity
//! forge server. It handles incoming MCP requests and dispatches them to flows.
//!
//! ## Supported Tools
//!
//! ### Code Generation
//! - `generate_code` - Generate a contract from a description
//! - `refine_code` - Apply a requested change to existing code
//! - `generate_documentation` - Add NatSpec comments
//! - `generate_test_cases` - Produce a Hardhat test suite
//!
//! ### Analysis
//! - `explain_parameter` - Explain a template parameter
//! - `estimate_gas` - Rough gas estimate
//! - `suggest_error_prevention` - Security suggestions and score
//!
//! ### Addresses and Templates
//! - `find_known_addresses` - Model-assisted address search over the static table
//! - `fetch_contract_addresses` - Direct filter over the static table
//! - `list_templates` - Contract templates and their parameters
//!
//! ### Leads
//! - `save_lead` - Validate and acknowledge a lead

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::{
    addresses::{self, AddressFilter, KnownContractAddress},
    flows::{
        documentation::{generate_documentation, DocumentationInput},
        error_prevention::{suggest_error_prevention, ErrorPreventionInput},
        estimate_gas::{estimate_gas, EstimateGasInput},
        explain_parameter::{explain_parameter, ExplainParameterInput},
        find_addresses::{find_known_addresses, FindAddressesInput},
        generate_code::{generate_code, GenerateCodeInput},
        refine_code::{refine_code, RefineCodeInput},
        save_lead::{save_lead, SaveLeadInput},
        test_cases::{generate_test_cases, TestCasesInput},
        FlowError,
    },
    mcp::protocol::{error_codes, Request, Response},
    templates, utils, AppState,
};

pub const TOOL_NAMES: [&str; 11] = [
    "generate_code",
    "refine_code",
    "explain_parameter",
    "estimate_gas",
    "suggest_error_prevention",
    "generate_documentation",
    "generate_test_cases",
    "find_known_addresses",
    "fetch_contract_addresses",
    "list_templates",
    "save_lead",
];

// Helper: produce a result Value that always contains a text content array
// and preserves structured data for JSON-friendly clients.
fn make_texty_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            // Do not overwrite if caller already set content
            if !map.contains_key("content") {
                map.insert("content".into(), content);
            }
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content
        }),
    }
}

// One line per record, with the explorer link when one is known.
fn render_addresses(records: &[KnownContractAddress]) -> String {
    records
        .iter()
        .map(|r| {
            let link = r
                .explorer_link()
                .map(|url| format!(" ({})", url))
                .unwrap_or_default();
            format!(
                "\n- {} {} {} [{}]: {}{}",
                r.mainnet_name,
                r.system_name,
                r.contract_name,
                r.contract_type.as_str(),
                r.address,
                link
            )
        })
        .collect()
}

fn to_payload<T: Serialize>(value: &T, req_id: &Value) -> Result<Value, Response> {
    serde_json::to_value(value).map_err(|e| {
        Response::error(req_id.clone(), error_codes::INTERNAL_ERROR, e.to_string())
    })
}

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Convenience aliases to support direct method calls from CLI.
        // They are rewritten into tools/call internally to reuse the same logic.
        method if TOOL_NAMES.contains(&method) => {
            let name = req.method.clone();
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the correct flow.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);
    let req_id = &req.id;

    match run_tool(tool_name, args, req_id, &state).await {
        Ok(result) => Response::success(req_id.clone(), result),
        Err(err_resp) => {
            if let Some(err) = &err_resp.error {
                error!(tool = tool_name, code = err.code, "Tool call failed: {}", err.message);
            }
            err_resp
        }
    }
}

async fn run_tool(
    tool_name: &str,
    args: &Value,
    req_id: &Value,
    state: &AppState,
) -> Result<Value, Response> {
    let llm = state.llm.as_ref();
    let flow_err = |e: FlowError| Response::from_flow_error(req_id.clone(), &e);

    match tool_name {
        "generate_code" => {
            let input: GenerateCodeInput = utils::parse_args(args, req_id)?;
            let out = generate_code(llm, input).await.map_err(flow_err)?;
            Ok(make_texty_result(out.code.clone(), to_payload(&out, req_id)?))
        }
        "refine_code" => {
            let input: RefineCodeInput = utils::parse_args(args, req_id)?;
            let out = refine_code(llm, input).await.map_err(flow_err)?;
            Ok(make_texty_result(out.refined_code.clone(), to_payload(&out, req_id)?))
        }
        "explain_parameter" => {
            let input: ExplainParameterInput = utils::parse_args(args, req_id)?;
            let out = explain_parameter(llm, input).await.map_err(flow_err)?;
            Ok(make_texty_result(out.explanation.clone(), to_payload(&out, req_id)?))
        }
        "estimate_gas" => {
            let input: EstimateGasInput = utils::parse_args(args, req_id)?;
            let out = estimate_gas(llm, input).await.map_err(flow_err)?;
            let text = format!("Estimated gas: {}\n\n{}", out.estimated_gas_range, out.explanation);
            Ok(make_texty_result(text, to_payload(&out, req_id)?))
        }
        "suggest_error_prevention" => {
            let input: ErrorPreventionInput = utils::parse_args(args, req_id)?;
            let out = suggest_error_prevention(llm, input).await.map_err(flow_err)?;
            let mut text = format!("Security score: {}/100\n", out.security_score);
            for suggestion in &out.suggestions {
                text.push_str(&format!("- {}\n", suggestion));
            }
            Ok(make_texty_result(text, to_payload(&out, req_id)?))
        }
        "generate_documentation" => {
            let input: DocumentationInput = utils::parse_args(args, req_id)?;
            let out = generate_documentation(llm, input).await.map_err(flow_err)?;
            Ok(make_texty_result(out.documented_code.clone(), to_payload(&out, req_id)?))
        }
        "generate_test_cases" => {
            let input: TestCasesInput = utils::parse_args(args, req_id)?;
            let out = generate_test_cases(llm, input).await.map_err(flow_err)?;
            Ok(make_texty_result(out.test_cases_code.clone(), to_payload(&out, req_id)?))
        }
        "find_known_addresses" => {
            let input: FindAddressesInput = utils::parse_args(args, req_id)?;
            let out = find_known_addresses(llm, input).await.map_err(flow_err)?;
            let text = format!("{}{}", out.summary, render_addresses(&out.results));
            Ok(make_texty_result(text, to_payload(&out, req_id)?))
        }
        "fetch_contract_addresses" => {
            let criteria = AddressFilter {
                mainnet_name: utils::get_optional_str(args, "mainnetName"),
                system_name: utils::get_optional_str(args, "systemName"),
                contract_type: utils::get_optional_str(args, "contractType"),
            };
            let results = addresses::lookup(&criteria);
            let text = format!(
                "Found {} known contract address(es){}",
                results.len(),
                render_addresses(&results)
            );
            Ok(make_texty_result(text, json!({ "results": results })))
        }
        "list_templates" => match utils::get_optional_str(args, "id") {
            Some(id) => {
                let template = templates::find(&id).map_err(|e| flow_err(e.into()))?;
                let text = format!("{}: {}", template.name, template.description);
                Ok(make_texty_result(text, json!({ "template": template })))
            }
            None => {
                let all = templates::all();
                let text = all
                    .iter()
                    .map(|t| format!("{} - {}", t.id, t.name))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(make_texty_result(text, json!({ "templates": all })))
            }
        },
        "save_lead" => {
            let input: SaveLeadInput = utils::parse_args(args, req_id)?;
            let out = save_lead(input).map_err(flow_err)?;
            Ok(make_texty_result(out.message.clone(), to_payload(&out, req_id)?))
        }
        _ => Err(Response::error(
            req_id.clone(),
            error_codes::METHOD_NOT_FOUND,
            format!("Tool not found: {}", tool_name),
        )),
    }
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "solidity_forge",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions = "Solidity smart-contract assistant: generate, refine, document, test and review \
contracts, and look up verified DeFi contract addresses.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

fn code_only_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "code": { "type": "string", "description": description }
        },
        "required": ["code"],
        "additionalProperties": false
    })
}

/// Handles the 'tools/list' request by returning a JSON definition of all available tools.
fn handle_tools_list(req: &Request) -> Response {
    let contract_types: Vec<&str> = addresses::ContractType::ALL.iter().map(|t| t.as_str()).collect();
    let tools = json!([
        {
            "name": "generate_code",
            "description": "Generate a complete Solidity contract from a natural-language description.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "description": {"type": "string", "description": "What the contract should do, including parameter values."}
                },
                "required": ["description"],
                "additionalProperties": false
            }
        },
        {
            "name": "refine_code",
            "description": "Apply a requested change to existing Solidity code.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "currentCode": {"type": "string"},
                    "refinementRequest": {"type": "string", "description": "The change to make."},
                    "contractContext": {"type": "string", "description": "Optional template and parameter context."}
                },
                "required": ["currentCode", "refinementRequest"],
                "additionalProperties": false
            }
        },
        {
            "name": "explain_parameter",
            "description": "Explain what a contract template parameter controls.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "parameterName": {"type": "string"},
                    "parameterLabel": {"type": "string"},
                    "contractTypeName": {"type": "string"},
                    "parameterContextDescription": {"type": "string"}
                },
                "required": ["parameterName", "parameterLabel", "contractTypeName"],
                "additionalProperties": false
            }
        },
        {
            "name": "estimate_gas",
            "description": "Estimate deployment gas for a contract, with an explanation.",
            "inputSchema": code_only_schema("Solidity source")
        },
        {
            "name": "suggest_error_prevention",
            "description": "Security suggestions and a 0-100 score for a generated contract.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "contractType": {"type": "string"},
                    "parameters": {"type": "object", "description": "Parameter values used to generate the code."},
                    "code": {"type": "string"}
                },
                "required": ["contractType", "code"],
                "additionalProperties": false
            }
        },
        {
            "name": "generate_documentation",
            "description": "Add NatSpec documentation to a contract without changing logic.",
            "inputSchema": code_only_schema("Solidity source")
        },
        {
            "name": "generate_test_cases",
            "description": "Generate a Hardhat test file for a contract.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "code": {"type": "string"},
                    "contractName": {"type": "string"}
                },
                "required": ["code"],
                "additionalProperties": false
            }
        },
        {
            "name": "find_known_addresses",
            "description": "Answer a natural-language question about DeFi contract addresses using only verified data.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "e.g. 'Uniswap V2 router on Ethereum'"}
                },
                "required": ["query"],
                "additionalProperties": false
            }
        },
        {
            "name": "fetch_contract_addresses",
            "description": "Filter the verified address table directly. All filters optional.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "mainnetName": {"type": "string", "description": "Case-insensitive substring of the network name."},
                    "systemName": {"type": "string", "description": "Case-insensitive substring of the protocol name."},
                    "contractType": {"type": "string", "enum": contract_types}
                },
                "additionalProperties": false
            }
        },
        {
            "name": "list_templates",
            "description": "List contract templates, or get one by id.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": {"type": "string"}
                },
                "additionalProperties": false
            }
        },
        {
            "name": "save_lead",
            "description": "Submit contact details (email, Telegram username, Solana address).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "email": {"type": "string", "format": "email"},
                    "telegramUsername": {"type": "string", "pattern": "^[a-zA-Z0-9_]{3,32}$"},
                    "solanaAddress": {"type": "string", "pattern": "^[1-9A-HJ-NP-Za-km-z]{32,44}$"}
                },
                "required": ["email", "telegramUsername", "solanaAddress"],
                "additionalProperties": false
            }
        }
    ]);

    Response::success(req.id.clone(), json!({ "tools": tools }))
}
