// src/api/flows.rs

use axum::{extract::State, routing::post, Json, Router};

use super::ApiJson;
use crate::{
    flows::{
        documentation::{generate_documentation, DocumentationInput, DocumentationOutput},
        error_prevention::{suggest_error_prevention, ErrorPreventionInput, ErrorPreventionOutput},
        estimate_gas::{estimate_gas, EstimateGasInput, EstimateGasOutput},
        explain_parameter::{explain_parameter, ExplainParameterInput, ExplainParameterOutput},
        find_addresses::{find_known_addresses, FindAddressesInput, FindAddressesOutput},
        generate_code::{generate_code, GenerateCodeInput, GenerateCodeOutput},
        refine_code::{refine_code, RefineCodeInput, RefineCodeOutput},
        test_cases::{generate_test_cases, TestCasesInput, TestCasesOutput},
        FlowError,
    },
    AppState,
};

pub async fn generate_code_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<GenerateCodeInput>,
) -> Result<Json<GenerateCodeOutput>, FlowError> {
    generate_code(state.llm.as_ref(), input).await.map(Json)
}

pub async fn refine_code_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RefineCodeInput>,
) -> Result<Json<RefineCodeOutput>, FlowError> {
    refine_code(state.llm.as_ref(), input).await.map(Json)
}

pub async fn explain_parameter_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ExplainParameterInput>,
) -> Result<Json<ExplainParameterOutput>, FlowError> {
    explain_parameter(state.llm.as_ref(), input).await.map(Json)
}

pub async fn estimate_gas_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EstimateGasInput>,
) -> Result<Json<EstimateGasOutput>, FlowError> {
    estimate_gas(state.llm.as_ref(), input).await.map(Json)
}

pub async fn error_prevention_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ErrorPreventionInput>,
) -> Result<Json<ErrorPreventionOutput>, FlowError> {
    suggest_error_prevention(state.llm.as_ref(), input).await.map(Json)
}

pub async fn documentation_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<DocumentationInput>,
) -> Result<Json<DocumentationOutput>, FlowError> {
    generate_documentation(state.llm.as_ref(), input).await.map(Json)
}

pub async fn test_cases_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TestCasesInput>,
) -> Result<Json<TestCasesOutput>, FlowError> {
    generate_test_cases(state.llm.as_ref(), input).await.map(Json)
}

pub async fn find_addresses_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<FindAddressesInput>,
) -> Result<Json<FindAddressesOutput>, FlowError> {
    find_known_addresses(state.llm.as_ref(), input).await.map(Json)
}

/// Create the flow router
pub fn create_flow_router() -> Router<AppState> {
    Router::new()
        .route("/flows/generate-code", post(generate_code_handler))
        .route("/flows/refine-code", post(refine_code_handler))
        .route("/flows/explain-parameter", post(explain_parameter_handler))
        .route("/flows/estimate-gas", post(estimate_gas_handler))
        .route("/flows/error-prevention", post(error_prevention_handler))
        .route("/flows/documentation", post(documentation_handler))
        .route("/flows/test-cases", post(test_cases_handler))
        .route("/flows/find-addresses", post(find_addresses_handler))
}
