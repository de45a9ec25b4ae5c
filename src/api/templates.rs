// src/api/templates.rs

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::ApiJson;
use crate::{
    flows::{
        generate_code::{generate_code, GenerateCodeInput},
        FlowError,
    },
    templates::{self, ContractTemplate, Mode, Parameter},
    AppState,
};

/// Values a caller filled in for a template
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateValuesRequest {
    #[serde(default)]
    pub values: Map<String, Value>,
    /// Only affects which parameters are shown, never what is generated
    #[serde(default)]
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleParametersResponse {
    pub template_id: String,
    pub mode: Mode,
    pub parameters: Vec<Parameter>,
    pub values: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFromTemplateResponse {
    pub template_id: String,
    pub description: String,
    pub code: String,
}

/// List all contract templates
pub async fn list_templates_handler() -> Json<&'static [ContractTemplate]> {
    Json(templates::all())
}

/// Get a template by id
pub async fn get_template_handler(
    Path(id): Path<String>,
) -> Result<Json<&'static ContractTemplate>, FlowError> {
    Ok(Json(templates::find(&id)?))
}

/// Resolve values and report which parameters a caller in `mode` sees
pub async fn visible_parameters_handler(
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TemplateValuesRequest>,
) -> Result<Json<VisibleParametersResponse>, FlowError> {
    let template = templates::find(&id)?;
    let values = template.resolve_values(&req.values)?;
    let parameters = template
        .visible_parameters(req.mode, &values)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(VisibleParametersResponse {
        template_id: template.id.clone(),
        mode: req.mode,
        parameters,
        values,
    }))
}

/// Generate contract code from a template and caller values
pub async fn generate_from_template_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TemplateValuesRequest>,
) -> Result<Json<GenerateFromTemplateResponse>, FlowError> {
    let template = templates::find(&id)?;
    let values = template.resolve_values(&req.values)?;
    let description = template.compose_description(&values);
    info!(template = %template.id, mode = ?req.mode, "Generating from template");

    let output = generate_code(
        state.llm.as_ref(),
        GenerateCodeInput {
            description: description.clone(),
        },
    )
    .await?;

    Ok(Json(GenerateFromTemplateResponse {
        template_id: template.id.clone(),
        description,
        code: output.code,
    }))
}

/// Create the template router
pub fn create_template_router() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates_handler))
        .route("/templates/:id", get(get_template_handler))
        .route("/templates/:id/visible", post(visible_parameters_handler))
        .route("/templates/:id/generate", post(generate_from_template_handler))
}
