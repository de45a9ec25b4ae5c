// src/api/leads.rs

use axum::Json;

use super::ApiJson;
use crate::flows::{
    save_lead::{save_lead, SaveLeadInput, SaveLeadOutput},
    FlowError,
};

/// Validate and acknowledge a lead submission
pub async fn save_lead_handler(
    ApiJson(input): ApiJson<SaveLeadInput>,
) -> Result<Json<SaveLeadOutput>, FlowError> {
    save_lead(input).map(Json)
}
