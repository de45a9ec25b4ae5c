// src/api/addresses.rs

use axum::{extract::Query, Json};
use serde::Serialize;
use tracing::info;

use crate::addresses::{self, AddressFilter, KnownContractAddress};

#[derive(Debug, Serialize)]
pub struct AddressLookupResponse {
    pub count: usize,
    pub results: Vec<KnownContractAddress>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Filter the known-address table without involving the model
pub async fn lookup_addresses_handler(Query(query): Query<AddressFilter>) -> Json<AddressLookupResponse> {
    let criteria = AddressFilter {
        mainnet_name: blank_to_none(query.mainnet_name),
        system_name: blank_to_none(query.system_name),
        contract_type: blank_to_none(query.contract_type),
    };
    let results = addresses::lookup(&criteria);
    info!(?criteria, matches = results.len(), "Direct address lookup");
    Json(AddressLookupResponse {
        count: results.len(),
        results,
    })
}
