//! Lead capture. Validates the submission and acknowledges it.
//!
//! Nothing is stored: there is no persistence collaborator yet, so a valid
//! submission is only logged and acknowledged.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::{check_input, FlowError};

pub const FLOW: &str = "saveLead";

lazy_static! {
    pub static ref TELEGRAM_USERNAME: Regex = Regex::new(r"^[a-zA-Z0-9_]{3,32}$").unwrap();
    pub static ref SOLANA_ADDRESS: Regex = Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveLeadInput {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(regex(
        path = "TELEGRAM_USERNAME",
        message = "must be 3-32 letters, digits or underscores"
    ))]
    pub telegram_username: String,
    #[validate(regex(path = "SOLANA_ADDRESS", message = "must be a base58 address"))]
    pub solana_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLeadOutput {
    pub success: bool,
    pub message: String,
}

pub fn save_lead(input: SaveLeadInput) -> Result<SaveLeadOutput, FlowError> {
    check_input(&input)?;
    info!(telegram = %input.telegram_username, "Lead received");
    Ok(SaveLeadOutput {
        success: true,
        message: "Thanks! Your details were received.".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SaveLeadInput {
        SaveLeadInput {
            email: "dev@example.com".into(),
            telegram_username: "forge_dev".into(),
            solana_address: "So11111111111111111111111111111111111111112".into(),
        }
    }

    #[test]
    fn valid_lead_is_acknowledged() {
        let out = save_lead(valid()).unwrap();
        assert!(out.success);
        assert!(!out.message.is_empty());
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        let longest = "a".repeat(32);
        for handle in ["abc", longest.as_str()] {
            let mut lead = valid();
            lead.telegram_username = handle.to_string();
            assert!(save_lead(lead).is_ok(), "{} rejected", handle);
        }
        for address in ["1".repeat(32), "z".repeat(44)] {
            let mut lead = valid();
            lead.solana_address = address.clone();
            assert!(save_lead(lead).is_ok(), "{} rejected", address);
        }
    }

    #[test]
    fn bad_email_is_rejected() {
        for email in ["", "not-an-email", "a@", "@b.com"] {
            let mut lead = valid();
            lead.email = email.into();
            let err = save_lead(lead).unwrap_err();
            assert!(err.is_input_error(), "{} accepted", email);
        }
    }

    #[test]
    fn bad_telegram_handle_is_rejected() {
        let too_long = "a".repeat(33);
        for handle in ["ab", "@forge", "forge-dev", "has space", too_long.as_str()] {
            let mut lead = valid();
            lead.telegram_username = handle.to_string();
            assert!(save_lead(lead).is_err(), "{} accepted", handle);
        }
    }

    #[test]
    fn bad_solana_address_is_rejected() {
        // 0, O, I and l are outside the base58 alphabet
        for address in [
            "0".repeat(40),
            "O".repeat(40),
            "I".repeat(40),
            "l".repeat(40),
            "1".repeat(31),
            "1".repeat(45),
            "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D".to_string(),
        ] {
            let mut lead = valid();
            lead.solana_address = address.clone();
            assert!(save_lead(lead).is_err(), "{} accepted", address);
        }
    }
}
