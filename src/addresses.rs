// src/addresses.rs

//! Static table of well-known DeFi contract addresses and the filter over it.
//!
//! The table is loaded once and never mutated. Lookups scan it in insertion
//! order; it is small enough that no index is kept.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Role a contract plays inside its system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    Router,
    Factory,
    WrappedNativeToken,
    Other,
}

impl ContractType {
    pub const ALL: [ContractType; 4] = [
        ContractType::Router,
        ContractType::Factory,
        ContractType::WrappedNativeToken,
        ContractType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Router => "Router",
            ContractType::Factory => "Factory",
            ContractType::WrappedNativeToken => "WrappedNativeToken",
            ContractType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownContractAddress {
    pub mainnet_name: String,
    pub system_name: String,
    pub contract_name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl KnownContractAddress {
    /// Full explorer link for this address, when an explorer prefix is known.
    pub fn explorer_link(&self) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|prefix| format!("{}{}", prefix, self.address))
    }
}

/// Optional lookup criteria. All given criteria must hold.
///
/// `mainnet_name` and `system_name` are case-insensitive substring matches.
/// `contract_type` is an exact, case-sensitive comparison against the enum
/// name; a value naming no variant matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFilter {
    #[serde(default)]
    pub mainnet_name: Option<String>,
    #[serde(default)]
    pub system_name: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
}

impl AddressFilter {
    pub fn matches(&self, record: &KnownContractAddress) -> bool {
        if let Some(mainnet) = &self.mainnet_name {
            if !contains_ignore_case(&record.mainnet_name, mainnet) {
                return false;
            }
        }
        if let Some(system) = &self.system_name {
            if !contains_ignore_case(&record.system_name, system) {
                return false;
            }
        }
        if let Some(kind) = &self.contract_type {
            if record.contract_type.as_str() != kind {
                return false;
            }
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Returns the records matching `criteria`, preserving table order.
pub fn filter<'a>(
    records: &'a [KnownContractAddress],
    criteria: &AddressFilter,
) -> Vec<&'a KnownContractAddress> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// Filters the built-in table.
pub fn lookup(criteria: &AddressFilter) -> Vec<KnownContractAddress> {
    filter(&KNOWN_ADDRESSES, criteria).into_iter().cloned().collect()
}

fn record(
    mainnet_name: &str,
    system_name: &str,
    contract_name: &str,
    address: &str,
    contract_type: ContractType,
    explorer_url: &str,
    notes: Option<&str>,
) -> KnownContractAddress {
    KnownContractAddress {
        mainnet_name: mainnet_name.to_string(),
        system_name: system_name.to_string(),
        contract_name: contract_name.to_string(),
        address: address.to_string(),
        contract_type,
        explorer_url: Some(explorer_url.to_string()),
        notes: notes.map(str::to_string),
    }
}

const ETHERSCAN: &str = "https://etherscan.io/address/";
const BSCSCAN: &str = "https://bscscan.com/address/";
const POLYGONSCAN: &str = "https://polygonscan.com/address/";
const ARBISCAN: &str = "https://arbiscan.io/address/";
const BASESCAN: &str = "https://basescan.org/address/";
const SOLSCAN: &str = "https://solscan.io/account/";

lazy_static! {
    pub static ref KNOWN_ADDRESSES: Vec<KnownContractAddress> = vec![
        record(
            "Ethereum",
            "Uniswap V2",
            "UniswapV2Router02",
            "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D",
            ContractType::Router,
            ETHERSCAN,
            Some("Use for swaps and adding/removing liquidity on Uniswap V2 pairs."),
        ),
        record(
            "Ethereum",
            "Uniswap V2",
            "UniswapV2Factory",
            "0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f",
            ContractType::Factory,
            ETHERSCAN,
            Some("Creates pairs; getPair(tokenA, tokenB) resolves existing pools."),
        ),
        record(
            "Ethereum",
            "Uniswap V3",
            "SwapRouter",
            "0xE592427A0AEce92De3Edee1F18E0157C05861564",
            ContractType::Router,
            ETHERSCAN,
            None,
        ),
        record(
            "Ethereum",
            "Uniswap V3",
            "UniswapV3Factory",
            "0x1F98431c8aD98523631AE4a59f267346ea31F984",
            ContractType::Factory,
            ETHERSCAN,
            Some("Pools are keyed by token pair and fee tier."),
        ),
        record(
            "Ethereum",
            "WETH",
            "WETH9",
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
            ContractType::WrappedNativeToken,
            ETHERSCAN,
            None,
        ),
        record(
            "BNB Smart Chain",
            "PancakeSwap V2",
            "PancakeRouter",
            "0x10ED43C718714eb63d5aA57B78B54704E256024E",
            ContractType::Router,
            BSCSCAN,
            None,
        ),
        record(
            "BNB Smart Chain",
            "PancakeSwap V2",
            "PancakeFactory",
            "0xcA143Ce32Fe78f1f7019d7d551a6402fC5350c73",
            ContractType::Factory,
            BSCSCAN,
            None,
        ),
        record(
            "BNB Smart Chain",
            "WBNB",
            "WBNB",
            "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c",
            ContractType::WrappedNativeToken,
            BSCSCAN,
            None,
        ),
        record(
            "Polygon",
            "QuickSwap",
            "UniswapV2Router02 (QuickSwap)",
            "0xa5E0829CaCEd8fFDD4De3c43696c57F7D7A678ff",
            ContractType::Router,
            POLYGONSCAN,
            Some("Uniswap V2 fork; same router interface."),
        ),
        record(
            "Polygon",
            "WMATIC",
            "WMATIC",
            "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270",
            ContractType::WrappedNativeToken,
            POLYGONSCAN,
            None,
        ),
        record(
            "Arbitrum One",
            "SushiSwap",
            "SushiSwap Router",
            "0x1b02dA8Cb0d097eB8D57A175b88c7D8b47997506",
            ContractType::Router,
            ARBISCAN,
            None,
        ),
        record(
            "Base",
            "Aerodrome",
            "Aerodrome Router",
            "0xcF77a3Ba9A5CA399B7c97c74d54e5b1Beb874E43",
            ContractType::Router,
            BASESCAN,
            None,
        ),
        record(
            "Solana",
            "Raydium",
            "Raydium AMM v4 program",
            "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8",
            ContractType::Other,
            SOLSCAN,
            Some("Program id, not an EVM contract."),
        ),
        record(
            "Solana",
            "Wrapped SOL",
            "Native mint",
            "So11111111111111111111111111111111111111112",
            ContractType::WrappedNativeToken,
            SOLSCAN,
            None,
        ),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_system(system: &str) -> AddressFilter {
        AddressFilter {
            system_name: Some(system.to_string()),
            ..AddressFilter::default()
        }
    }

    #[test]
    fn empty_filter_returns_whole_table_in_order() {
        let all = lookup(&AddressFilter::default());
        assert_eq!(all, *KNOWN_ADDRESSES);
    }

    #[test]
    fn uniswap_v2_returns_router_and_factory_only() {
        let hits = lookup(&by_system("Uniswap V2"));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].contract_type, ContractType::Router);
        assert_eq!(hits[1].contract_type, ContractType::Factory);
        assert!(hits.iter().all(|r| r.mainnet_name == "Ethereum"));
        assert!(hits.iter().all(|r| r.system_name == "Uniswap V2"));
    }

    #[test]
    fn mainnet_match_is_case_insensitive_substring() {
        let criteria = AddressFilter {
            mainnet_name: Some("eth".into()),
            ..AddressFilter::default()
        };
        let hits = lookup(&criteria);
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|r| r.mainnet_name == "Ethereum"));
        for record in KNOWN_ADDRESSES.iter() {
            let included = hits.contains(record);
            assert_eq!(included, record.mainnet_name.to_lowercase().contains("eth"));
        }
    }

    #[test]
    fn contract_type_is_exact_and_case_sensitive() {
        let exact = AddressFilter {
            contract_type: Some("Router".into()),
            ..AddressFilter::default()
        };
        let hits = lookup(&exact);
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|r| r.contract_type == ContractType::Router));

        for near_miss in ["router", "Rout", "WrappedNative"] {
            let criteria = AddressFilter {
                contract_type: Some(near_miss.into()),
                ..AddressFilter::default()
            };
            assert!(lookup(&criteria).is_empty(), "{} should not match", near_miss);
        }
    }

    #[test]
    fn criteria_combine_with_and() {
        let criteria = AddressFilter {
            mainnet_name: Some("bnb".into()),
            system_name: Some("pancake".into()),
            contract_type: Some("Factory".into()),
        };
        let hits = lookup(&criteria);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].contract_name, "PancakeFactory");
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(lookup(&by_system("Curve")).is_empty());
    }

    #[test]
    fn filter_works_over_any_slice() {
        let records = vec![KNOWN_ADDRESSES[2].clone(), KNOWN_ADDRESSES[0].clone()];
        let hits = filter(&records, &by_system("uniswap"));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].system_name, "Uniswap V3");
    }

    #[test]
    fn records_serialize_with_type_key() {
        let v = serde_json::to_value(&KNOWN_ADDRESSES[0]).unwrap();
        assert_eq!(v["type"], "Router");
        assert_eq!(v["mainnetName"], "Ethereum");
        assert!(KNOWN_ADDRESSES[0].explorer_link().unwrap().starts_with(ETHERSCAN));
    }
}
