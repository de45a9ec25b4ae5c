// src/templates.rs

//! Contract template catalog.
//!
//! Templates are defined once at startup and never mutated. Each carries the
//! parameter definitions a caller fills in; `resolve_values` overlays caller
//! values on defaults and `compose_description` turns the result into the
//! natural-language request handed to code generation.

use std::collections::HashSet;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use self::ParameterType::{Address, Boolean, Number, Select, Text, Textarea};

#[derive(Error, Debug, PartialEq)]
pub enum TemplateError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("parameter '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
    #[error("template '{template}' is malformed: {reason}")]
    Malformed { template: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Text,
    Number,
    Boolean,
    Address,
    Select,
    Textarea,
}

/// Which parameters a caller wants to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Basic,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Condition {
    Equals(Value),
    IsTrue,
    NotEmpty,
}

impl Condition {
    pub fn holds(&self, value: Option<&Value>) -> bool {
        match self {
            Condition::Equals(expected) => value == Some(expected),
            Condition::IsTrue => value.map(truthy).unwrap_or(false),
            Condition::NotEmpty => match value {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            },
        }
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub parameter: String,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub advanced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Dependency>,
}

impl Parameter {
    fn new(name: &str, label: &str, param_type: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            param_type,
            default: None,
            options: Vec::new(),
            category: None,
            advanced: false,
            description: None,
            depends_on: None,
        }
    }

    fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn depends_on(mut self, parameter: &str, condition: Condition) -> Self {
        self.depends_on = Some(Dependency {
            parameter: parameter.to_string(),
            condition,
        });
        self
    }

    /// Checks and normalizes a caller-supplied value for this parameter.
    fn coerce(&self, value: &Value) -> Result<Value, TemplateError> {
        let invalid = |reason: &str| TemplateError::InvalidValue {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        match self.param_type {
            ParameterType::Number => match value {
                Value::Number(_) => Ok(value.clone()),
                Value::String(s) if s.trim().is_empty() => Ok(Value::String(String::new())),
                Value::String(s) => parse_number(s.trim()).ok_or_else(|| invalid("expected a number")),
                _ => Err(invalid("expected a number")),
            },
            ParameterType::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::String(s) if s == "true" || s == "false" => Ok(Value::Bool(s == "true")),
                _ => Err(invalid("expected a boolean")),
            },
            ParameterType::Select => match value.as_str() {
                Some(choice) if self.options.iter().any(|o| o == choice) => Ok(value.clone()),
                _ => Err(invalid(&format!("expected one of: {}", self.options.join(", ")))),
            },
            ParameterType::Text | ParameterType::Textarea | ParameterType::Address => {
                match value {
                    Value::String(_) => Ok(value.clone()),
                    Value::Number(n) => Ok(Value::String(n.to_string())),
                    _ => Err(invalid("expected a string")),
                }
            }
        }
    }
}

/// Integers stay integers; digit strings too wide for `i64`/`u64` are kept
/// verbatim so token amounts reach the prompt unrounded.
fn parse_number(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<u64>() {
        return Some(json!(n));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(json!(n));
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Some(Value::String(text.to_string()));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_prompt_enhancement: Option<String>,
}

impl ContractTemplate {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Defaults overlaid with `supplied`. Every parameter participates,
    /// advanced or not; mode only affects what is shown.
    pub fn resolve_values(&self, supplied: &Map<String, Value>) -> Result<Map<String, Value>, TemplateError> {
        if let Some(unknown) = supplied.keys().find(|k| self.parameter(k).is_none()) {
            return Err(TemplateError::UnknownParameter(unknown.clone()));
        }

        let mut resolved = Map::new();
        for param in &self.parameters {
            match supplied.get(&param.name) {
                Some(Value::Null) | None => {
                    if let Some(default) = &param.default {
                        resolved.insert(param.name.clone(), default.clone());
                    }
                }
                Some(value) => {
                    resolved.insert(param.name.clone(), param.coerce(value)?);
                }
            }
        }
        Ok(resolved)
    }

    fn dependency_met(&self, param: &Parameter, values: &Map<String, Value>) -> bool {
        match &param.depends_on {
            None => true,
            Some(dep) => dep.condition.holds(values.get(&dep.parameter)),
        }
    }

    /// Parameters a caller in `mode` should see given the current values.
    pub fn visible_parameters(&self, mode: Mode, values: &Map<String, Value>) -> Vec<&Parameter> {
        self.parameters
            .iter()
            .filter(|p| mode == Mode::Advanced || !p.advanced)
            .filter(|p| self.dependency_met(p, values))
            .collect()
    }

    /// Natural-language description of the requested contract.
    ///
    /// Parameters whose dependency does not hold are left out; advanced
    /// parameters are always included.
    pub fn compose_description(&self, values: &Map<String, Value>) -> String {
        let mut out = format!(
            "Create a Solidity smart contract: {}.\n{}\n\nParameters:\n",
            self.name, self.description
        );
        for param in &self.parameters {
            if !self.dependency_met(param, values) {
                continue;
            }
            let rendered = match values.get(&param.name) {
                None | Some(Value::Null) => "(not specified)".to_string(),
                Some(Value::String(s)) if s.trim().is_empty() => "(not specified)".to_string(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            out.push_str(&format!("- {} ({}): {}\n", param.label, param.name, rendered));
        }
        if let Some(extra) = &self.ai_prompt_enhancement {
            out.push('\n');
            out.push_str(extra);
            out.push('\n');
        }
        out
    }

    fn check(&self) -> Result<(), TemplateError> {
        let malformed = |reason: String| TemplateError::Malformed {
            template: self.id.clone(),
            reason,
        };

        let mut names = HashSet::new();
        for param in &self.parameters {
            if !names.insert(param.name.as_str()) {
                return Err(malformed(format!("duplicate parameter '{}'", param.name)));
            }
        }
        for param in &self.parameters {
            if let Some(dep) = &param.depends_on {
                if dep.parameter == param.name {
                    return Err(malformed(format!("'{}' depends on itself", param.name)));
                }
                if !names.contains(dep.parameter.as_str()) {
                    return Err(malformed(format!(
                        "'{}' depends on unknown parameter '{}'",
                        param.name, dep.parameter
                    )));
                }
            }
            if param.param_type == ParameterType::Select {
                if param.options.is_empty() {
                    return Err(malformed(format!("select '{}' has no options", param.name)));
                }
                if let Some(default) = &param.default {
                    if param.coerce(default).is_err() {
                        return Err(malformed(format!(
                            "select '{}' default is not an option",
                            param.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// All templates, in display order.
pub fn all() -> &'static [ContractTemplate] {
    &TEMPLATES
}

pub fn find(id: &str) -> Result<&'static ContractTemplate, TemplateError> {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| TemplateError::UnknownTemplate(id.to_string()))
}

/// Verifies catalog invariants. Called once at startup.
pub fn validate_catalog() -> Result<(), TemplateError> {
    validate_templates(&TEMPLATES)
}

pub fn validate_templates(templates: &[ContractTemplate]) -> Result<(), TemplateError> {
    let mut ids = HashSet::new();
    for template in templates {
        if !ids.insert(template.id.as_str()) {
            return Err(TemplateError::Malformed {
                template: template.id.clone(),
                reason: "duplicate template id".into(),
            });
        }
        template.check()?;
    }
    Ok(())
}

fn template(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    parameters: Vec<Parameter>,
    ai_prompt_enhancement: Option<&str>,
) -> ContractTemplate {
    ContractTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        parameters,
        ai_prompt_enhancement: ai_prompt_enhancement.map(str::to_string),
    }
}

lazy_static! {
    static ref TEMPLATES: Vec<ContractTemplate> = vec![
        template(
            "erc20-token",
            "ERC20 Token",
            "A fungible token following the ERC20 standard.",
            "coins",
            vec![
                Parameter::new("tokenName", "Token Name", Text)
                    .default_value(json!("MyToken"))
                    .category("Basics"),
                Parameter::new("tokenSymbol", "Token Symbol", Text)
                    .default_value(json!("MTK"))
                    .category("Basics"),
                Parameter::new("initialSupply", "Initial Supply", Number)
                    .default_value(json!(1_000_000))
                    .category("Supply"),
                Parameter::new("decimals", "Decimals", Number)
                    .default_value(json!(18))
                    .category("Supply")
                    .advanced(),
                Parameter::new("mintable", "Mintable", Boolean)
                    .default_value(json!(false))
                    .category("Features"),
                Parameter::new("maxSupply", "Maximum Supply", Number)
                    .category("Supply")
                    .describe("Hard cap enforced on every mint.")
                    .depends_on("mintable", Condition::IsTrue),
                Parameter::new("burnable", "Burnable", Boolean)
                    .default_value(json!(false))
                    .category("Features"),
                Parameter::new("pausable", "Pausable", Boolean)
                    .default_value(json!(false))
                    .category("Features")
                    .advanced(),
                Parameter::new("accessControl", "Access Control", Select)
                    .options(&["Ownable", "Roles", "None"])
                    .default_value(json!("Ownable"))
                    .category("Security")
                    .advanced(),
            ],
            Some("Use OpenZeppelin Contracts v5 (ERC20, ERC20Burnable, ERC20Pausable, Ownable/AccessControl) where applicable."),
        ),
        template(
            "erc721-nft",
            "NFT Collection (ERC721)",
            "A non-fungible token collection with optional public minting.",
            "image",
            vec![
                Parameter::new("collectionName", "Collection Name", Text)
                    .default_value(json!("MyCollection"))
                    .category("Basics"),
                Parameter::new("collectionSymbol", "Collection Symbol", Text)
                    .default_value(json!("MYC"))
                    .category("Basics"),
                Parameter::new("baseUri", "Base URI", Text)
                    .default_value(json!("ipfs://"))
                    .category("Metadata"),
                Parameter::new("maxSupply", "Max Supply", Number)
                    .default_value(json!(10_000))
                    .category("Supply"),
                Parameter::new("publicMint", "Public Minting", Boolean)
                    .default_value(json!(false))
                    .category("Minting"),
                Parameter::new("mintPrice", "Mint Price (ETH)", Number)
                    .default_value(json!(0.05))
                    .category("Minting")
                    .depends_on("publicMint", Condition::IsTrue),
                Parameter::new("royaltyBps", "Royalty (basis points)", Number)
                    .default_value(json!(500))
                    .category("Royalties")
                    .advanced(),
                Parameter::new("royaltyReceiver", "Royalty Receiver", Address)
                    .category("Royalties")
                    .advanced()
                    .depends_on("royaltyBps", Condition::NotEmpty),
            ],
            Some("Use ERC721 with ERC2981 royalties when a royalty is set; guard minting against exceeding max supply."),
        ),
        template(
            "staking-rewards",
            "Staking Rewards",
            "Stake an ERC20 token and earn rewards over time.",
            "trending-up",
            vec![
                Parameter::new("stakingToken", "Staking Token", Address).category("Tokens"),
                Parameter::new("rewardToken", "Reward Token", Address).category("Tokens"),
                Parameter::new("rewardRate", "Reward Rate (tokens/second)", Number)
                    .default_value(json!(1))
                    .category("Rewards"),
                Parameter::new("lockPeriod", "Lock Period", Select)
                    .options(&["None", "7 days", "30 days", "90 days"])
                    .default_value(json!("None"))
                    .category("Rules"),
                Parameter::new("earlyWithdrawPenalty", "Early Withdrawal Penalty (%)", Number)
                    .default_value(json!(10))
                    .category("Rules")
                    .depends_on("lockPeriod", Condition::Equals(json!("90 days"))),
                Parameter::new("compounding", "Auto-compounding", Boolean)
                    .default_value(json!(false))
                    .category("Rewards")
                    .advanced(),
            ],
            Some("Follow the Synthetix StakingRewards accounting pattern; protect state-changing functions with ReentrancyGuard."),
        ),
        template(
            "dao-governance",
            "DAO Governance",
            "On-chain governor with token voting and an optional timelock.",
            "landmark",
            vec![
                Parameter::new("daoName", "DAO Name", Text)
                    .default_value(json!("MyDAO"))
                    .category("Basics"),
                Parameter::new("governanceToken", "Governance Token", Address).category("Basics"),
                Parameter::new("votingDelay", "Voting Delay (blocks)", Number)
                    .default_value(json!(7200))
                    .category("Voting"),
                Parameter::new("votingPeriod", "Voting Period (blocks)", Number)
                    .default_value(json!(50_400))
                    .category("Voting"),
                Parameter::new("quorumPercent", "Quorum (%)", Number)
                    .default_value(json!(4))
                    .category("Voting"),
                Parameter::new("useTimelock", "Use Timelock", Boolean)
                    .default_value(json!(true))
                    .category("Execution")
                    .advanced(),
                Parameter::new("timelockDelay", "Timelock Delay (seconds)", Number)
                    .default_value(json!(172_800))
                    .category("Execution")
                    .advanced()
                    .depends_on("useTimelock", Condition::IsTrue),
            ],
            Some("Build on OpenZeppelin Governor, GovernorSettings, GovernorVotes, GovernorVotesQuorumFraction and GovernorTimelockControl."),
        ),
        template(
            "token-vesting",
            "Token Vesting",
            "Release ERC20 tokens to a beneficiary on a schedule.",
            "hourglass",
            vec![
                Parameter::new("beneficiary", "Beneficiary", Address).category("Schedule"),
                Parameter::new("token", "Vested Token", Address).category("Schedule"),
                Parameter::new("cliffMonths", "Cliff (months)", Number)
                    .default_value(json!(12))
                    .category("Schedule"),
                Parameter::new("durationMonths", "Duration (months)", Number)
                    .default_value(json!(48))
                    .category("Schedule"),
                Parameter::new("schedule", "Release Schedule", Select)
                    .options(&["Linear", "Monthly", "Quarterly"])
                    .default_value(json!("Linear"))
                    .category("Schedule"),
                Parameter::new("revocable", "Revocable by Owner", Boolean)
                    .default_value(json!(false))
                    .category("Control")
                    .advanced(),
                Parameter::new("notes", "Additional Requirements", Textarea)
                    .category("Other")
                    .advanced(),
            ],
            None,
        ),
        template(
            "liquidity-locker",
            "Liquidity Locker",
            "Lock DEX liquidity-pool tokens until a release time.",
            "lock",
            vec![
                Parameter::new("network", "Network", Select)
                    .options(&["Ethereum", "BNB Smart Chain", "Polygon", "Arbitrum One", "Base"])
                    .default_value(json!("Ethereum"))
                    .category("Network"),
                Parameter::new("dex", "DEX", Text)
                    .default_value(json!("Uniswap V2"))
                    .category("Network"),
                Parameter::new("lpToken", "LP Token", Address).category("Lock"),
                Parameter::new("unlockDays", "Lock Duration (days)", Number)
                    .default_value(json!(180))
                    .category("Lock"),
                Parameter::new("allowExtension", "Allow Extending Lock", Boolean)
                    .default_value(json!(true))
                    .category("Lock")
                    .advanced(),
            ],
            Some("Only use router/factory addresses that are known for the chosen network and DEX; never invent addresses."),
        ),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn seeded_catalog_is_well_formed() {
        validate_catalog().unwrap();
        assert!(all().len() >= 6);
    }

    #[test]
    fn every_parameter_type_is_used() {
        let used: HashSet<_> = all()
            .iter()
            .flat_map(|t| t.parameters.iter().map(|p| p.param_type))
            .collect();
        for kind in [Text, Number, Boolean, Address, Select, Textarea] {
            assert!(used.contains(&kind), "{:?} unused", kind);
        }
    }

    #[test]
    fn dangling_dependency_is_rejected() {
        let broken = template(
            "broken",
            "Broken",
            "",
            "x",
            vec![Parameter::new("a", "A", Text).depends_on("ghost", Condition::IsTrue)],
            None,
        );
        assert!(matches!(
            validate_templates(&[broken]),
            Err(TemplateError::Malformed { .. })
        ));
    }

    #[test]
    fn duplicate_ids_and_names_are_rejected() {
        let t = template("dup", "D", "", "x", vec![Parameter::new("a", "A", Text)], None);
        assert!(validate_templates(&[t.clone(), t]).is_err());

        let twice = template(
            "twice",
            "T",
            "",
            "x",
            vec![Parameter::new("a", "A", Text), Parameter::new("a", "A2", Number)],
            None,
        );
        assert!(validate_templates(&[twice]).is_err());
    }

    #[test]
    fn select_needs_valid_default() {
        let t = template(
            "sel",
            "S",
            "",
            "x",
            vec![Parameter::new("s", "S", Select)
                .options(&["a"])
                .default_value(json!("b"))],
            None,
        );
        assert!(validate_templates(&[t]).is_err());
    }

    #[test]
    fn resolve_overlays_defaults_and_keeps_advanced() {
        let erc20 = find("erc20-token").unwrap();
        let resolved = erc20
            .resolve_values(&values(json!({ "tokenName": "Forge", "initialSupply": "500" })))
            .unwrap();
        assert_eq!(resolved["tokenName"], "Forge");
        assert_eq!(resolved["initialSupply"], json!(500));
        // advanced defaults participate even though basic mode hides them
        assert_eq!(resolved["decimals"], json!(18));
        assert_eq!(resolved["accessControl"], "Ownable");
        assert!(!resolved.contains_key("maxSupply"));

        let form = erc20
            .resolve_values(&values(json!({
                "initialSupply": "1000000000000000000000001",
                "decimals": "18",
                "maxSupply": "2.5"
            })))
            .unwrap();
        assert_eq!(form["initialSupply"], "1000000000000000000000001");
        assert_eq!(form["decimals"], json!(18));
        assert_eq!(form["maxSupply"], json!(2.5));
        let text = erc20.compose_description(&form);
        assert!(text.contains("- Initial Supply (initialSupply): 1000000000000000000000001\n"));
        assert!(text.contains("- Decimals (decimals): 18\n"));
        assert!(!text.contains("18.0"));
    }

    #[test]
    fn numeric_strings_keep_their_form() {
        assert_eq!(parse_number("-7"), Some(json!(-7)));
        assert_eq!(parse_number("-99999999999999999999"), Some(json!("-99999999999999999999")));
        assert_eq!(parse_number("0.05"), Some(json!(0.05)));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("12abc"), None);
    }

    #[test]
    fn resolve_keeps_plain_defaults() {
        let erc20 = find("erc20-token").unwrap();
        let resolved = erc20.resolve_values(&Map::new()).unwrap();
        // advanced defaults participate even though basic mode hides them
        assert_eq!(resolved["decimals"], json!(18));
        assert_eq!(resolved["accessControl"], "Ownable");
        assert!(!resolved.contains_key("maxSupply"));
    }

    #[test]
    fn resolve_rejects_unknown_and_ill_typed_values() {
        let erc20 = find("erc20-token").unwrap();
        assert_eq!(
            erc20.resolve_values(&values(json!({ "bogus": 1 }))),
            Err(TemplateError::UnknownParameter("bogus".into()))
        );
        assert!(erc20
            .resolve_values(&values(json!({ "initialSupply": "lots" })))
            .is_err());
        assert!(erc20
            .resolve_values(&values(json!({ "mintable": "yes" })))
            .is_err());
        assert!(erc20
            .resolve_values(&values(json!({ "accessControl": "Admin" })))
            .is_err());
    }

    #[test]
    fn visibility_follows_mode_and_dependencies() {
        let erc20 = find("erc20-token").unwrap();
        let defaults = erc20.resolve_values(&Map::new()).unwrap();

        let basic: Vec<_> = erc20
            .visible_parameters(Mode::Basic, &defaults)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert!(!basic.contains(&"decimals"));
        assert!(!basic.contains(&"maxSupply"));

        let mintable = erc20
            .resolve_values(&values(json!({ "mintable": true })))
            .unwrap();
        let advanced: Vec<_> = erc20
            .visible_parameters(Mode::Advanced, &mintable)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert!(advanced.contains(&"decimals"));
        assert!(advanced.contains(&"maxSupply"));
    }

    #[test]
    fn equals_condition_matches_select_value() {
        let staking = find("staking-rewards").unwrap();
        let locked = staking
            .resolve_values(&values(json!({ "lockPeriod": "90 days" })))
            .unwrap();
        let names: Vec<_> = staking
            .visible_parameters(Mode::Basic, &locked)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert!(names.contains(&"earlyWithdrawPenalty"));

        let unlocked = staking.resolve_values(&Map::new()).unwrap();
        assert!(!staking
            .visible_parameters(Mode::Basic, &unlocked)
            .iter()
            .any(|p| p.name == "earlyWithdrawPenalty"));
    }

    #[test]
    fn description_lists_active_parameters_and_guidance() {
        let erc20 = find("erc20-token").unwrap();
        let resolved = erc20.resolve_values(&Map::new()).unwrap();
        let text = erc20.compose_description(&resolved);
        assert!(text.contains("ERC20 Token"));
        assert!(text.contains("- Token Name (tokenName): MyToken"));
        assert!(text.contains("- Decimals (decimals): 18"));
        assert!(!text.contains("maxSupply"));
        assert!(text.contains("OpenZeppelin"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        assert_eq!(
            find("nope").unwrap_err(),
            TemplateError::UnknownTemplate("nope".into())
        );
    }
}
