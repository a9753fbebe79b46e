//! Response payloads returned by the marketplace API.
//!
//! Only the fields the agent presents are required; everything else is
//! optional so that additions on the server side don't break decoding.
//! Ids and counters arrive as JSON strings on some routes and as numbers
//! on others, so they are normalized to `String`.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Accepts a JSON string, number or bool and keeps its textual form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
        Bool(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

// --- Balance management ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceInfo {
    pub address: String,
    #[serde(deserialize_with = "string_or_number")]
    pub x402_balance_usdc: String,
    #[serde(deserialize_with = "string_or_number")]
    pub wallet_usdc: String,
    #[serde(deserialize_with = "string_or_number")]
    pub total_api_calls: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_instructions: Option<DepositHint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositHint {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub contract: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Unsigned transaction the agent must submit with its own wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    pub to: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositInstructions {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub amount_usdc: String,
    pub transactions: Vec<PreparedTransaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curl_example: Option<String>,
}

impl DepositInstructions {
    /// Step 1: USDC `approve` for the marketplace contract.
    pub fn approval(&self) -> Option<&PreparedTransaction> {
        self.transactions.first()
    }

    /// Step 2: `depositBalance` on the marketplace contract.
    pub fn deposit(&self) -> Option<&PreparedTransaction> {
        self.transactions.get(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawInstructions {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub amount_usdc: String,
    pub contract: String,
    pub function: String,
    #[serde(default)]
    pub params: Vec<String>,
}

// --- Tasks ---

/// Entry of the free `/api/tasks` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub poster: String,
    #[serde(default)]
    pub worker: Option<String>,
    pub description: String,
    #[serde(deserialize_with = "string_or_number")]
    pub reward: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub status: String,
    #[serde(default, rename = "proofURI")]
    pub proof_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(deserialize_with = "string_or_number")]
    pub total: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumTask {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub description: String,
    #[serde(deserialize_with = "string_or_number")]
    pub reward_usdc: String,
    #[serde(deserialize_with = "string_or_number")]
    pub status: String,
    pub poster: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub proof_uri: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessInfo {
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub access_granted: bool,
    #[serde(deserialize_with = "string_or_number")]
    pub remaining_balance_usdc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumTaskResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub task: PremiumTask,
    pub access_info: AccessInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseAccessResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub task_id: String,
    #[serde(default)]
    pub agent: Option<String>,
    pub transaction: PreparedTransaction,
    pub after_purchase: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkTask {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub description: String,
    #[serde(deserialize_with = "string_or_number")]
    pub reward_usdc: String,
    #[serde(deserialize_with = "string_or_number")]
    pub status: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkTasksResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub total: String,
    #[serde(default)]
    pub tasks: Vec<BulkTask>,
    #[serde(deserialize_with = "string_or_number")]
    pub charged_usdc: String,
    #[serde(deserialize_with = "string_or_number")]
    pub remaining_balance_usdc: String,
}

// --- Analytics ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    #[serde(deserialize_with = "string_or_number")]
    pub total_earnings_usdc: String,
    #[serde(deserialize_with = "string_or_number")]
    pub tasks_completed: String,
    #[serde(deserialize_with = "string_or_number")]
    pub x402_balance_usdc: String,
    #[serde(deserialize_with = "string_or_number")]
    pub api_calls_made: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    pub stats: AgentStats,
    #[serde(deserialize_with = "string_or_number")]
    pub charged_usdc: String,
    #[serde(deserialize_with = "string_or_number")]
    pub remaining_balance_usdc: String,
}

// --- Pricing ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    #[serde(deserialize_with = "string_or_number")]
    pub cost_usdc: String,
    pub description: String,
}

/// Pricing tiers in the order the server lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingTiers(Vec<(String, PriceTier)>);

impl PricingTiers {
    pub fn get(&self, service: &str) -> Option<&PriceTier> {
        self.0
            .iter()
            .find(|(name, _)| name == service)
            .map(|(_, tier)| tier)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PriceTier)> {
        self.0.iter().map(|(name, tier)| (name.as_str(), tier))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for PricingTiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TiersVisitor;

        impl<'de> Visitor<'de> for TiersVisitor {
            type Value = PricingTiers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of service name to price tier")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut tiers = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, tier)) = map.next_entry::<String, PriceTier>()? {
                    tiers.push((name, tier));
                }
                Ok(PricingTiers(tiers))
            }
        }

        deserializer.deserialize_map(TiersVisitor)
    }
}

impl Serialize for PricingTiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, tier) in &self.0 {
            map.serialize_entry(name, tier)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub marketplace_contract: Option<String>,
    #[serde(default)]
    pub usdc_token: Option<String>,
    pub pricing: PricingTiers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_settings: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_use: Option<BTreeMap<String, String>>,
}

// --- Payment required ---

/// Body of a 402 response.
///
/// The marketplace sends one of two shapes: insufficient prepaid balance
/// (`required_usdc` / `deficit_usdc` / `deposit_endpoint`) or missing task
/// access (`task_id` / `access_fee_usdc` / `purchase_endpoint`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequiredBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub required_usdc: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub current_balance_usdc: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub deficit_usdc: Option<String>,
    #[serde(default)]
    pub deposit_endpoint: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub access_fee_usdc: Option<String>,
    #[serde(default)]
    pub purchase_endpoint: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    /// Payment hints (`X-Payment-Address`, `X-Payment-Token`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl PaymentRequiredBody {
    /// Amount the call costs: the per-call charge, or the task access fee.
    pub fn required(&self) -> Option<&str> {
        self.required_usdc
            .as_deref()
            .or(self.access_fee_usdc.as_deref())
    }

    pub fn is_task_access(&self) -> bool {
        self.purchase_endpoint.is_some() || self.access_fee_usdc.is_some()
    }
}

// --- Health ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub marketplace: Option<String>,
    #[serde(default)]
    pub usdc: Option<String>,
}
