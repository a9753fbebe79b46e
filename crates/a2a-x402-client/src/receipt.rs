use a2a_x402::headers;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Charge details the marketplace attaches to a paid response as headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_payment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_balance_usdc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_cost_usdc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_balance_usdc: Option<String>,
}

impl PaymentReceipt {
    /// Returns `None` unless the response carries `X-Payment-Protocol`.
    pub fn from_headers(map: &HeaderMap) -> Option<Self> {
        let get = |name: &str| {
            map.get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Some(Self {
            protocol: get(headers::PAYMENT_PROTOCOL)?,
            accept_payment: get(headers::ACCEPT_PAYMENT),
            agent_balance_usdc: get(headers::AGENT_BALANCE),
            call_cost_usdc: get(headers::CALL_COST),
            remaining_balance_usdc: get(headers::REMAINING_BALANCE),
        })
    }
}
