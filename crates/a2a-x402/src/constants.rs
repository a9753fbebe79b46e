/// Public deployment of the A2A Marketplace API.
pub const DEFAULT_API_URL: &str = "https://web-production-19f04.up.railway.app";

/// Header the marketplace reads to identify (and charge) the calling agent.
pub const AGENT_ADDRESS_HEADER: &str = "X-Agent-Address";

/// Status the marketplace returns when the agent's prepaid balance
/// (or task access) does not cover the call.
pub const PAYMENT_REQUIRED_STATUS: u16 = 402;

/// USDC has 6 decimal places.
pub const USDC_DECIMALS: u32 = 6;

/// Micro-units per whole USDC.
pub const USDC_UNIT: u64 = 10u64.pow(USDC_DECIMALS);

/// Response headers attached to charged premium calls.
pub mod headers {
    pub const PAYMENT_PROTOCOL: &str = "x-payment-protocol";
    pub const ACCEPT_PAYMENT: &str = "x-accept-payment";
    pub const AGENT_BALANCE: &str = "x-agent-balance";
    pub const CALL_COST: &str = "x-call-cost";
    pub const REMAINING_BALANCE: &str = "x-remaining-balance";
}

/// API routes, relative to the marketplace base URL.
pub mod routes {
    pub const HEALTH: &str = "/health";
    pub const TASKS: &str = "/api/tasks";
    pub const PRICING: &str = "/api/x402/pricing";
    pub const DEPOSIT: &str = "/api/x402/deposit";
    pub const WITHDRAW: &str = "/api/x402/withdraw";
    pub const BULK_TASKS: &str = "/api/x402/tasks/bulk";

    pub fn balance(address: &str) -> String {
        format!("/api/x402/balance/{address}")
    }

    pub fn analytics(address: &str) -> String {
        format!("/api/x402/analytics/{address}")
    }

    pub fn premium_task(task_id: u64) -> String {
        format!("/api/x402/tasks/{task_id}/premium")
    }

    pub fn purchase_access(task_id: u64) -> String {
        format!("/api/x402/tasks/{task_id}/purchase-access")
    }
}
