//! Agent client for the A2A Marketplace x402 API.
//!
//! Premium endpoints are charged against a prepaid USDC balance held by the
//! marketplace contract. The agent identifies itself with `X-Agent-Address`;
//! when the balance is short the server answers `402 Payment Required` and
//! the client reports it instead of failing.
//!
//! # Quick Example
//!
//! ```no_run
//! use a2a_x402_client::{AgentIdentity, MarketplaceClient, PremiumOutcome};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), a2a_x402_client::AgentError> {
//! let identity = AgentIdentity::from_private_key("0xYOUR_KEY")?;
//! let client = MarketplaceClient::new("https://api.example.com", identity)?;
//!
//! match client.get_bulk_tasks().await? {
//!     PremiumOutcome::Granted { body, .. } => println!("{} tasks", body.total),
//!     PremiumOutcome::PaymentRequired(info) => {
//!         println!("deposit needed: {:?}", info.deficit_usdc)
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod agent;
pub mod config;
mod http_client;
mod receipt;
pub mod report;

pub use agent::X402Agent;
pub use http_client::{MarketplaceClient, PremiumOutcome};
pub use receipt::PaymentReceipt;

// Re-export commonly needed types from core
pub use a2a_x402::{
    AgentError, AgentIdentity, BalanceInfo, PaymentRequiredBody, UsdcAmount, DEFAULT_API_URL,
};
