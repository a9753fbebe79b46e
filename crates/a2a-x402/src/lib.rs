//! Core types for agents calling the A2A Marketplace x402 API.
//!
//! The marketplace gates premium endpoints behind a prepaid USDC balance:
//! an agent identifies itself with the `X-Agent-Address` header and the
//! server either charges the call or answers `402 Payment Required`.
//!
//! This crate holds what the HTTP client and any other caller share:
//!
//! - [`AgentIdentity`] — derives the agent address from a private key
//! - [`UsdcAmount`] — 6-decimal USDC amounts without floating point
//! - [`types`] — response payloads, including the 402 body
//! - [`AgentError`] — the error type for every operation

pub mod amount;
pub mod constants;
pub mod error;
pub mod identity;
pub mod types;

pub use amount::UsdcAmount;
pub use constants::*;
pub use error::AgentError;
pub use identity::AgentIdentity;
pub use types::*;
