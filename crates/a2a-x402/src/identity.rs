use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::error::AgentError;

/// The agent's on-chain identity.
///
/// The marketplace never sees a signature: agents are identified by the
/// address sent in `X-Agent-Address`. The key is only used to derive
/// that address.
pub struct AgentIdentity {
    signer: PrivateKeySigner,
}

impl AgentIdentity {
    /// Create an identity from a hex-encoded private key (with or without 0x prefix).
    pub fn from_private_key(private_key: &str) -> Result<Self, AgentError> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let signer: PrivateKeySigner = key
            .parse()
            .map_err(|e| AgentError::InvalidPrivateKey(format!("{e}")))?;
        Ok(Self { signer })
    }

    /// Generate a throwaway identity.
    pub fn random() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// EIP-55 checksummed address, as sent in `X-Agent-Address`.
    pub fn address_string(&self) -> String {
        self.signer.address().to_checksum(None)
    }
}

impl std::fmt::Debug for AgentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentIdentity")
            .field("address", &self.address())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
