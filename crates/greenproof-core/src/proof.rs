//! Proof records and the inputs that produce them.
//!
//! A proof is append-only: it is created by a successful attestation and
//! never mutated afterwards. Signer metadata is carried as opaque values and
//! is never checked against the hash.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::derive::Derivation;
use crate::error::ValidationError;
use crate::types::{ActionId, ProofHash, ProofId, TxId};

/// Target network of a proof. Only `SimChain` is ever actually "used".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    #[default]
    SimChain,
    Testnet,
    Mainnet,
}

impl Network {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Network::SimChain => "sim-chain",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sim-chain" => Ok(Network::SimChain),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => Err(ValidationError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Caller-supplied parameters of an attestation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestRequest {
    /// Appended to the canonical bytes before hashing.
    #[serde(default)]
    pub salt: Option<String>,
    #[serde(default)]
    pub signer_address: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub chain_id: Option<i64>,
    /// Defaults to the service's configured network.
    #[serde(default)]
    pub network: Option<Network>,
}

impl AttestRequest {
    /// An unsalted request without signer metadata.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn signer(mut self, address: impl Into<String>, signature: impl Into<String>) -> Self {
        self.signer_address = Some(address.into());
        self.signature = Some(signature.into());
        self
    }

    pub fn chain_id(mut self, chain_id: i64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }
}

/// Everything the store needs to commit one attestation.
#[derive(Clone, Debug, PartialEq)]
pub struct Attestation {
    pub action_id: ActionId,
    pub derivation: Derivation,
    pub network: Network,
    pub signer_address: Option<String>,
    pub signature: Option<String>,
    pub chain_id: Option<i64>,
    /// Time of the attestation (Unix ms).
    pub attested_at: i64,
}

impl Attestation {
    /// Combine a derivation with the request metadata.
    pub fn new(
        action_id: ActionId,
        derivation: Derivation,
        request: &AttestRequest,
        default_network: Network,
        attested_at: i64,
    ) -> Self {
        Self {
            action_id,
            derivation,
            network: request.network.unwrap_or(default_network),
            signer_address: request.signer_address.clone(),
            signature: request.signature.clone(),
            chain_id: request.chain_id,
            attested_at,
        }
    }
}

/// A persisted proof record.
///
/// Optional metadata is always present in the serialized form, as `null`
/// when unset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub id: ProofId,
    pub action_id: ActionId,
    pub proof_hash: ProofHash,
    pub tx_id: TxId,
    pub network: Network,
    pub signer_address: Option<String>,
    pub signature: Option<String>,
    pub chain_id: Option<i64>,
    /// Creation time (Unix ms).
    pub created_at: i64,
    /// Equal to `created_at`; proofs are never updated.
    pub updated_at: i64,
}

impl Proof {
    /// Materialize the record for an attestation.
    pub fn from_attestation(id: ProofId, attestation: &Attestation) -> Self {
        Self {
            id,
            action_id: attestation.action_id,
            proof_hash: attestation.derivation.proof_hash,
            tx_id: attestation.derivation.tx_id,
            network: attestation.network,
            signer_address: attestation.signer_address.clone(),
            signature: attestation.signature.clone(),
            chain_id: attestation.chain_id,
            created_at: attestation.attested_at,
            updated_at: attestation.attested_at,
        }
    }

    /// The hash pair carried by this proof.
    pub fn derivation(&self) -> Derivation {
        Derivation {
            proof_hash: self.proof_hash,
            tx_id: self.tx_id,
        }
    }
}
