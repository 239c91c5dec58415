//! Proof derivation: canonical bytes plus salt to `(proof_hash, tx_id)`.
//!
//! ```text
//! proof_hash = SHA-256(canonical_content || salt)
//! tx_id      = SHA-256(hex(proof_hash) || "|tx")[..16]
//! ```
//!
//! Both values are pure functions of the content and the salt, so anyone
//! holding the action and the salt can recompute and check a proof offline.

use serde::{Deserialize, Serialize};

use crate::action::ActionContent;
use crate::canonical::canonical_content;
use crate::types::{ProofHash, TxId, TX_ID_LEN};

/// Marker appended to the hex proof hash when deriving the tx id.
pub const TX_MARKER: &str = "|tx";

/// The pair produced by one derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Derivation {
    pub proof_hash: ProofHash,
    pub tx_id: TxId,
}

/// Derive the proof for `content` with an optional salt.
pub fn derive(content: &ActionContent, salt: Option<&str>) -> Derivation {
    derive_from_canonical(&canonical_content(content), salt)
}

/// Derive from already-encoded canonical bytes.
///
/// An absent salt and an empty salt are equivalent.
pub fn derive_from_canonical(canonical: &[u8], salt: Option<&str>) -> Derivation {
    let salt = salt.unwrap_or("");
    let mut input = Vec::with_capacity(canonical.len() + salt.len());
    input.extend_from_slice(canonical);
    input.extend_from_slice(salt.as_bytes());

    let proof_hash = ProofHash::digest(&input);
    Derivation {
        proof_hash,
        tx_id: derive_tx_id(&proof_hash),
    }
}

/// Derive the transaction id from a proof hash.
pub fn derive_tx_id(proof_hash: &ProofHash) -> TxId {
    let mut input = proof_hash.to_hex();
    input.push_str(TX_MARKER);
    let digest = ProofHash::digest(input.as_bytes());

    let mut tx = [0u8; TX_ID_LEN];
    tx.copy_from_slice(&digest.as_bytes()[..TX_ID_LEN]);
    TxId(tx)
}

/// Check a claimed proof against the content and salt.
pub fn verify(content: &ActionContent, salt: Option<&str>, claimed: &Derivation) -> bool {
    derive(content, salt) == *claimed
}
