//! # GreenProof Core
//!
//! Pure primitives for GreenProof: impact actions, proofs, canonicalization
//! and proof derivation.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over typed records.
//!
//! ## Key Types
//!
//! - [`ActionContent`] - The content fields of an action (the hash input)
//! - [`ImpactAction`] - A stored action with its attestation state
//! - [`Proof`] - An append-only attestation record
//! - [`Derivation`] - A `(proof_hash, tx_id)` pair
//!
//! ## Canonicalization
//!
//! Content is encoded as canonical JSON before hashing. See [`canonical`].
//!
//! ```rust
//! use greenproof_core::{derive, ActionContent, Category};
//!
//! let content = ActionContent::builder("Test User", "Solar generation", Category::Renewables, 12.5, "kWh")
//!     .build()
//!     .unwrap();
//! let proof = derive(&content, None);
//! assert_eq!(proof.proof_hash.to_hex().len(), 64);
//! assert_eq!(proof.tx_id.to_hex().len(), 32);
//! ```

pub mod action;
pub mod canonical;
pub mod derive;
pub mod error;
pub mod proof;
pub mod types;
pub mod validation;

pub use action::{ActionBuilder, ActionContent, AttestationState, Category, ImpactAction, NewAction};
pub use canonical::canonical_content;
pub use derive::{derive, derive_from_canonical, derive_tx_id, verify, Derivation, TX_MARKER};
pub use error::{CoreError, ValidationError};
pub use proof::{AttestRequest, Attestation, Network, Proof};
pub use types::{record_id_bytes, ActionId, ProofHash, ProofId, TxId};
pub use validation::{validate_content, validate_new_action};
