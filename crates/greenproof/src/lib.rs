//! # GreenProof
//!
//! Records environmental impact actions and attests them with
//! deterministic, content-derived proofs on a simulated chain.
//!
//! ## Overview
//!
//! - **Actions**: self-reported impact claims (who, what, how much)
//! - **Attestation**: canonical encoding + SHA-256 yields a `proof_hash`,
//!   from which a `tx_id` is derived; a proof record is appended and the
//!   action is marked attested
//! - **Verification**: recompute the hash from stored content and compare
//!
//! Nothing is submitted to a real chain. The `tx_id` is derived, not issued.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use greenproof::{GreenProof, GreenProofConfig};
//! use greenproof::core::{ActionContent, AttestRequest, Category};
//! use greenproof::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("greenproof.db").unwrap();
//!     let service = GreenProof::new(store, GreenProofConfig::default());
//!
//!     let content = ActionContent::builder("Test User", "Solar generation", Category::Renewables, 12.5, "kWh")
//!         .build()
//!         .unwrap();
//!     let action = service.create_action(content).await.unwrap();
//!
//!     let proof = service
//!         .attest(&action.id, AttestRequest::new().salt("batch-7"))
//!         .await
//!         .unwrap();
//!     println!("{} -> {}", proof.proof_hash, proof.tx_id);
//!
//!     assert!(service.verify(&action.id, Some("batch-7")).await.unwrap());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `greenproof::core` - Domain types, canonical encoding, derivation
//! - `greenproof::store` - Storage abstraction, SQLite and in-memory stores

pub mod error;
pub mod locks;
pub mod service;

pub use error::{GreenProofError, Result};
pub use service::{parse_action_id, GreenProof, GreenProofConfig, HealthReport};

/// Re-export core primitives.
pub mod core {
    pub use greenproof_core::*;
}

/// Re-export storage.
pub mod store {
    pub use greenproof_store::*;
}
