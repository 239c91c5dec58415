//! # GreenProof Testkit
//!
//! Testing utilities for GreenProof.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known contents with expected proof hashes and tx ids
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! Golden vectors ensure deterministic derivation across implementations:
//!
//! ```rust
//! use greenproof_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, proof_hash, _tx_id) in verify_all_vectors() {
//!     assert!(matches, "{name}: {proof_hash}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use greenproof_testkit::generators::{content_from_params, ContentParams};
//!
//! proptest! {
//!     #[test]
//!     fn proof_hash_is_deterministic(params: ContentParams) {
//!         let c = content_from_params(&params);
//!         prop_assert_eq!(greenproof_core::derive(&c, None), greenproof_core::derive(&c, None));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use greenproof_testkit::fixtures::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     let (action, proof) = fixture.attested_sample(None).await;
//!     assert_eq!(action.proof_hash, Some(proof.proof_hash));
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{sample_content, sample_contents, TestFixture};
pub use generators::{content_from_params, ContentParams};
pub use vectors::{all_vectors, verify_all_vectors, vectors_json, GoldenVector};
