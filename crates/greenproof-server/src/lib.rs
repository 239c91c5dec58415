//! # GreenProof Server
//!
//! JSON over HTTP for the [`greenproof`] service, built on `axum`.
//!
//! | Method | Path                   | Response                         |
//! |--------|------------------------|----------------------------------|
//! | GET    | `/`                    | `{"message": ...}`               |
//! | GET    | `/health`              | storage status and record counts |
//! | GET    | `/schema`              | JSON Schemas of both records     |
//! | POST   | `/actions`             | `{"id"}`                         |
//! | GET    | `/actions`             | actions, `?offset&limit`         |
//! | GET    | `/actions/:id`         | the action                       |
//! | POST   | `/actions/:id/attest`  | `{"proof_hash", "tx_id"}`        |
//! | GET    | `/actions/:id/verify`  | `{"valid"}`, `?salt`             |
//! | GET    | `/actions/:id/proofs`  | proofs of one action             |
//! | GET    | `/proofs`              | proofs, `?offset&limit`          |
//!
//! Errors are `{"error": message}` with 422 (validation), 404 (unknown or
//! malformed id) or 503 (storage). Undecodable bodies and query strings keep
//! axum's status (400, 415 or 422) with the same body shape.

pub mod config;
pub mod error;
pub mod routes;
pub mod schema;

pub use config::{ServerConfig, StorageConfig};
pub use error::ApiError;
pub use routes::{build_router, SharedService};
