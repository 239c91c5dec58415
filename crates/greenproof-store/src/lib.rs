//! # GreenProof Store
//!
//! Storage abstraction for GreenProof. Provides a trait-based interface
//! for action and proof persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts persistence behind the [`Store`] trait,
//! allowing the service to be storage-agnostic. The primary implementation
//! is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`Page`] - A bounded listing window (at most [`MAX_PAGE_SIZE`] records)
//! - [`RecordKind`] - Record kind to table mapping
//!
//! ## Usage
//!
//! ```rust,no_run
//! use greenproof_core::{ActionContent, Category};
//! use greenproof_store::{SqliteStore, Store};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("greenproof.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let content = ActionContent::builder("Test User", "Solar generation", Category::Renewables, 12.5, "kWh")
//!         .build()
//!         .unwrap();
//!     let action = store.insert_action(&content, 1_700_000_000_000).await.unwrap();
//!     assert!(!action.attested);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Storage-assigned ids**: 24-hex-character ids generated per store instance
//! - **Append-only proofs**: proofs are inserted, never updated or deleted
//! - **Atomic attestation**: proof insert and action update commit together

pub mod error;
pub mod ids;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use ids::IdGenerator;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Page, RecordKind, Store, StoreStats, MAX_PAGE_SIZE};
