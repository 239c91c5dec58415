//! Store trait: the abstract interface for action and proof persistence.
//!
//! This trait allows the service to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use greenproof_core::{ActionContent, ActionId, Attestation, ImpactAction, Proof, ProofId};

use crate::error::Result;

/// Upper bound on the number of records returned by one listing call.
pub const MAX_PAGE_SIZE: usize = 100;

/// The two kinds of stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Action,
    Proof,
}

impl RecordKind {
    /// Table (collection) holding records of this kind.
    pub const fn table(&self) -> &'static str {
        match self {
            RecordKind::Action => "impactaction",
            RecordKind::Proof => "proof",
        }
    }
}

/// A window over a listing, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    /// Build a page, clamping `limit` into `1..=MAX_PAGE_SIZE`.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// The first `MAX_PAGE_SIZE` records.
    pub const fn first() -> Self {
        Self {
            offset: 0,
            limit: MAX_PAGE_SIZE,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first()
    }
}

/// Record counts, used for health reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub actions: u64,
    pub proofs: u64,
}

/// The Store trait: async interface for action and proof persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Storage-assigned identity**: ids and timestamps are set here, never by callers.
/// - **Append-only proofs**: there is no operation that mutates or deletes a proof.
/// - **Atomic attestation**: [`Store::record_attestation`] inserts the proof and
///   updates the action as one unit; either both happen or neither does.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Action Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a new, unattested action.
    ///
    /// `now` (Unix ms) becomes both `created_at` and `updated_at`.
    async fn insert_action(&self, content: &ActionContent, now: i64) -> Result<ImpactAction>;

    /// Get an action by id.
    async fn get_action(&self, id: &ActionId) -> Result<Option<ImpactAction>>;

    /// List actions in insertion order.
    async fn list_actions(&self, page: Page) -> Result<Vec<ImpactAction>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Proof Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Commit an attestation.
    ///
    /// Inserts a new proof and marks the action attested with the proof's
    /// hash and tx id, refreshing its `updated_at`.
    ///
    /// # Returns
    /// - `Some(proof)` with the stored proof.
    /// - `None` if the action does not exist; nothing is written.
    async fn record_attestation(&self, attestation: &Attestation) -> Result<Option<Proof>>;

    /// Get a proof by id.
    async fn get_proof(&self, id: &ProofId) -> Result<Option<Proof>>;

    /// List proofs in insertion order.
    async fn list_proofs(&self, page: Page) -> Result<Vec<Proof>>;

    /// All proofs recorded for an action, oldest first.
    async fn proofs_for_action(&self, action_id: &ActionId) -> Result<Vec<Proof>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────────────────────

    /// Count stored records. Doubles as a reachability check.
    async fn stats(&self) -> Result<StoreStats>;
}

/// Shared stores are stores, so a composition root can hand out
/// `Arc<dyn Store>` without knowing the backend.
#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn insert_action(&self, content: &ActionContent, now: i64) -> Result<ImpactAction> {
        (**self).insert_action(content, now).await
    }

    async fn get_action(&self, id: &ActionId) -> Result<Option<ImpactAction>> {
        (**self).get_action(id).await
    }

    async fn list_actions(&self, page: Page) -> Result<Vec<ImpactAction>> {
        (**self).list_actions(page).await
    }

    async fn record_attestation(&self, attestation: &Attestation) -> Result<Option<Proof>> {
        (**self).record_attestation(attestation).await
    }

    async fn get_proof(&self, id: &ProofId) -> Result<Option<Proof>> {
        (**self).get_proof(id).await
    }

    async fn list_proofs(&self, page: Page) -> Result<Vec<Proof>> {
        (**self).list_proofs(page).await
    }

    async fn proofs_for_action(&self, action_id: &ActionId) -> Result<Vec<Proof>> {
        (**self).proofs_for_action(action_id).await
    }

    async fn stats(&self) -> Result<StoreStats> {
        (**self).stats().await
    }
}
