//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use greenproof_core::{ActionContent, ActionId, Attestation, ImpactAction, Proof, ProofId};

use crate::error::{Result, StoreError};
use crate::ids::IdGenerator;
use crate::traits::{Page, Store, StoreStats};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
    ids: IdGenerator,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Actions in insertion order.
    actions: Vec<ImpactAction>,

    /// Action id -> position in `actions`.
    action_index: HashMap<ActionId, usize>,

    /// Proofs in insertion order.
    proofs: Vec<Proof>,

    /// Proof id -> position in `proofs`.
    proof_index: HashMap<ProofId, usize>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_ids(IdGenerator::new())
    }

    /// Create a store that draws ids from `ids`.
    pub fn with_ids(ids: IdGenerator) -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
            ids,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn window<T: Clone>(records: &[T], page: Page) -> Vec<T> {
    records.iter().skip(page.offset).take(page.limit).cloned().collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_action(&self, content: &ActionContent, now: i64) -> Result<ImpactAction> {
        let mut inner = self.write()?;

        let action = ImpactAction::new(self.ids.next_action_id(now), content.clone(), now);
        let position = inner.actions.len();
        inner.action_index.insert(action.id, position);
        inner.actions.push(action.clone());

        Ok(action)
    }

    async fn get_action(&self, id: &ActionId) -> Result<Option<ImpactAction>> {
        let inner = self.read()?;
        Ok(inner
            .action_index
            .get(id)
            .map(|&position| inner.actions[position].clone()))
    }

    async fn list_actions(&self, page: Page) -> Result<Vec<ImpactAction>> {
        let inner = self.read()?;
        Ok(window(&inner.actions, page))
    }

    async fn record_attestation(&self, attestation: &Attestation) -> Result<Option<Proof>> {
        let mut inner = self.write()?;

        let Some(&position) = inner.action_index.get(&attestation.action_id) else {
            return Ok(None);
        };

        let proof = Proof::from_attestation(self.ids.next_proof_id(attestation.attested_at), attestation);
        inner.actions[position].apply_attestation(&attestation.derivation, attestation.attested_at);

        let proof_position = inner.proofs.len();
        inner.proof_index.insert(proof.id, proof_position);
        inner.proofs.push(proof.clone());

        Ok(Some(proof))
    }

    async fn get_proof(&self, id: &ProofId) -> Result<Option<Proof>> {
        let inner = self.read()?;
        Ok(inner
            .proof_index
            .get(id)
            .map(|&position| inner.proofs[position].clone()))
    }

    async fn list_proofs(&self, page: Page) -> Result<Vec<Proof>> {
        let inner = self.read()?;
        Ok(window(&inner.proofs, page))
    }

    async fn proofs_for_action(&self, action_id: &ActionId) -> Result<Vec<Proof>> {
        let inner = self.read()?;
        Ok(inner
            .proofs
            .iter()
            .filter(|p| &p.action_id == action_id)
            .cloned()
            .collect())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let inner = self.read()?;
        Ok(StoreStats {
            actions: inner.actions.len() as u64,
            proofs: inner.proofs.len() as u64,
        })
    }
}
