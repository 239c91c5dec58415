//! The GreenProof service: unified API over actions and proofs.
//!
//! Validation, derivation, and the attestation transition live here; the
//! store only persists what it is handed.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, info, warn};

use greenproof_core::{
    ActionId, AttestRequest, Attestation, ImpactAction, Network, NewAction, Proof,
};
use greenproof_store::{Page, Store, StoreStats, MAX_PAGE_SIZE};

use crate::error::{GreenProofError, Result};
use crate::locks::ActionLocks;

/// Configuration for the service.
#[derive(Debug, Clone)]
pub struct GreenProofConfig {
    /// Serialize attestations of the same action.
    ///
    /// When disabled, concurrent attestations race and the last committed
    /// one determines the action's stored hash.
    pub serialize_attestations: bool,
    /// Network recorded on proofs whose request names none.
    pub default_network: Network,
    /// Upper bound on listing pages.
    pub max_page_size: usize,
}

impl Default for GreenProofConfig {
    fn default() -> Self {
        Self {
            serialize_attestations: true,
            default_network: Network::SimChain,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Storage health as reported by [`GreenProof::health`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// Whether the store answered.
    pub storage: bool,
    /// Record counts, when the store answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StoreStats>,
    /// The store's failure, when it did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The main service struct.
///
/// Provides a unified API for:
/// - Recording impact actions
/// - Attesting actions (deriving and storing proofs)
/// - Verifying actions against their stored proof
/// - Listing actions and proofs
pub struct GreenProof<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: GreenProofConfig,
    /// Per-action attestation locks.
    locks: ActionLocks,
}

impl<S: Store> GreenProof<S> {
    /// Create a new service instance.
    pub fn new(store: S, config: GreenProofConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
            locks: ActionLocks::new(),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GreenProofConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Action Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate and store a new, unattested action.
    ///
    /// Validation failures write nothing.
    pub async fn create_action(&self, new: impl Into<NewAction>) -> Result<ImpactAction> {
        let content = new.into().validate()?;
        let action = self.store.insert_action(&content, now_millis()).await?;

        info!(
            action_id = %action.id,
            category = %action.content.category,
            "action created"
        );
        Ok(action)
    }

    /// Get an action by id.
    pub async fn get_action(&self, id: &ActionId) -> Result<Option<ImpactAction>> {
        Ok(self.store.get_action(id).await?)
    }

    /// Get an action by id, treating absence as an error.
    pub async fn require_action(&self, id: &ActionId) -> Result<ImpactAction> {
        self.get_action(id)
            .await?
            .ok_or_else(|| GreenProofError::NotFound(id.to_hex()))
    }

    /// List actions in creation order.
    pub async fn list_actions(&self, page: Page) -> Result<Vec<ImpactAction>> {
        Ok(self.store.list_actions(self.bounded(page)).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attestation
    // ─────────────────────────────────────────────────────────────────────────

    /// Attest an action.
    ///
    /// Derives the proof hash and tx id from the action's stored content and
    /// the request's salt, then records a new proof and marks the action
    /// attested in one storage step. Re-attesting always appends a new proof;
    /// the action keeps the most recent hash and tx id.
    ///
    /// Signer fields, chain id, and network are recorded on the proof but
    /// never influence the derivation.
    pub async fn attest(&self, id: &ActionId, request: AttestRequest) -> Result<Proof> {
        let _guard = if self.config.serialize_attestations {
            Some(self.locks.lock(*id).await)
        } else {
            None
        };

        let Some(action) = self.get_action(id).await? else {
            warn!(action_id = %id, "attestation of unknown action");
            return Err(GreenProofError::NotFound(id.to_hex()));
        };

        let derivation = action.derive(request.salt.as_deref());
        let attestation = Attestation::new(
            action.id,
            derivation,
            &request,
            self.config.default_network,
            now_millis(),
        );

        // The action can only vanish between the read and the commit if
        // something outside this service deletes it.
        let proof = self
            .store
            .record_attestation(&attestation)
            .await?
            .ok_or_else(|| GreenProofError::NotFound(id.to_hex()))?;

        info!(
            action_id = %id,
            proof_id = %proof.id,
            proof_hash = %proof.proof_hash,
            tx_id = %proof.tx_id,
            network = %proof.network,
            "action attested"
        );
        Ok(proof)
    }

    /// Check whether an action's stored hash matches its content and `salt`.
    ///
    /// Unattested actions verify as `false`.
    pub async fn verify(&self, id: &ActionId, salt: Option<&str>) -> Result<bool> {
        let action = self.require_action(id).await?;
        let valid = action.is_consistent_with(salt);

        debug!(action_id = %id, valid, "verification");
        Ok(valid)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Proof Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List proofs in creation order.
    pub async fn list_proofs(&self, page: Page) -> Result<Vec<Proof>> {
        Ok(self.store.list_proofs(self.bounded(page)).await?)
    }

    /// All proofs recorded for an action, oldest first.
    pub async fn proofs_for_action(&self, id: &ActionId) -> Result<Vec<Proof>> {
        self.require_action(id).await?;
        Ok(self.store.proofs_for_action(id).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────────────────────

    /// Probe the store.
    pub async fn health(&self) -> HealthReport {
        match self.store.stats().await {
            Ok(stats) => HealthReport {
                storage: true,
                stats: Some(stats),
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "storage health check failed");
                HealthReport {
                    storage: false,
                    stats: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn bounded(&self, page: Page) -> Page {
        Page {
            offset: page.offset,
            limit: page.limit.clamp(1, self.config.max_page_size.max(1)),
        }
    }
}

/// Parse a client-supplied action id.
///
/// A malformed id cannot name a stored action, so it is reported as not found.
pub fn parse_action_id(raw: &str) -> Result<ActionId> {
    raw.parse()
        .map_err(|_| GreenProofError::NotFound(raw.to_string()))
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenproof_core::{ActionContent, Category, ValidationError};
    use greenproof_store::MemoryStore;

    fn service() -> GreenProof<MemoryStore> {
        GreenProof::new(MemoryStore::new(), GreenProofConfig::default())
    }

    fn solar() -> ActionContent {
        ActionContent::builder("Test User", "Solar generation", Category::Renewables, 12.5, "kWh")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let action = service.create_action(solar()).await.unwrap();

        assert!(!action.attested);
        assert!(action.proof_hash.is_none());
        assert!(action.tx_id.is_none());

        let fetched = service.get_action(&action.id).await.unwrap();
        assert_eq!(fetched, Some(action));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid() {
        let service = service();
        let mut new = NewAction::from(solar());
        new.quantity = 0.0;

        let err = service.create_action(new).await.unwrap_err();
        assert!(matches!(
            err,
            GreenProofError::Validation(ValidationError::NonPositiveQuantity(_))
        ));
        assert!(service.list_actions(Page::first()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let service = service();
        let mut new = NewAction::from(solar());
        new.category = "fusion".to_string();

        let err = service.create_action(new).await.unwrap_err();
        assert!(matches!(
            err,
            GreenProofError::Validation(ValidationError::UnknownCategory(_))
        ));
    }

    #[tokio::test]
    async fn test_attest_updates_action() {
        let service = service();
        let action = service.create_action(solar()).await.unwrap();

        let proof = service.attest(&action.id, AttestRequest::new()).await.unwrap();
        assert_eq!(proof.action_id, action.id);
        assert_eq!(proof.network, Network::SimChain);
        assert_eq!(proof.proof_hash.to_hex().len(), 64);
        assert_eq!(proof.tx_id.to_hex().len(), 32);

        let updated = service.require_action(&action.id).await.unwrap();
        assert!(updated.attested);
        assert_eq!(updated.proof_hash, Some(proof.proof_hash));
        assert_eq!(updated.tx_id, Some(proof.tx_id));
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_attest_unknown_writes_nothing() {
        let service = service();
        let missing = ActionId::from_bytes([9; 12]);

        let err = service.attest(&missing, AttestRequest::new()).await.unwrap_err();
        assert!(matches!(err, GreenProofError::NotFound(_)));
        assert!(service.list_proofs(Page::first()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_network_is_configurable() {
        let config = GreenProofConfig {
            default_network: Network::Testnet,
            ..GreenProofConfig::default()
        };
        let service = GreenProof::new(MemoryStore::new(), config);
        let action = service.create_action(solar()).await.unwrap();

        let proof = service.attest(&action.id, AttestRequest::new()).await.unwrap();
        assert_eq!(proof.network, Network::Testnet);

        let proof = service
            .attest(&action.id, AttestRequest::new().network(Network::Mainnet))
            .await
            .unwrap();
        assert_eq!(proof.network, Network::Mainnet);
    }

    #[tokio::test]
    async fn test_verify_unattested_is_false() {
        let service = service();
        let action = service.create_action(solar()).await.unwrap();
        assert!(!service.verify(&action.id, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_page_size_cap() {
        let config = GreenProofConfig {
            max_page_size: 3,
            ..GreenProofConfig::default()
        };
        let service = GreenProof::new(MemoryStore::new(), config);
        for _ in 0..5 {
            service.create_action(solar()).await.unwrap();
        }

        assert_eq!(service.list_actions(Page::first()).await.unwrap().len(), 3);
        assert_eq!(service.list_actions(Page::new(3, 10)).await.unwrap().len(), 2);
    }

    #[test]
    fn test_parse_action_id() {
        let id = ActionId::from_bytes([0xab; 12]);
        assert_eq!(parse_action_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(
            parse_action_id("not-an-id"),
            Err(GreenProofError::NotFound(raw)) if raw == "not-an-id"
        ));
    }

    #[tokio::test]
    async fn test_health_reports_counts() {
        let service = service();
        let action = service.create_action(solar()).await.unwrap();
        service.attest(&action.id, AttestRequest::new()).await.unwrap();

        let health = service.health().await;
        assert!(health.storage);
        assert_eq!(health.stats, Some(StoreStats { actions: 1, proofs: 1 }));
        assert!(health.error.is_none());
    }
}
