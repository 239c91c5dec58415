//! End-to-end attestation tests against the public service API.

use std::sync::Arc;

use async_trait::async_trait;
use greenproof::core::{
    ActionContent, ActionId, AttestRequest, Attestation, Category, ImpactAction, Network,
    NewAction, Proof, ProofId, ValidationError,
};
use greenproof::store::{MemoryStore, Page, SqliteStore, Store, StoreError, StoreStats};
use greenproof::{parse_action_id, GreenProof, GreenProofConfig, GreenProofError};

const SOLAR_HASH: &str = "ec13746adb3aa39743e77ce3962c3387c86f2d7860fdb92420c41e4b2bc41444";
const SOLAR_TX: &str = "b2f1ed78813ab7663751f35e7ea1bcfe";

fn solar_full() -> ActionContent {
    ActionContent::builder("Test User", "Solar generation", Category::Renewables, 12.5, "kWh")
        .description("Generated clean energy from rooftop PV")
        .location("Test City")
        .evidence_url("https://example.com/evidence.jpg")
        .build()
        .unwrap()
}

fn minimal() -> ActionContent {
    ActionContent::builder("Test User", "Solar generation", Category::Renewables, 12.5, "kWh")
        .build()
        .unwrap()
}

fn memory_service() -> GreenProof<MemoryStore> {
    GreenProof::new(MemoryStore::new(), GreenProofConfig::default())
}

#[tokio::test]
async fn test_create_attest_verify() {
    let service = memory_service();

    let action = service.create_action(solar_full()).await.unwrap();
    assert_eq!(action.id.to_hex().len(), 24);
    assert!(!action.attested);

    let proof = service.attest(&action.id, AttestRequest::new()).await.unwrap();
    assert_eq!(proof.proof_hash.to_hex(), SOLAR_HASH);
    assert_eq!(proof.tx_id.to_hex(), SOLAR_TX);

    let stored = service.require_action(&action.id).await.unwrap();
    assert!(stored.attested);
    assert_eq!(stored.proof_hash.unwrap().to_hex(), SOLAR_HASH);
    assert_eq!(stored.tx_id.unwrap().to_hex(), SOLAR_TX);

    assert!(service.verify(&action.id, None).await.unwrap());
    assert!(!service.verify(&action.id, Some("x")).await.unwrap());
}

#[tokio::test]
async fn test_identical_content_yields_identical_hash() {
    let service = memory_service();

    let a = service.create_action(minimal()).await.unwrap();
    let b = service.create_action(minimal()).await.unwrap();
    assert_ne!(a.id, b.id);

    let pa = service.attest(&a.id, AttestRequest::new()).await.unwrap();
    let pb = service.attest(&b.id, AttestRequest::new()).await.unwrap();
    assert_eq!(pa.proof_hash, pb.proof_hash);
    assert_eq!(pa.tx_id, pb.tx_id);
    assert_ne!(pa.id, pb.id);
}

#[tokio::test]
async fn test_signer_metadata_does_not_affect_hash() {
    let service = memory_service();
    let action = service.create_action(minimal()).await.unwrap();

    let plain = service.attest(&action.id, AttestRequest::new()).await.unwrap();
    let signed = service
        .attest(
            &action.id,
            AttestRequest::new()
                .signer("0xabc", "0xsig")
                .chain_id(11155111)
                .network(Network::Testnet),
        )
        .await
        .unwrap();

    assert_eq!(plain.proof_hash, signed.proof_hash);
    assert_eq!(plain.tx_id, signed.tx_id);
    assert_eq!(signed.signer_address.as_deref(), Some("0xabc"));
    assert_eq!(signed.signature.as_deref(), Some("0xsig"));
    assert_eq!(signed.chain_id, Some(11155111));
    assert_eq!(signed.network, Network::Testnet);
}

#[tokio::test]
async fn test_reattest_with_salt_keeps_latest() {
    let service = memory_service();
    let action = service.create_action(minimal()).await.unwrap();

    let first = service.attest(&action.id, AttestRequest::new()).await.unwrap();
    let second = service
        .attest(&action.id, AttestRequest::new().salt("saltA"))
        .await
        .unwrap();
    assert_ne!(first.proof_hash, second.proof_hash);
    assert_eq!(
        second.proof_hash.to_hex(),
        "cdf9c14e289647288d7747a07d9e308f0446be34b3e3876192b426839837dc2c"
    );

    let proofs = service.proofs_for_action(&action.id).await.unwrap();
    assert_eq!(proofs, vec![first, second.clone()]);

    let stored = service.require_action(&action.id).await.unwrap();
    assert_eq!(stored.proof_hash, Some(second.proof_hash));
    assert!(service.verify(&action.id, Some("saltA")).await.unwrap());
    assert!(!service.verify(&action.id, None).await.unwrap());
}

#[tokio::test]
async fn test_empty_salt_matches_no_salt() {
    let service = memory_service();
    let action = service.create_action(minimal()).await.unwrap();

    let none = service.attest(&action.id, AttestRequest::new()).await.unwrap();
    let empty = service.attest(&action.id, AttestRequest::new().salt("")).await.unwrap();

    // The salt is appended to the encoding, so an empty one adds no bytes.
    assert_eq!(none.proof_hash, empty.proof_hash);
}

#[tokio::test]
async fn test_unknown_action_is_not_found() {
    let service = memory_service();
    let missing = ActionId::from_bytes([0x42; 12]);

    assert!(service.get_action(&missing).await.unwrap().is_none());
    assert!(matches!(
        service.attest(&missing, AttestRequest::new()).await,
        Err(GreenProofError::NotFound(_))
    ));
    assert!(matches!(
        service.verify(&missing, None).await,
        Err(GreenProofError::NotFound(_))
    ));
    assert!(matches!(
        service.proofs_for_action(&missing).await,
        Err(GreenProofError::NotFound(_))
    ));
    assert!(service.list_proofs(Page::first()).await.unwrap().is_empty());
}

#[test]
fn test_malformed_id_is_not_found() {
    for raw in ["", "xyz", "0123456789abcdef0123456", "0123456789abcdef012345678"] {
        assert!(matches!(
            parse_action_id(raw),
            Err(GreenProofError::NotFound(_))
        ));
    }
}

#[tokio::test]
async fn test_validation_errors() {
    let service = memory_service();

    let base = || NewAction::from(minimal());
    let cases = vec![
        (
            NewAction { actor: "  ".into(), ..base() },
            ValidationError::EmptyField("actor"),
        ),
        (
            NewAction { title: String::new(), ..base() },
            ValidationError::EmptyField("title"),
        ),
        (
            NewAction { unit: String::new(), ..base() },
            ValidationError::EmptyField("unit"),
        ),
        (
            NewAction { quantity: -1.0, ..base() },
            ValidationError::NonPositiveQuantity(-1.0),
        ),
        (
            NewAction { quantity: f64::NAN, ..base() },
            ValidationError::NonFiniteQuantity,
        ),
        (
            NewAction { category: "fusion".into(), ..base() },
            ValidationError::UnknownCategory("fusion".into()),
        ),
    ];

    for (new, expected) in cases {
        match service.create_action(new).await {
            Err(GreenProofError::Validation(e)) => assert_eq!(e, expected),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
    assert!(service.list_actions(Page::first()).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_attestations_stay_consistent() {
    let service = Arc::new(memory_service());
    let action = service.create_action(minimal()).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            let id = action.id;
            tokio::spawn(async move {
                service
                    .attest(&id, AttestRequest::new().salt(format!("salt-{i}")))
                    .await
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let proofs = service.proofs_for_action(&action.id).await.unwrap();
    assert_eq!(proofs.len(), 16);

    // The action carries the hash of the last committed proof.
    let stored = service.require_action(&action.id).await.unwrap();
    let last = proofs.last().unwrap();
    assert_eq!(stored.proof_hash, Some(last.proof_hash));
    assert_eq!(stored.tx_id, Some(last.tx_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unserialized_attestations_keep_last_writer() {
    let config = GreenProofConfig {
        serialize_attestations: false,
        ..GreenProofConfig::default()
    };
    let service = Arc::new(GreenProof::new(MemoryStore::new(), config));
    let action = service.create_action(minimal()).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            let id = action.id;
            tokio::spawn(async move {
                service
                    .attest(&id, AttestRequest::new().salt(format!("salt-{i}")))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut returned = Vec::new();
    for handle in handles {
        returned.push(handle.await.unwrap());
    }

    let proofs = service.proofs_for_action(&action.id).await.unwrap();
    assert_eq!(proofs.len(), 16);
    for proof in &returned {
        assert!(proofs.contains(proof));
    }

    // No lock, but the commit is still atomic: the action matches whichever
    // proof was committed last.
    let stored = service.require_action(&action.id).await.unwrap();
    let last = proofs.last().unwrap();
    assert_eq!(stored.proof_hash, Some(last.proof_hash));
    assert_eq!(stored.tx_id, Some(last.tx_id));

    let salts: Vec<String> = (0..16).map(|i| format!("salt-{i}")).collect();
    let mut matching = 0;
    for salt in &salts {
        if service.verify(&action.id, Some(salt)).await.unwrap() {
            matching += 1;
        }
    }
    assert_eq!(matching, 1);
}

#[tokio::test]
async fn test_sqlite_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greenproof.db");

    let (action_id, proof) = {
        let service = GreenProof::new(SqliteStore::open(&path).unwrap(), GreenProofConfig::default());
        let action = service.create_action(solar_full()).await.unwrap();
        let proof = service
            .attest(&action.id, AttestRequest::new().signer("0xabc", "0xsig"))
            .await
            .unwrap();
        (action.id, proof)
    };

    let service = GreenProof::new(SqliteStore::open(&path).unwrap(), GreenProofConfig::default());
    let stored = service.require_action(&action_id).await.unwrap();
    assert_eq!(stored.content, solar_full());
    assert_eq!(stored.proof_hash.unwrap().to_hex(), SOLAR_HASH);
    assert!(service.verify(&action_id, None).await.unwrap());

    assert_eq!(service.list_proofs(Page::first()).await.unwrap(), vec![proof]);
}

/// A store whose every operation fails.
struct FailingStore;

fn down() -> StoreError {
    StoreError::Unavailable("connection refused".into())
}

#[async_trait]
impl Store for FailingStore {
    async fn insert_action(&self, _: &ActionContent, _: i64) -> greenproof::store::Result<ImpactAction> {
        Err(down())
    }

    async fn get_action(&self, _: &ActionId) -> greenproof::store::Result<Option<ImpactAction>> {
        Err(down())
    }

    async fn list_actions(&self, _: Page) -> greenproof::store::Result<Vec<ImpactAction>> {
        Err(down())
    }

    async fn record_attestation(&self, _: &Attestation) -> greenproof::store::Result<Option<Proof>> {
        Err(down())
    }

    async fn get_proof(&self, _: &ProofId) -> greenproof::store::Result<Option<Proof>> {
        Err(down())
    }

    async fn list_proofs(&self, _: Page) -> greenproof::store::Result<Vec<Proof>> {
        Err(down())
    }

    async fn proofs_for_action(&self, _: &ActionId) -> greenproof::store::Result<Vec<Proof>> {
        Err(down())
    }

    async fn stats(&self) -> greenproof::store::Result<StoreStats> {
        Err(down())
    }
}

#[tokio::test]
async fn test_storage_failure_surfaces() {
    let service = GreenProof::new(FailingStore, GreenProofConfig::default());

    let err = service.create_action(minimal()).await.unwrap_err();
    assert!(matches!(err, GreenProofError::StorageUnavailable(_)));
    assert!(err.to_string().starts_with("storage unavailable"));

    let err = service
        .attest(&ActionId::from_bytes([1; 12]), AttestRequest::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GreenProofError::StorageUnavailable(_)));

    let health = service.health().await;
    assert!(!health.storage);
    assert!(health.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_shared_dyn_store() {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let service = GreenProof::new(store, GreenProofConfig::default());

    let action = service.create_action(minimal()).await.unwrap();
    service.attest(&action.id, AttestRequest::new()).await.unwrap();
    assert_eq!(
        service.store().stats().await.unwrap(),
        StoreStats { actions: 1, proofs: 1 }
    );
}
