//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use greenproof::{GreenProof, GreenProofConfig};
use greenproof_core::{ActionContent, AttestRequest, Category, ImpactAction, Proof};
use greenproof_store::{IdGenerator, MemoryStore};

/// Random id bytes used by fixture stores, so ids are reproducible.
pub const FIXTURE_ID_STATE: [u8; 5] = [0x67, 0x72, 0x65, 0x65, 0x6e];

/// A test fixture with a service over a memory store.
pub struct TestFixture {
    pub service: GreenProof<MemoryStore>,
}

impl TestFixture {
    /// Create a new fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GreenProofConfig::default())
    }

    pub fn with_config(config: GreenProofConfig) -> Self {
        let store = MemoryStore::with_ids(IdGenerator::with_state(FIXTURE_ID_STATE, 0));
        Self {
            service: GreenProof::new(store, config),
        }
    }

    /// Store the sample action.
    pub async fn create_sample(&self) -> ImpactAction {
        self.create(sample_content()).await
    }

    /// Store `content`, panicking on failure.
    pub async fn create(&self, content: ActionContent) -> ImpactAction {
        self.service
            .create_action(content)
            .await
            .expect("fixture content is valid")
    }

    /// Store the sample action and attest it once.
    pub async fn attested_sample(&self, salt: Option<&str>) -> (ImpactAction, Proof) {
        let action = self.create_sample().await;

        let mut request = AttestRequest::new();
        if let Some(salt) = salt {
            request = request.salt(salt);
        }
        let proof = self
            .service
            .attest(&action.id, request)
            .await
            .expect("fixture action exists");

        let action = self
            .service
            .require_action(&action.id)
            .await
            .expect("fixture action exists");
        (action, proof)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The rooftop solar action used throughout the tests.
pub fn sample_content() -> ActionContent {
    ActionContent::builder("Test User", "Solar generation", Category::Renewables, 12.5, "kWh")
        .description("Generated clean energy from rooftop PV")
        .location("Test City")
        .evidence_url("https://example.com/evidence.jpg")
        .build()
        .expect("sample content is valid")
}

/// `count` distinct valid contents, one per category in turn.
pub fn sample_contents(count: usize) -> Vec<ActionContent> {
    (0..count)
        .map(|i| {
            let category = Category::ALL[i % Category::ALL.len()];
            ActionContent::builder(
                format!("Actor {i}"),
                format!("Action {i}"),
                category,
                (i + 1) as f64,
                "units",
            )
            .build()
            .expect("sample content is valid")
        })
        .collect()
}
