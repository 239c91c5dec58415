//! Impact actions: the records users submit and later attest.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::canonical::canonical_content;
use crate::derive::{derive, Derivation};
use crate::error::ValidationError;
use crate::types::{ActionId, ProofHash, TxId};
use crate::validation::{validate_content, validate_new_action};

/// The closed set of impact categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Renewables,
    Recycling,
    Reforestation,
    Transport,
    Water,
    Buildings,
    CircularEconomy,
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 8] = [
        Category::Renewables,
        Category::Recycling,
        Category::Reforestation,
        Category::Transport,
        Category::Water,
        Category::Buildings,
        Category::CircularEconomy,
        Category::Other,
    ];

    /// Wire name of the category. Part of the canonical encoding.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Renewables => "renewables",
            Category::Recycling => "recycling",
            Category::Reforestation => "reforestation",
            Category::Transport => "transport",
            Category::Water => "water",
            Category::Buildings => "buildings",
            Category::CircularEconomy => "circular-economy",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// The content fields of an action: everything that goes into a proof.
///
/// Values of this type have passed validation, either through
/// [`ActionBuilder::build`] or [`NewAction::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionContent {
    pub actor: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub quantity: f64,
    pub unit: String,
    pub location: Option<String>,
    pub evidence_url: Option<String>,
}

impl ActionContent {
    /// Start building content from the required fields.
    pub fn builder(
        actor: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        quantity: f64,
        unit: impl Into<String>,
    ) -> ActionBuilder {
        ActionBuilder {
            content: ActionContent {
                actor: actor.into(),
                title: title.into(),
                description: None,
                category,
                quantity,
                unit: unit.into(),
                location: None,
                evidence_url: None,
            },
        }
    }

    /// Canonical bytes of this content.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_content(self)
    }
}

/// Builder for [`ActionContent`].
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    content: ActionContent,
}

impl ActionBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.content.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.content.location = Some(location.into());
        self
    }

    pub fn evidence_url(mut self, url: impl Into<String>) -> Self {
        self.content.evidence_url = Some(url.into());
        self
    }

    /// Validate and return the content.
    pub fn build(self) -> Result<ActionContent, ValidationError> {
        validate_content(&self.content)?;
        Ok(self.content)
    }
}

/// An action as submitted by a caller, before validation.
///
/// `category` is kept as free text so that an unknown category surfaces as
/// a [`ValidationError`] rather than a decoding failure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAction {
    pub actor: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub evidence_url: Option<String>,
}

impl NewAction {
    /// Validate the submission into typed content.
    pub fn validate(self) -> Result<ActionContent, ValidationError> {
        validate_new_action(self)
    }
}

impl From<ActionContent> for NewAction {
    fn from(content: ActionContent) -> Self {
        Self {
            actor: content.actor,
            title: content.title,
            description: content.description,
            category: content.category.as_str().to_string(),
            quantity: content.quantity,
            unit: content.unit,
            location: content.location,
            evidence_url: content.evidence_url,
        }
    }
}

/// Attestation state of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttestationState {
    /// No proof has been recorded yet.
    Unattested,
    /// The latest proof recorded for the action.
    Attested { proof_hash: ProofHash, tx_id: TxId },
}

/// A stored impact action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpactAction {
    pub id: ActionId,
    #[serde(flatten)]
    pub content: ActionContent,
    pub attested: bool,
    pub proof_hash: Option<ProofHash>,
    pub tx_id: Option<TxId>,
    /// Creation time (Unix ms).
    pub created_at: i64,
    /// Last update time (Unix ms).
    pub updated_at: i64,
}

impl ImpactAction {
    /// A freshly created, unattested action.
    pub fn new(id: ActionId, content: ActionContent, now: i64) -> Self {
        Self {
            id,
            content,
            attested: false,
            proof_hash: None,
            tx_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current attestation state.
    ///
    /// A record that claims `attested` without both values is reported as
    /// unattested.
    pub fn state(&self) -> AttestationState {
        match (self.attested, self.proof_hash, self.tx_id) {
            (true, Some(proof_hash), Some(tx_id)) => AttestationState::Attested { proof_hash, tx_id },
            _ => AttestationState::Unattested,
        }
    }

    /// Record a successful derivation on the action.
    ///
    /// Re-attestation overwrites the previous values.
    pub fn apply_attestation(&mut self, derivation: &Derivation, now: i64) {
        self.attested = true;
        self.proof_hash = Some(derivation.proof_hash);
        self.tx_id = Some(derivation.tx_id);
        self.updated_at = now;
    }

    /// Derive a proof from the action's current content.
    pub fn derive(&self, salt: Option<&str>) -> Derivation {
        derive(&self.content, salt)
    }

    /// Whether the stored proof matches what `salt` derives from the current content.
    pub fn is_consistent_with(&self, salt: Option<&str>) -> bool {
        match self.state() {
            AttestationState::Attested { proof_hash, tx_id } => {
                self.derive(salt) == Derivation { proof_hash, tx_id }
            }
            AttestationState::Unattested => false,
        }
    }
}
