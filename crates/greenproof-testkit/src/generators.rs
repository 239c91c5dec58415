//! Proptest generators for property-based testing.

use proptest::prelude::*;

use greenproof_core::{ActionContent, AttestRequest, Category, Network};

/// Generate a category.
pub fn category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

/// Generate a network.
pub fn network() -> impl Strategy<Value = Network> {
    prop_oneof![
        Just(Network::SimChain),
        Just(Network::Testnet),
        Just(Network::Mainnet),
    ]
}

/// Generate required text: at least one non-whitespace character.
pub fn required_text() -> impl Strategy<Value = String> {
    "[^\\s]\\PC{0,40}".prop_map(String::from)
}

/// Generate optional free text, including non-ASCII and control characters.
pub fn optional_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of(any::<String>())
}

/// Generate a valid quantity: finite and strictly positive.
pub fn quantity() -> impl Strategy<Value = f64> {
    prop_oneof![
        (1u32..=1_000_000u32).prop_map(f64::from),
        prop::num::f64::POSITIVE | prop::num::f64::NORMAL,
    ]
}

/// Generate a salt.
pub fn salt() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[A-Za-z0-9_-]{1,24}".prop_map(String::from))
}

/// Parameters for generating action content.
#[derive(Debug, Clone)]
pub struct ContentParams {
    pub actor: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub quantity: f64,
    pub unit: String,
    pub location: Option<String>,
    pub evidence_url: Option<String>,
}

impl Arbitrary for ContentParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            required_text(),
            required_text(),
            optional_text(),
            category(),
            quantity(),
            required_text(),
            optional_text(),
            optional_text(),
        )
            .prop_map(
                |(actor, title, description, category, quantity, unit, location, evidence_url)| {
                    ContentParams {
                        actor,
                        title,
                        description,
                        category,
                        quantity,
                        unit,
                        location,
                        evidence_url,
                    }
                },
            )
            .boxed()
    }
}

/// Build validated content from parameters.
pub fn content_from_params(params: &ContentParams) -> ActionContent {
    let mut builder = ActionContent::builder(
        params.actor.clone(),
        params.title.clone(),
        params.category,
        params.quantity,
        params.unit.clone(),
    );
    if let Some(description) = &params.description {
        builder = builder.description(description.clone());
    }
    if let Some(location) = &params.location {
        builder = builder.location(location.clone());
    }
    if let Some(url) = &params.evidence_url {
        builder = builder.evidence_url(url.clone());
    }
    builder.build().expect("generated content is valid")
}

/// Generate an attestation request with arbitrary metadata.
pub fn attest_request() -> impl Strategy<Value = AttestRequest> {
    (
        salt(),
        prop::option::of(("0x[0-9a-f]{40}", "0x[0-9a-f]{130}")),
        prop::option::of(any::<i64>()),
        prop::option::of(network()),
    )
        .prop_map(|(salt, signer, chain_id, network)| {
            let (signer_address, signature) = signer.unzip();
            AttestRequest {
                salt,
                signer_address,
                signature,
                chain_id,
                network,
            }
        })
}
