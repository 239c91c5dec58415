//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical encoding and the hash derivation so that
//! any implementation attesting the same content produces the same proof.

use serde::Serialize;

use greenproof_core::{derive, ActionContent, Category};

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub actor: &'static str,
    pub title: &'static str,
    pub description: Option<&'static str>,
    pub category: Category,
    pub quantity: f64,
    pub unit: &'static str,
    pub location: Option<&'static str>,
    pub evidence_url: Option<&'static str>,
    /// Salt appended to the canonical encoding, if any.
    pub salt: Option<&'static str>,
    /// Expected proof hash (hex).
    pub expected_proof_hash: &'static str,
    /// Expected tx id (hex).
    pub expected_tx_id: &'static str,
}

impl GoldenVector {
    /// The content this vector describes.
    ///
    /// Built directly rather than through the builder so that vectors can
    /// pin encodings of any content, valid or not.
    pub fn content(&self) -> ActionContent {
        ActionContent {
            actor: self.actor.to_string(),
            title: self.title.to_string(),
            description: self.description.map(str::to_string),
            category: self.category,
            quantity: self.quantity,
            unit: self.unit.to_string(),
            location: self.location.map(str::to_string),
            evidence_url: self.evidence_url.map(str::to_string),
        }
    }
}

const MINIMAL: GoldenVector = GoldenVector {
    name: "minimal with optional fields null",
    actor: "Test User",
    title: "Solar generation",
    description: None,
    category: Category::Renewables,
    quantity: 12.5,
    unit: "kWh",
    location: None,
    evidence_url: None,
    salt: None,
    expected_proof_hash: "ed546a5c4373ba21ad7b2e4720d7a34e678414fa9f46f08f48525551fe4bd613",
    expected_tx_id: "216d56095f9585241dcd4cf31439c3d3",
};

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "solar generation with every field",
            description: Some("Generated clean energy from rooftop PV"),
            location: Some("Test City"),
            evidence_url: Some("https://example.com/evidence.jpg"),
            expected_proof_hash: "ec13746adb3aa39743e77ce3962c3387c86f2d7860fdb92420c41e4b2bc41444",
            expected_tx_id: "b2f1ed78813ab7663751f35e7ea1bcfe",
            ..MINIMAL
        },
        MINIMAL,
        GoldenVector {
            name: "minimal with salt",
            salt: Some("saltA"),
            expected_proof_hash: "cdf9c14e289647288d7747a07d9e308f0446be34b3e3876192b426839837dc2c",
            expected_tx_id: "ce64509bf7f13d4e9e12da7877eceb90",
            ..MINIMAL
        },
        GoldenVector {
            name: "minimal with another salt",
            salt: Some("saltB"),
            expected_proof_hash: "4498f8a3ba17b32524e5e6910a01115248dd18776c1a0cccd025fea77515805d",
            expected_tx_id: "4d33a66c21ada954ab6127ca6abab320",
            ..MINIMAL
        },
        GoldenVector {
            name: "minimal with changed quantity",
            quantity: 12.6,
            expected_proof_hash: "0db5564cb4383e566226a0677fa7899d2653ab039d392567e2a34f9b7eb0df0f",
            expected_tx_id: "b8e79ed6f3b3cf11d60be1b98dd4a6da",
            ..MINIMAL
        },
        GoldenVector {
            name: "integral quantity and non-ascii text",
            actor: "Jörg Müller",
            title: "Baumpflanzung 🌳",
            category: Category::Reforestation,
            quantity: 150.0,
            unit: "trees",
            location: Some("Köln"),
            expected_proof_hash: "102fbe5fdd0cc321860ad129801df98492bebf321a3aeb5e3fbcaea7406151ac",
            expected_tx_id: "791cf43ccb0205a6b2b380be0af7af99",
            ..MINIMAL
        },
        GoldenVector {
            name: "exponent quantity and literal null text",
            actor: "ACME Recycling",
            title: "Bottles",
            description: Some("null"),
            category: Category::CircularEconomy,
            quantity: 1e16,
            unit: "bottles",
            salt: Some("batch-7"),
            expected_proof_hash: "74a07bfba081ff405763de58fd2f129e63062a2b4b0f011c33317b7182930c23",
            expected_tx_id: "bb4cba4a953091a5184ebc150bdc8a4e",
            ..MINIMAL
        },
        GoldenVector {
            name: "small quantity and escaped text",
            actor: "Water \"Co\"",
            title: "line\nbreak \\ tab\t",
            category: Category::Water,
            quantity: 0.00001,
            unit: "L",
            expected_proof_hash: "10c270584ce8aa5e368bccfa2b5f33db026fe09cc741c039213cb613ff4058a7",
            expected_tx_id: "9fc4a79fdbbf1490030536ebe3eeb58a",
            ..MINIMAL
        },
    ]
}

/// Verify all golden vectors against this implementation.
///
/// Returns `(name, matches, actual proof hash, actual tx id)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let derivation = derive(&v.content(), v.salt);
            let proof_hash = derivation.proof_hash.to_hex();
            let tx_id = derivation.tx_id.to_hex();

            let matches = proof_hash == v.expected_proof_hash && tx_id == v.expected_tx_id;
            (v.name.to_string(), matches, proof_hash, tx_id)
        })
        .collect()
}

/// All vectors as a JSON array, for consumption by other implementations.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_vectors())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, proof_hash, tx_id) in verify_all_vectors() {
            assert!(matches, "vector '{name}' derived {proof_hash} / {tx_id}");
        }
    }

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }

    #[test]
    fn test_vectors_json_is_parseable() {
        let json = vectors_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = parsed.as_array().unwrap();

        assert_eq!(array.len(), all_vectors().len());
        assert_eq!(array[6]["category"], "circular-economy");
        assert_eq!(array[1]["description"], serde_json::Value::Null);
    }
}
