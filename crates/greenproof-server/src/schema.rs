//! JSON Schemas of the stored records, served at `GET /schema`.
//!
//! The schemas describe the wire form produced by serde: ids and hashes as
//! lowercase hex, timestamps as Unix milliseconds, and optional fields
//! present as `null` when unset.

use greenproof::core::{Category, Network};
use serde_json::{json, Value};

fn hex(len: usize, description: &str) -> Value {
    json!({
        "type": "string",
        "pattern": format!("^[0-9a-f]{{{len}}}$"),
        "description": description,
    })
}

fn nullable(kind: &str, description: &str) -> Value {
    json!({
        "anyOf": [{ "type": kind }, { "type": "null" }],
        "default": null,
        "description": description,
    })
}

fn nullable_hex(len: usize, description: &str) -> Value {
    json!({
        "anyOf": [hex(len, description), { "type": "null" }],
        "default": null,
        "description": description,
    })
}

fn millis(description: &str) -> Value {
    json!({ "type": "integer", "description": description })
}

/// Schema of an impact action as returned by the action endpoints.
pub fn impact_action() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();

    json!({
        "title": "ImpactAction",
        "description": "A real-world sustainable action submitted by a person or organization.",
        "type": "object",
        "properties": {
            "id": hex(24, "Record id"),
            "actor": { "type": "string", "description": "Person or org responsible for the action" },
            "title": { "type": "string", "description": "Short title for the action" },
            "description": nullable("string", "Detailed description of the impact"),
            "category": { "enum": categories, "type": "string", "description": "Impact category" },
            "quantity": {
                "type": "number",
                "exclusiveMinimum": 0,
                "description": "Measured quantity of the impact",
            },
            "unit": { "type": "string", "description": "Unit for quantity (e.g., kWh, kg, trees, L)" },
            "location": nullable("string", "City, region, or coordinates"),
            "evidence_url": nullable("string", "Link to evidence: doc, photo, meter data, etc."),
            "attested": {
                "type": "boolean",
                "default": false,
                "description": "Whether this action has a proof",
            },
            "proof_hash": nullable_hex(64, "Hash of the latest proof"),
            "tx_id": nullable_hex(32, "Simulated transaction id of the latest proof"),
            "created_at": millis("Creation time (Unix ms)"),
            "updated_at": millis("Last update time (Unix ms)"),
        },
        "required": ["actor", "title", "category", "quantity", "unit"],
    })
}

/// Schema of a proof record.
pub fn proof() -> Value {
    let networks = [Network::SimChain, Network::Testnet, Network::Mainnet].map(|n| n.as_str());

    json!({
        "title": "Proof",
        "description": "A verifiable attestation derived from an ImpactAction.",
        "type": "object",
        "properties": {
            "id": hex(24, "Record id"),
            "action_id": hex(24, "ID of the ImpactAction this proof belongs to"),
            "proof_hash": hex(64, "Deterministic hash of the canonical action payload and salt"),
            "tx_id": hex(32, "Simulated transaction id"),
            "network": {
                "enum": networks,
                "type": "string",
                "default": Network::default().as_str(),
                "description": "Target chain (simulated)",
            },
            "signer_address": nullable("string", "Address of the signer who approved the attestation"),
            "signature": nullable("string", "Wallet signature over an attestation message"),
            "chain_id": nullable("integer", "EVM chain id if applicable"),
            "created_at": millis("Creation time (Unix ms)"),
            "updated_at": millis("Equal to created_at"),
        },
        "required": ["action_id", "proof_hash", "tx_id"],
    })
}

/// Both schemas, keyed by table name.
pub fn all() -> Value {
    json!({
        "impactaction": impact_action(),
        "proof": proof(),
    })
}
