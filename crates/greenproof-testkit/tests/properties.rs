//! Properties of proof derivation over generated content.

use proptest::prelude::*;

use greenproof_core::{derive, derive_tx_id, verify, AttestRequest, Category};
use greenproof_testkit::generators::{attest_request, content_from_params, salt, ContentParams};
use greenproof_testkit::{all_vectors, TestFixture};

proptest! {
    #[test]
    fn test_hex_lengths(params: ContentParams, salt in salt()) {
        let d = derive(&content_from_params(&params), salt.as_deref());

        let hash = d.proof_hash.to_hex();
        let tx = d.tx_id.to_hex();
        prop_assert_eq!(hash.len(), 64);
        prop_assert_eq!(tx.len(), 32);
        prop_assert!(hash.chars().chain(tx.chars()).all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_tx_id_follows_proof_hash(params: ContentParams, salt in salt()) {
        let d = derive(&content_from_params(&params), salt.as_deref());
        prop_assert_eq!(d.tx_id, derive_tx_id(&d.proof_hash));
    }

    #[test]
    fn test_salt_changes_hash(params: ContentParams, a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        prop_assume!(a != b);
        let content = content_from_params(&params);

        let da = derive(&content, Some(&a));
        let db = derive(&content, Some(&b));
        prop_assert_ne!(da.proof_hash, db.proof_hash);
        prop_assert_ne!(derive(&content, None).proof_hash, da.proof_hash);
    }

    #[test]
    fn test_any_field_change_changes_hash(
        params: ContentParams,
        field in 0usize..8,
        suffix in "[a-z]{1,4}",
    ) {
        let original = content_from_params(&params);
        let mut changed = original.clone();

        let extend = |value: &mut Option<String>| match value {
            Some(text) => text.push_str(&suffix),
            None => *value = Some(suffix.clone()),
        };
        match field {
            0 => changed.actor.push_str(&suffix),
            1 => changed.title.push_str(&suffix),
            2 => extend(&mut changed.description),
            3 => {
                let next = Category::ALL
                    .iter()
                    .position(|c| *c == changed.category)
                    .map_or(0, |i| (i + 1) % Category::ALL.len());
                changed.category = Category::ALL[next];
            }
            4 => changed.quantity /= 2.0,
            5 => changed.unit.push_str(&suffix),
            6 => extend(&mut changed.location),
            _ => extend(&mut changed.evidence_url),
        }

        prop_assert_ne!(derive(&original, None).proof_hash, derive(&changed, None).proof_hash);
    }

    #[test]
    fn test_request_metadata_is_not_hashed(params: ContentParams, request in attest_request()) {
        let content = content_from_params(&params);
        let bare = AttestRequest {
            salt: request.salt.clone(),
            ..AttestRequest::default()
        };

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (with_metadata, without) = runtime.block_on(async {
            let fixture = TestFixture::new();
            let action = fixture.create(content.clone()).await;
            let a = fixture.service.attest(&action.id, request.clone()).await.unwrap();
            let b = fixture.service.attest(&action.id, bare).await.unwrap();
            (a, b)
        });

        prop_assert_eq!(with_metadata.derivation(), without.derivation());
        prop_assert!(verify(&content, request.salt.as_deref(), &with_metadata.derivation()));
    }
}

#[tokio::test]
async fn test_service_matches_golden_vectors() {
    let fixture = TestFixture::new();

    for vector in all_vectors() {
        let action = fixture.create(vector.content()).await;

        let mut request = AttestRequest::new();
        if let Some(salt) = vector.salt {
            request = request.salt(salt);
        }
        let proof = fixture.service.attest(&action.id, request).await.unwrap();

        assert_eq!(proof.proof_hash.to_hex(), vector.expected_proof_hash, "{}", vector.name);
        assert_eq!(proof.tx_id.to_hex(), vector.expected_tx_id, "{}", vector.name);
        assert!(fixture.service.verify(&action.id, vector.salt).await.unwrap());
    }
}
