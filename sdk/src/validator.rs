// Copyright 2025 The c2pa-lineage Authors. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Ordered validation of a decoded manifest.
//!
//! Checks run in a fixed order and each contributes its own code:
//! structure, signing credential trust, claim signature, time-stamp (only
//! when one is present), then one code per assertion and per ingredient. A
//! structural failure stops validation after the first code.

use c2pa_lineage_crypto::cose::base64_sha256_cert_der;
use c2pa_lineage_status_tracker::{log_item, validation_codes::*, StatusTracker};
use log::debug;

use crate::{
    canonical::hash_bytes, manifest::Manifest, trust_anchors::TrustAnchors,
    validation_status::ValidationStatus,
};

/// Validates `manifest`, resolving ingredients among the manifests embedded
/// in its store.
pub fn validate(manifest: &Manifest, trust_anchors: &TrustAnchors) -> ValidationStatus {
    validate_with_known(manifest, trust_anchors, &[])
}

/// Validates `manifest`, resolving ingredients among its embedded manifests
/// and `known_manifests`.
pub fn validate_with_known(
    manifest: &Manifest,
    trust_anchors: &TrustAnchors,
    known_manifests: &[Manifest],
) -> ValidationStatus {
    let mut log = StatusTracker::default();
    verify_manifest(manifest, trust_anchors, known_manifests, &mut log);
    ValidationStatus::from_tracker(&log)
}

pub(crate) fn verify_manifest(
    manifest: &Manifest,
    trust_anchors: &TrustAnchors,
    known_manifests: &[Manifest],
    log: &mut StatusTracker,
) {
    if !verify_structure(manifest, log) {
        return;
    }

    let sig_uri = manifest.signature_uri();
    let sign1 = manifest.claim_signature().sign1();
    let verifier = trust_anchors.verifier();

    if let Some(ee) = manifest.claim_signature().cert_chain().first() {
        debug!(
            "verifying manifest {} signed by certificate {}",
            manifest.label(),
            base64_sha256_cert_der(ee)
        );
    }

    // The time-stamp supplies the signing time for the trust check, so it is
    // checked first but reported after the signature.
    let tst_result = verifier.check_time_stamp(sign1);
    let tst_info = tst_result.as_ref().and_then(|r| r.as_ref().ok());

    if let Err(err) = verifier.verify_trust(&sig_uri, sign1, tst_info, log) {
        debug!("manifest {} untrusted: {err}", manifest.label());
    }
    if let Err(err) = verifier.verify_signature(&sig_uri, sign1, log) {
        debug!("manifest {} signature invalid: {err}", manifest.label());
    }
    if let Some(result) = &tst_result {
        verifier.log_time_stamp(&sig_uri, result, log);
    }

    verify_assertions(manifest, log);
    verify_ingredients(manifest, known_manifests, log);
}

fn verify_structure(manifest: &Manifest, log: &mut StatusTracker) -> bool {
    let mut problems = manifest.claim().structural_problems();

    let signature = manifest.claim_signature();
    if signature.alg().is_none() {
        problems.push("claim signature algorithm is missing or unsupported".to_string());
    }
    if signature.cert_chain().is_empty() {
        problems.push("claim signature has no certificate".to_string());
    }
    for label in manifest.unresolved_assertions() {
        problems.push(format!("assertion {label} is claimed but not present"));
    }
    if hash_bytes(manifest.claim_bytes()) != *manifest.manifest_hash() {
        problems.push("claim is not in canonical form".to_string());
    }

    if problems.is_empty() {
        log_item!(manifest.uri(), "manifest structure valid", "verify_structure")
            .validation_status(MANIFEST_STRUCTURE_VALID)
            .success(log);
        true
    } else {
        debug!("manifest {} is malformed: {problems:?}", manifest.label());
        log_item!(manifest.uri(), "manifest structure invalid", "verify_structure")
            .validation_status(MANIFEST_STRUCTURE_INVALID)
            .failure_no_throw(log, problems.join("; "));
        false
    }
}

fn verify_assertions(manifest: &Manifest, log: &mut StatusTracker) {
    for assertion in manifest.assertions() {
        if assertion.is_redacted() {
            continue;
        }

        let uri = manifest.assertion_uri(assertion.label());
        if assertion.hash_matches() {
            log_item!(uri, "hashed uri matched", "verify_assertions")
                .validation_status(ASSERTION_HASHEDURI_MATCH)
                .success(log);
        } else {
            let actual = hash_bytes(assertion.raw());
            log_item!(uri, "hashed uri does not match content", "verify_assertions")
                .validation_status(ASSERTION_HASHEDURI_MISMATCH)
                .failure_no_throw(
                    log,
                    format!("claimed {} but content is {actual}", assertion.hashed_uri()),
                );
        }
    }
}

fn verify_ingredients(manifest: &Manifest, known_manifests: &[Manifest], log: &mut StatusTracker) {
    for ingredient in manifest.ingredients() {
        let uri = manifest.assertion_uri(ingredient.label());
        let target = ingredient.active_manifest();

        log.push_ingredient_uri(target.to_string());

        let found = manifest
            .embedded_manifests()
            .iter()
            .chain(known_manifests)
            .find(|m| m.manifest_hash() == target);

        match found {
            Some(ingredient_manifest)
                if ingredient_manifest.claim_signature().cose_bytes()
                    == ingredient.claim_signature() =>
            {
                log_item!(uri, "ingredient claim signature matched", "verify_ingredients")
                    .validation_status(INGREDIENT_CLAIM_SIGNATURE_MATCH)
                    .success(log);
            }
            Some(_) => {
                log_item!(
                    uri,
                    "ingredient claim signature does not match",
                    "verify_ingredients"
                )
                .validation_status(INGREDIENT_CLAIM_SIGNATURE_MISMATCH)
                .failure_no_throw(log, format!("claim signature of {target} differs"));
            }
            None => {
                debug!("ingredient manifest {target} not available");
                log_item!(uri, "ingredient manifest not found", "verify_ingredients")
                    .validation_status(INGREDIENT_MANIFEST_MISSING)
                    .informational(log);
            }
        }

        log.pop_ingredient_uri();
    }
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::{
        assertion::AssertionBase,
        assertions::{IngredientAssertion, Relationship},
        parser::parse,
        trust_anchors::TrustAnchors,
        utils::test::{
            derived_manifest, expired_signer, sample_manifest, sample_manifest_signed_by,
            test_builder, test_trust_anchors, test_tsa, EC_ROOT_CA, ROOT_CA,
        },
    };

    fn replace_first(bytes: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
        assert_eq!(from.len(), to.len());
        let pos = bytes.windows(from.len()).position(|w| w == from).unwrap();
        let mut out = bytes.to_vec();
        out[pos..pos + to.len()].copy_from_slice(to);
        out
    }

    #[test]
    fn trusted_manifest_without_ingredients() {
        let signed = sample_manifest();
        let status = validate(&signed.manifest, &test_trust_anchors());

        assert!(status.valid());
        assert_eq!(
            status.code_strings(),
            vec![
                "manifest.structureValid",
                "signingCredential.trusted",
                "signature.valid",
                "assertion.hashedURI.match",
                "assertion.hashedURI.match"
            ]
        );
        assert_eq!(
            status.codes()[1].url(),
            Some(signed.manifest.signature_uri().as_str())
        );
    }

    #[test]
    fn untrusted_without_anchors() {
        let signed = sample_manifest();
        let status = validate(&signed.manifest, &TrustAnchors::new());

        assert!(!status.valid());
        assert_eq!(
            &status.code_strings()[..3],
            &[MANIFEST_STRUCTURE_VALID, SIGNING_CREDENTIAL_UNTRUSTED, SIGNATURE_VALID]
        );
    }

    #[test]
    fn corrupted_assertion_and_expired_certificate() {
        let signed = sample_manifest_signed_by(expired_signer().as_ref());
        let corrupted = replace_first(&signed.bytes, b"CC-BY-4.0", b"CC-BY-5.0");
        let manifest = parse(&corrupted).unwrap();

        let status = validate(&manifest, &test_trust_anchors());
        assert!(!status.valid());
        assert!(status.has_code(ASSERTION_HASHEDURI_MISMATCH));
        assert!(status.has_code(SIGNING_CREDENTIAL_UNTRUSTED));
        assert!(status.has_code(SIGNATURE_VALID));

        let uri = manifest.assertion_uri("com.c2c.policy.v1");
        let mismatch = status.codes_for(&uri).next().unwrap();
        assert_eq!(mismatch.code(), ASSERTION_HASHEDURI_MISMATCH);
    }

    #[test]
    fn tampered_claim_fails_signature() {
        let signed = sample_manifest();
        let tampered = replace_first(&signed.bytes, b"c2c-pipeline", b"c2c-pipelinf");
        let manifest = parse(&tampered).unwrap();

        let status = validate(&manifest, &test_trust_anchors());
        assert!(status.has_code(SIGNATURE_INVALID));
        assert!(!status.valid());
    }

    #[test]
    fn missing_assertion_short_circuits() {
        let signed = sample_manifest();
        // renames the assertion box, which precedes the claim in the store
        let broken = replace_first(&signed.bytes, b"com.c2c.policy.v1", b"com.c2c.policy.v2");
        let manifest = parse(&broken).unwrap();
        assert_eq!(manifest.unresolved_assertions(), &["com.c2c.policy.v1"]);

        let status = validate(&manifest, &test_trust_anchors());
        assert_eq!(status.code_strings(), vec![MANIFEST_STRUCTURE_INVALID]);
        assert!(status.codes()[0]
            .explanation()
            .unwrap()
            .contains("com.c2c.policy.v1"));
    }

    #[test]
    fn time_stamp_is_reported_after_signature() {
        let tsa = test_tsa();
        let mut builder = test_builder();
        builder
            .add_assertion_json("com.c2c.policy.v1", &serde_json::json!({"a": 1}))
            .unwrap();
        let signed = builder
            .sign(crate::utils::test::es256_signer().as_ref(), Some(&tsa))
            .unwrap();

        let status = validate(&signed.manifest, &test_trust_anchors());
        assert_eq!(
            status.code_strings(),
            vec![
                MANIFEST_STRUCTURE_VALID,
                SIGNING_CREDENTIAL_TRUSTED,
                SIGNATURE_VALID,
                TIMESTAMP_TRUSTED,
                ASSERTION_HASHEDURI_MATCH
            ]
        );

        // no time-stamping anchors configured
        let mut signing_only = TrustAnchors::new();
        signing_only.add_trust_anchors(ROOT_CA).unwrap();
        signing_only.add_trust_anchors(EC_ROOT_CA).unwrap();
        let status = validate(&signed.manifest, &signing_only);
        assert!(status.has_code(TIMESTAMP_UNTRUSTED));
        assert!(status.has_code(SIGNING_CREDENTIAL_TRUSTED));
    }

    #[test]
    fn ingredients_resolve_against_embedded_and_known_manifests() {
        let (parent, child) = derived_manifest();
        let anchors = test_trust_anchors();

        let status = validate(&child.manifest, &anchors);
        assert!(status.valid());
        assert!(status.has_code(INGREDIENT_CLAIM_SIGNATURE_MATCH));
        let ingredient_code = status
            .codes()
            .iter()
            .find(|c| c.code() == INGREDIENT_CLAIM_SIGNATURE_MATCH)
            .unwrap();
        assert_eq!(
            ingredient_code.ingredient_uri(),
            Some(parent.manifest.manifest_hash().to_string().as_str())
        );

        let mut detached = child.manifest.clone();
        detached.set_embedded(Vec::new());
        let status = validate(&detached, &anchors);
        assert!(status.valid());
        assert!(status.has_code(INGREDIENT_MANIFEST_MISSING));

        let status = validate_with_known(&detached, &anchors, &[parent.manifest.clone()]);
        assert!(status.has_code(INGREDIENT_CLAIM_SIGNATURE_MATCH));
    }

    #[test]
    fn ingredient_signature_mismatch() {
        let parent = sample_manifest();

        let mut builder = test_builder();
        let forged = IngredientAssertion::new(
            Relationship::ParentOf,
            *parent.manifest.manifest_hash(),
            vec![0xd2, 0x84],
        );
        builder.add_typed_assertion(&forged).unwrap();
        let child = builder
            .sign(crate::utils::test::es256_signer().as_ref(), None)
            .unwrap();
        assert_eq!(forged.label(), "c2pa.ingredient");

        let status = validate_with_known(
            &child.manifest,
            &test_trust_anchors(),
            &[parent.manifest.clone()],
        );
        assert!(!status.valid());
        assert!(status.has_code(INGREDIENT_CLAIM_SIGNATURE_MISMATCH));
    }
}
